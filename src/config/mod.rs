pub mod job;
pub mod merged;
pub mod settings;

use settings::Settings;
use std::path::Path;

/// Load `settings.yaml` from the directory containing a job file.
///
/// Falls back to defaults when no settings file exists there.
pub fn load_settings_for_job(job_file_path: &Path) -> crate::error::Result<Settings> {
    let dir = job_file_path.parent().ok_or_else(|| {
        crate::error::SqueezeError::config("Cannot determine job file directory")
    })?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
