use std::process::ExitCode;

#[cfg(not(feature = "render"))]
fn main() -> ExitCode {
    eprintln!("pdf_squeeze was built without the 'render' feature; the CLI requires it.");
    ExitCode::FAILURE
}

#[cfg(feature = "render")]
fn main() -> ExitCode {
    cli::run()
}

#[cfg(feature = "render")]
mod cli {
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use serde::Serialize;

    use pdf_squeeze::config::job::JobFile;
    use pdf_squeeze::config::merged::MergedConfig;
    use pdf_squeeze::config::{self};
    use pdf_squeeze::estimate::estimate_compressed_size;
    use pdf_squeeze::pipeline::progress::Progress;
    use pdf_squeeze::render::pdfium::{self, PdfiumRasterizer};
    use pdf_squeeze::{
        BatchItem, CompressionEngine, CompressionOutcome, CompressionRequest, JobContext,
        RequestMode,
    };

    /// One line of the optional JSON report.
    #[derive(Serialize)]
    struct ReportEntry {
        input: String,
        output: String,
        original_size: Option<u64>,
        compressed_size: Option<u64>,
        page_count: Option<u32>,
        strategy: Option<String>,
        target_met: Option<bool>,
        error: Option<String>,
    }

    struct PreparedJob {
        input_path: PathBuf,
        output_path: PathBuf,
        request: CompressionRequest,
        bytes: Vec<u8>,
    }

    pub fn run() -> ExitCode {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();

        let args: Vec<String> = std::env::args().skip(1).collect();

        if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
            eprintln!("Usage: pdf_squeeze <jobs.yaml>...");
            eprintln!("  Compress PDF files according to job specifications.");
            return if args.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }

        if args.iter().any(|a| a == "--version" || a == "-V") {
            eprintln!("pdf_squeeze {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }

        // Bind the rendering backend up front so a missing pdfium library
        // fails before any job work starts.
        if let Err(e) = pdfium::warm_up() {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
        let rasterizer = match PdfiumRasterizer::new() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("ERROR: {e}");
                return ExitCode::FAILURE;
            }
        };
        let engine = CompressionEngine::new(&rasterizer);

        let mut has_error = false;

        for job_file_arg in &args {
            if !run_job_file(&engine, Path::new(job_file_arg)) {
                has_error = true;
            }
        }

        if has_error {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Process one job file. Returns false when anything failed.
    fn run_job_file(engine: &CompressionEngine<'_>, job_file_path: &Path) -> bool {
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!(
                    "ERROR: Failed to load settings for {}: {e}",
                    job_file_path.display()
                );
                return false;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "ERROR: Failed to read job file {}: {e}",
                    job_file_path.display()
                );
                return false;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!(
                    "ERROR: Failed to parse job file {}: {e}",
                    job_file_path.display()
                );
                return false;
            }
        };

        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut ok = true;
        let mut report: Vec<ReportEntry> = Vec::new();
        let mut prepared: Vec<PreparedJob> = Vec::new();

        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            let input_path = resolve_path(&job_dir, &job.input);
            let output_path = resolve_path(&job_dir, &job.output);

            let bytes = match std::fs::read(&input_path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("ERROR: Failed to read {}: {e}", input_path.display());
                    report.push(ReportEntry {
                        input: job.input.clone(),
                        output: job.output.clone(),
                        original_size: None,
                        compressed_size: None,
                        page_count: None,
                        strategy: None,
                        target_met: None,
                        error: Some(e.to_string()),
                    });
                    ok = false;
                    continue;
                }
            };

            let request = merged.to_request();

            if !matches!(request.mode, RequestMode::TargetSize { .. }) {
                let predicted = estimate_compressed_size(
                    bytes.len() as u64,
                    request.quality,
                    request.resolution_factor,
                );
                eprintln!(
                    "PLAN: {} ({} bytes, estimated output ~{} bytes)",
                    input_path.display(),
                    bytes.len(),
                    predicted
                );
            }

            prepared.push(PreparedJob {
                input_path,
                output_path,
                request,
                bytes,
            });
        }

        let items: Vec<BatchItem<'_>> = prepared
            .iter()
            .map(|p| BatchItem {
                name: p.input_path.display().to_string(),
                bytes: &p.bytes,
                request: p.request.clone(),
            })
            .collect();

        let progress = |p: Progress<'_>| {
            tracing::debug!(completed = p.completed, total = p.total, label = p.label, "progress");
        };
        let ctx = JobContext::new().with_progress(&progress);

        let results = engine.compress_all(&items, &ctx);

        for (job, result) in prepared.iter().zip(results) {
            match result {
                Ok(CompressionOutcome::Completed(res)) => {
                    if let Err(e) = std::fs::write(&job.output_path, &res.bytes) {
                        eprintln!("ERROR: Failed to write {}: {e}", job.output_path.display());
                        ok = false;
                        continue;
                    }
                    let target_note = match res.target_met {
                        Some(false) => " [target not reached]",
                        _ => "",
                    };
                    eprintln!(
                        "OK: {} -> {} ({} pages, {} -> {} bytes, {}){}",
                        job.input_path.display(),
                        job.output_path.display(),
                        res.page_count,
                        res.original_size,
                        res.compressed_size,
                        res.strategy,
                        target_note
                    );
                    report.push(ReportEntry {
                        input: job.input_path.display().to_string(),
                        output: job.output_path.display().to_string(),
                        original_size: Some(res.original_size),
                        compressed_size: Some(res.compressed_size),
                        page_count: Some(res.page_count),
                        strategy: Some(res.strategy.to_string()),
                        target_met: res.target_met,
                        error: None,
                    });
                }
                Ok(CompressionOutcome::Cancelled) => {
                    // The CLI installs no cancel token; not reachable here.
                    eprintln!("CANCELLED: {}", job.input_path.display());
                }
                Err(e) => {
                    eprintln!(
                        "ERROR: {} -> {}: {e}",
                        job.input_path.display(),
                        job.output_path.display()
                    );
                    report.push(ReportEntry {
                        input: job.input_path.display().to_string(),
                        output: job.output_path.display().to_string(),
                        original_size: None,
                        compressed_size: None,
                        page_count: None,
                        strategy: None,
                        target_met: None,
                        error: Some(e.to_string()),
                    });
                    ok = false;
                }
            }
        }

        if let Some(report_path) = &job_file.report {
            let path = resolve_path(&job_dir, report_path);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        eprintln!("ERROR: Failed to write report {}: {e}", path.display());
                        ok = false;
                    }
                }
                Err(e) => {
                    eprintln!("ERROR: Failed to serialize report: {e}");
                    ok = false;
                }
            }
        }

        ok
    }

    /// Resolve a potentially relative path against a base directory.
    /// If the path is already absolute, return it as-is.
    fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            base_dir.join(p)
        }
    }
}
