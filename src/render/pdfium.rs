// pdfium-render backend: document bytes -> RGBA page bitmaps.

use std::path::PathBuf;
use std::sync::OnceLock;

use image::RgbaImage;
use pdfium_render::prelude::*;

use super::{PageGeometry, PageRasterizer};

static PDFIUM_LIB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::SqueezeError::raster(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::SqueezeError::raster(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

fn cached_lib_path() -> crate::error::Result<&'static PathBuf> {
    if let Some(path) = PDFIUM_LIB_PATH.get() {
        return Ok(path);
    }
    let resolved = resolve_pdfium_lib_path()?;
    Ok(PDFIUM_LIB_PATH.get_or_init(|| resolved))
}

/// Resolve the pdfium library path ahead of first use.
///
/// Idempotent: the resolved path is cached process-wide and every
/// subsequent call (including the implicit one in
/// [`PdfiumRasterizer::new`]) reuses it. Calling this at startup turns
/// the library-not-found failure mode into an explicit initialization
/// error instead of a mid-batch surprise.
pub fn warm_up() -> crate::error::Result<()> {
    cached_lib_path().map(|_| ())
}

fn bind_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = cached_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::SqueezeError::raster("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| crate::error::SqueezeError::raster(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Production [`PageRasterizer`] backed by the pdfium shared library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind the pdfium library and construct a rasterizer.
    pub fn new() -> crate::error::Result<Self> {
        Ok(Self {
            pdfium: bind_pdfium()?,
        })
    }

    fn load_document(&self, document: &[u8]) -> crate::error::Result<PdfDocument<'_>> {
        self.pdfium
            .load_pdf_from_byte_vec(document.to_vec(), None)
            .map_err(|e| crate::error::SqueezeError::decode(e.to_string()))
    }

    fn get_page<'a>(
        doc: &'a PdfDocument<'_>,
        page_index: u32,
    ) -> crate::error::Result<PdfPage<'a>> {
        let page_index_u16 = u16::try_from(page_index)
            .map_err(|_| crate::error::SqueezeError::raster("page index exceeds u16 range"))?;
        doc.pages()
            .get(page_index_u16)
            .map_err(|e| crate::error::SqueezeError::raster(e.to_string()))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn page_count(&self, document: &[u8]) -> crate::error::Result<u32> {
        let doc = self.load_document(document)?;
        Ok(u32::from(doc.pages().len()))
    }

    fn page_geometry(
        &self,
        document: &[u8],
        page_index: u32,
    ) -> crate::error::Result<PageGeometry> {
        let doc = self.load_document(document)?;
        let page = Self::get_page(&doc, page_index)?;
        Ok(PageGeometry {
            width_pts: page.width().value,
            height_pts: page.height().value,
        })
    }

    fn rasterize(
        &self,
        document: &[u8],
        page_index: u32,
        resolution_factor: f32,
    ) -> crate::error::Result<RgbaImage> {
        let doc = self.load_document(document)?;
        let page = Self::get_page(&doc, page_index)?;

        // 1 point = 1/72 inch; at the requested factor each point maps to
        // `resolution_factor` pixels.
        let width_px = (page.width().value * resolution_factor).round() as i32;
        let height_px = (page.height().value * resolution_factor).round() as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| crate::error::SqueezeError::raster(e.to_string()))?;

        Ok(bitmap.as_image().to_rgba8())
    }
}
