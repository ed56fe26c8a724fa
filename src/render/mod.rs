#[cfg(feature = "render")]
pub mod pdfium;

use image::RgbaImage;

/// Native page box in PDF points (72 per inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_pts: f32,
    pub height_pts: f32,
}

/// Page rendering backend injected into the compression engine.
///
/// Implementations take document bytes per call and own no per-document
/// state; the engine holds a single rasterizer for its whole lifetime and
/// treats it as an opaque capability. Decode failures (document unreadable
/// by the backend) surface as `DecodeError`; per-page rendering failures
/// surface as `RasterError`.
pub trait PageRasterizer {
    /// Number of pages in the document.
    fn page_count(&self, document: &[u8]) -> crate::error::Result<u32>;

    /// Native geometry of a 0-indexed page.
    fn page_geometry(
        &self,
        document: &[u8],
        page_index: u32,
    ) -> crate::error::Result<PageGeometry>;

    /// Render a 0-indexed page at `resolution_factor` relative to the
    /// document's point unit (resolution_factor = dpi / 72), producing an
    /// RGBA buffer of `(width_pts * factor, height_pts * factor)` pixels.
    fn rasterize(
        &self,
        document: &[u8],
        page_index: u32,
        resolution_factor: f32,
    ) -> crate::error::Result<RgbaImage>;
}
