// Lossy strategy: rasterize every page and re-embed each as one JPEG.

use tracing::debug;

use crate::codec::writer::PageWriter;
use crate::codec::{metadata, reader::PdfReader};
use crate::pipeline::progress::JobContext;
use crate::render::PageRasterizer;
use crate::repack::{RepackOutput, jpeg, pixels};

/// Settings for a raster repack pass.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Rasterization scale relative to PDF points (dpi / 72)
    pub resolution_factor: f32,
    pub strip_metadata: bool,
    pub grayscale: bool,
}

/// Rebuild the document by rasterizing every page in order.
///
/// Per page: rasterize at the requested scale, flatten onto opaque white,
/// optionally convert to grayscale, JPEG-encode, and emit an output page
/// whose box equals the *source* page box with the image stretched to
/// fill it. Progress is reported after each page and the cancel token is
/// checked before each page; pages are processed strictly sequentially so
/// at most one pixel buffer plus one encoded image are live at a time.
///
/// Content-destructive (vector text becomes a bitmap) but geometry
/// preserving. Any per-page render or encode failure aborts the whole
/// pass; no partially-rasterized document is ever returned.
pub fn repack(
    bytes: &[u8],
    opts: &RasterOptions,
    rasterizer: &dyn PageRasterizer,
    ctx: &JobContext<'_>,
    label: &str,
) -> crate::error::Result<RepackOutput> {
    let page_count = rasterizer.page_count(bytes)?;
    if page_count == 0 {
        return Err(crate::error::SqueezeError::raster("document has no pages"));
    }

    let mut writer = PageWriter::new();

    for page_index in 0..page_count {
        ctx.check_cancelled()?;

        let geometry = rasterizer.page_geometry(bytes, page_index)?;
        let mut bitmap = rasterizer.rasterize(bytes, page_index, opts.resolution_factor)?;

        pixels::flatten_onto_white(&mut bitmap);
        if opts.grayscale {
            pixels::grayscale_in_place(&mut bitmap);
        }

        let (pixel_width, pixel_height) = (bitmap.width(), bitmap.height());
        let jpeg_data = jpeg::encode_page(bitmap, opts.quality)?;

        writer.add_image_page(
            &jpeg_data,
            pixel_width,
            pixel_height,
            geometry.width_pts,
            geometry.height_pts,
        );

        ctx.report(page_index + 1, page_count, label);
    }

    // The output is built fresh, so stripping is implicit; otherwise the
    // source's Info fields are carried over when the source is readable.
    if !opts.strip_metadata
        && let Ok(reader) = PdfReader::from_bytes(bytes)
    {
        let info = metadata::document_info(reader.document());
        metadata::set_document_info(writer.document_mut(), &info);
    }

    let out = writer.save_to_bytes()?;

    debug!(
        input_bytes = bytes.len(),
        output_bytes = out.len(),
        page_count,
        quality = opts.quality,
        resolution_factor = opts.resolution_factor,
        "raster repack complete"
    );

    Ok(RepackOutput {
        bytes: out,
        page_count,
    })
}
