// JPEG encoding for rasterized pages.

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};

use crate::error::SqueezeError;

/// Encode a rasterized page to JPEG bytes at `quality` (1-100).
///
/// Takes the page buffer by value: encoding is the last thing that
/// happens to a page's pixels, and consuming them here keeps exactly one
/// buffer live per page. The alpha channel is dropped in the RGB
/// conversion; callers flatten transparency onto an opaque background
/// first, so nothing is lost.
pub fn encode_page(image: RgbaImage, quality: u8) -> crate::error::Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(SqueezeError::raster(format!(
            "JPEG quality must be 1-100, got {}",
            quality
        )));
    }

    let rgb = DynamicImage::ImageRgba8(image).into_rgb8();

    let mut buf = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)?;

    Ok(buf.into_inner())
}
