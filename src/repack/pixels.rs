// In-place pixel transforms applied between rasterization and encoding.

use image::RgbaImage;

/// Composite the image onto an opaque white background.
///
/// JPEG has no alpha channel; without this pass, transparent page regions
/// come out black once re-encoded. Standard source-over blend against
/// white, alpha forced to 255 afterwards.
pub fn flatten_onto_white(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 255 {
            continue;
        }
        let alpha = u16::from(a);
        let blend = |channel: u8| -> u8 {
            let c = u16::from(channel);
            ((c * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        pixel.0 = [blend(r), blend(g), blend(b), 255];
    }
}

/// Replace each pixel with its Rec.601 luminance on all three channels.
///
/// `luma = round(0.299 R + 0.587 G + 0.114 B)`; alpha is untouched. The
/// output stays RGBA so the same encode path handles both color modes.
pub fn grayscale_in_place(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)).round()
            as u8;
        pixel.0 = [luma, luma, luma, a];
    }
}
