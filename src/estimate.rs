// Predicted-size model for UI feedback. Never consulted for correctness.

/// Estimate the compressed size of a document before compression runs.
///
/// The model is deliberately crude: quality contributes quadratically,
/// resolution contributes linearly up to 300 dpi, and the ratio is floored
/// at 5% because even the most aggressive settings rarely shrink a document
/// below that. The result is always in `[0, original_bytes]`.
///
/// # Arguments
/// * `original_bytes`    - Size of the source document in bytes
/// * `quality`           - JPEG quality (1-100)
/// * `resolution_factor` - Rasterization scale relative to PDF points
///   (72 units per inch; `resolution_factor = dpi / 72`)
pub fn estimate_compressed_size(original_bytes: u64, quality: u8, resolution_factor: f32) -> u64 {
    let q = f64::from(quality.min(100)) / 100.0;
    let dpi = f64::from(resolution_factor.max(0.0)) * 72.0;
    let resolution_normalized = (dpi / 300.0).min(1.0);

    let ratio = (q * q * resolution_normalized * 0.7).max(0.05);

    // ratio < 1 always holds (0.7 ceiling), so the estimate never exceeds
    // the original size.
    (original_bytes as f64 * ratio).round() as u64
}
