use pdf_squeeze::estimate::estimate_compressed_size;

#[test]
fn test_estimate_mid_quality_low_resolution() {
    // q = 0.5, dpi = 120 -> normalized 0.4, ratio = 0.25 * 0.4 * 0.7 = 0.07
    let estimate = estimate_compressed_size(1_000_000, 50, 120.0 / 72.0);
    assert_eq!(estimate, 70_000);
}

#[test]
fn test_estimate_floors_at_five_percent() {
    // q = 0.1, dpi = 72 -> ratio would be 0.00168, floored to 0.05
    let estimate = estimate_compressed_size(1_000_000, 10, 1.0);
    assert_eq!(estimate, 50_000);
}

#[test]
fn test_estimate_resolution_clamped_at_300_dpi() {
    // dpi = 600 clamps to 1.0, ratio = 1.0 * 1.0 * 0.7
    let estimate = estimate_compressed_size(2_000_000, 100, 600.0 / 72.0);
    assert_eq!(estimate, 1_400_000);
}

#[test]
fn test_estimate_never_exceeds_original() {
    for quality in [1u8, 25, 50, 75, 100] {
        for factor in [0.1f32, 0.5, 1.0, 2.0, 10.0] {
            let estimate = estimate_compressed_size(123_456, quality, factor);
            assert!(
                estimate <= 123_456,
                "estimate {} exceeds original for q={} rf={}",
                estimate,
                quality,
                factor
            );
        }
    }
}

#[test]
fn test_estimate_zero_input() {
    assert_eq!(estimate_compressed_size(0, 80, 2.0), 0);
}
