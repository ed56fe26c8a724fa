mod common;

use image::{Rgba, RgbaImage};
use pdf_squeeze::codec::reader::PdfReader;
use pdf_squeeze::pipeline::progress::JobContext;
use pdf_squeeze::repack::raster::{self, RasterOptions};
use pdf_squeeze::repack::{jpeg, pixels};

use common::FakeRasterizer;

fn opts(quality: u8, resolution_factor: f32) -> RasterOptions {
    RasterOptions {
        quality,
        resolution_factor,
        strip_metadata: false,
        grayscale: false,
    }
}

#[test]
fn test_raster_preserves_page_count_and_order() {
    let rasterizer = FakeRasterizer::new(vec![(200.0, 100.0), (100.0, 300.0), (250.0, 250.0)]);
    let input = common::minimal_pdf(3);
    let ctx = JobContext::new();

    let out = raster::repack(&input, &opts(50, 1.0), &rasterizer, &ctx, "doc").expect("repack");

    assert_eq!(out.page_count, 3);
    let reader = PdfReader::from_bytes(&out.bytes).expect("parse output");
    assert_eq!(reader.page_count(), 3);

    // Output pages keep the source order: page boxes must line up
    let (w1, h1) = reader.page_dimensions(1).expect("page 1 box");
    let (w2, h2) = reader.page_dimensions(2).expect("page 2 box");
    assert!((w1 - 200.0).abs() < 0.01 && (h1 - 100.0).abs() < 0.01);
    assert!((w2 - 100.0).abs() < 0.01 && (h2 - 300.0).abs() < 0.01);
}

#[test]
fn test_raster_geometry_independent_of_resolution_factor() {
    let input = common::minimal_pdf(1);
    let ctx = JobContext::new();

    for factor in [0.5f32, 1.0, 3.0] {
        let rasterizer = FakeRasterizer::new(vec![(320.0, 160.0)]);
        let out =
            raster::repack(&input, &opts(50, factor), &rasterizer, &ctx, "doc").expect("repack");
        let reader = PdfReader::from_bytes(&out.bytes).expect("parse output");
        let (w, h) = reader.page_dimensions(1).expect("page box");
        assert!(
            (w - 320.0).abs() < 0.01 && (h - 160.0).abs() < 0.01,
            "page box changed at factor {}: {}x{}",
            factor,
            w,
            h
        );
    }
}

#[test]
fn test_raster_embeds_jpeg_images() {
    let rasterizer = FakeRasterizer::new(vec![(200.0, 100.0)]);
    let input = common::minimal_pdf(1);
    let ctx = JobContext::new();

    let out = raster::repack(&input, &opts(50, 1.0), &rasterizer, &ctx, "doc").expect("repack");

    assert!(
        out.bytes.windows(b"DCTDecode".len()).any(|w| w == b"DCTDecode"),
        "output should embed DCTDecode image XObjects"
    );
}

#[test]
fn test_raster_reports_progress_per_page() {
    use std::cell::RefCell;

    let rasterizer = FakeRasterizer::new(vec![(100.0, 100.0), (100.0, 100.0)]);
    let input = common::minimal_pdf(2);

    let events: RefCell<Vec<(u32, u32)>> = RefCell::new(Vec::new());
    let progress = |p: pdf_squeeze::Progress<'_>| {
        events.borrow_mut().push((p.completed, p.total));
    };
    let ctx = JobContext::new().with_progress(&progress);

    raster::repack(&input, &opts(50, 1.0), &rasterizer, &ctx, "doc").expect("repack");

    assert_eq!(*events.borrow(), vec![(1, 2), (2, 2)]);
}

#[test]
fn test_raster_carries_source_metadata() {
    let rasterizer = FakeRasterizer::new(vec![(100.0, 100.0)]);
    let input = common::pdf_with_info(1);
    let ctx = JobContext::new();

    let out = raster::repack(&input, &opts(50, 1.0), &rasterizer, &ctx, "doc").expect("repack");

    let doc = lopdf::Document::load_mem(&out.bytes).expect("parse output");
    let info_id = match doc.trailer.get(b"Info") {
        Ok(lopdf::Object::Reference(id)) => *id,
        other => panic!("expected Info reference, got {:?}", other),
    };
    let info = doc.get_dictionary(info_id).expect("Info dictionary");
    match info.get(b"Title").expect("Title") {
        lopdf::Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Quarterly Report"),
        other => panic!("expected string Title, got {:?}", other),
    }
}

#[test]
fn test_raster_strip_metadata_omits_info() {
    let rasterizer = FakeRasterizer::new(vec![(100.0, 100.0)]);
    let input = common::pdf_with_info(1);
    let ctx = JobContext::new();

    let mut options = opts(50, 1.0);
    options.strip_metadata = true;
    let out = raster::repack(&input, &options, &rasterizer, &ctx, "doc").expect("repack");

    let doc = lopdf::Document::load_mem(&out.bytes).expect("parse output");
    assert!(
        doc.trailer.get(b"Info").is_err(),
        "stripped output should carry no Info dictionary"
    );
}

#[test]
fn test_raster_render_failure_aborts_whole_pass() {
    let rasterizer = FakeRasterizer::failing(vec![(100.0, 100.0), (100.0, 100.0)]);
    let input = common::minimal_pdf(2);
    let ctx = JobContext::new();

    let result = raster::repack(&input, &opts(50, 1.0), &rasterizer, &ctx, "doc");
    assert!(matches!(
        result,
        Err(pdf_squeeze::SqueezeError::RasterError(_))
    ));
}

// ============================================================
// Pixel transforms
// ============================================================

#[test]
fn test_flatten_fully_transparent_becomes_white() {
    let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
    pixels::flatten_onto_white(&mut img);
    for pixel in img.pixels() {
        assert_eq!(pixel.0, [255, 255, 255, 255]);
    }
}

#[test]
fn test_flatten_partial_alpha_blends_toward_white() {
    let mut img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
    pixels::flatten_onto_white(&mut img);
    let pixel = img.get_pixel(0, 0);
    assert_eq!(pixel.0[0], 255, "full-intensity channel stays saturated");
    assert_eq!(pixel.0[1], 127, "half-alpha zero channel blends to ~127");
    assert_eq!(pixel.0[2], 127);
    assert_eq!(pixel.0[3], 255, "alpha forced opaque");
}

#[test]
fn test_flatten_leaves_opaque_pixels_untouched() {
    let mut img = RgbaImage::from_pixel(1, 1, Rgba([12, 34, 56, 255]));
    pixels::flatten_onto_white(&mut img);
    assert_eq!(img.get_pixel(0, 0).0, [12, 34, 56, 255]);
}

#[test]
fn test_grayscale_rec601_luminance() {
    let mut img = RgbaImage::new(3, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
    img.put_pixel(2, 0, Rgba([0, 0, 255, 255]));
    pixels::grayscale_in_place(&mut img);

    // round(0.299 * 255) = 76, round(0.587 * 255) = 150, round(0.114 * 255) = 29
    assert_eq!(img.get_pixel(0, 0).0, [76, 76, 76, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [150, 150, 150, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [29, 29, 29, 255]);
}

#[test]
fn test_grayscale_white_stays_white() {
    let mut img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
    pixels::grayscale_in_place(&mut img);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

// ============================================================
// JPEG encoding
// ============================================================

#[test]
fn test_jpeg_rejects_out_of_range_quality() {
    let page = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]));
    let result = jpeg::encode_page(page.clone(), 0);
    assert!(matches!(
        result,
        Err(pdf_squeeze::SqueezeError::RasterError(_))
    ));
    assert!(jpeg::encode_page(page, 101).is_err());
}

#[test]
fn test_jpeg_encodes_page_buffer() {
    let page = RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255]));
    let jpeg_bytes = jpeg::encode_page(page, 80).expect("encode");
    assert!(
        jpeg_bytes.starts_with(&[0xFF, 0xD8]),
        "JPEG output should start with SOI marker"
    );
}
