// Shared test fixtures: a deterministic in-memory rasterizer and
// lopdf-built fixture documents.

#![allow(dead_code)]

use std::cell::Cell;

use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, Stream, dictionary};
use pdf_squeeze::render::{PageGeometry, PageRasterizer};
use pdf_squeeze::SqueezeError;

/// Deterministic rasterizer test double.
///
/// Ignores document bytes entirely; pages and failure modes are
/// configured up front. Rendered pixels follow a blocky pattern that
/// JPEG-compresses predictably, and every `rasterize` call is counted so
/// tests can assert probe budgets.
pub struct FakeRasterizer {
    pages: Vec<(f32, f32)>,
    decodable: bool,
    fail_render: bool,
    rasterize_calls: Cell<u32>,
}

impl FakeRasterizer {
    pub fn new(pages: Vec<(f32, f32)>) -> Self {
        Self {
            pages,
            decodable: true,
            fail_render: false,
            rasterize_calls: Cell::new(0),
        }
    }

    /// A rasterizer whose backend cannot parse any document.
    pub fn undecodable() -> Self {
        Self {
            pages: Vec::new(),
            decodable: false,
            fail_render: false,
            rasterize_calls: Cell::new(0),
        }
    }

    /// A rasterizer that decodes fine but fails to render every page.
    pub fn failing(pages: Vec<(f32, f32)>) -> Self {
        Self {
            pages,
            decodable: true,
            fail_render: true,
            rasterize_calls: Cell::new(0),
        }
    }

    pub fn rasterize_calls(&self) -> u32 {
        self.rasterize_calls.get()
    }

    fn check_decodable(&self) -> pdf_squeeze::Result<()> {
        if self.decodable {
            Ok(())
        } else {
            Err(SqueezeError::decode("fake: document unreadable"))
        }
    }

    fn page(&self, page_index: u32) -> pdf_squeeze::Result<(f32, f32)> {
        self.pages
            .get(page_index as usize)
            .copied()
            .ok_or_else(|| SqueezeError::raster(format!("fake: page {} out of range", page_index)))
    }
}

impl PageRasterizer for FakeRasterizer {
    fn page_count(&self, _document: &[u8]) -> pdf_squeeze::Result<u32> {
        self.check_decodable()?;
        Ok(self.pages.len() as u32)
    }

    fn page_geometry(
        &self,
        _document: &[u8],
        page_index: u32,
    ) -> pdf_squeeze::Result<PageGeometry> {
        self.check_decodable()?;
        let (width_pts, height_pts) = self.page(page_index)?;
        Ok(PageGeometry {
            width_pts,
            height_pts,
        })
    }

    fn rasterize(
        &self,
        _document: &[u8],
        page_index: u32,
        resolution_factor: f32,
    ) -> pdf_squeeze::Result<RgbaImage> {
        self.check_decodable()?;
        if self.fail_render {
            return Err(SqueezeError::raster("fake: render failure"));
        }
        let (width_pts, height_pts) = self.page(page_index)?;
        self.rasterize_calls.set(self.rasterize_calls.get() + 1);

        let width = ((width_pts * resolution_factor).round() as u32).max(1);
        let height = ((height_pts * resolution_factor).round() as u32).max(1);

        // 8x8 blocks keyed on position and page index: deterministic and
        // mildly textured so JPEG output size responds to quality.
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x >> 3)
                .wrapping_mul(31)
                .wrapping_add((y >> 3).wrapping_mul(17))
                .wrapping_add(page_index * 53)
                % 256) as u8;
            Rgba([v, v.wrapping_add(64), v.wrapping_add(128), 255])
        }))
    }
}

/// Deterministic incompressible filler for bloat streams.
fn pseudo_random_bytes(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

/// Kinds of extra weight a fixture document can carry.
pub enum Bloat {
    /// A large stream referenced from every page's resources; survives
    /// structural repacking.
    Referenced(usize),
    /// A large stream referenced by nothing; pruned by structural
    /// repacking.
    Orphaned(usize),
}

/// Build a well-formed PDF fixture in memory.
pub fn build_pdf(page_count: u32, with_info: bool, bloat: Option<Bloat>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let referenced_bloat_id = match &bloat {
        Some(Bloat::Referenced(len)) => {
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 10,
                    "Height" => 10,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                pseudo_random_bytes(*len),
            );
            Some(doc.add_object(Object::Stream(stream)))
        }
        _ => None,
    };

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..page_count {
        let content = Stream::new(dictionary! {}, b"q Q".to_vec());
        let content_id = doc.add_object(Object::Stream(content));

        let mut resources = lopdf::Dictionary::new();
        if let Some(bloat_id) = referenced_bloat_id {
            let mut xobjects = lopdf::Dictionary::new();
            xobjects.set("Im1", Object::Reference(bloat_id));
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(Object::Dictionary(resources));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if with_info {
        let info_id = doc.add_object(Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Quarterly Report"),
            "Author" => Object::string_literal("Jane Doe"),
            "Producer" => Object::string_literal("fixture builder"),
        }));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    if let Some(Bloat::Orphaned(len)) = &bloat {
        let stream = Stream::new(
            dictionary! { "Filter" => "DCTDecode" },
            pseudo_random_bytes(*len),
        );
        doc.add_object(Object::Stream(stream));
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize fixture PDF");
    buf
}

pub fn minimal_pdf(page_count: u32) -> Vec<u8> {
    build_pdf(page_count, false, None)
}

pub fn pdf_with_info(page_count: u32) -> Vec<u8> {
    build_pdf(page_count, true, None)
}

pub fn orphan_bloated_pdf(page_count: u32, bloat_bytes: usize) -> Vec<u8> {
    build_pdf(page_count, false, Some(Bloat::Orphaned(bloat_bytes)))
}

pub fn referenced_bloated_pdf(page_count: u32, bloat_bytes: usize) -> Vec<u8> {
    build_pdf(page_count, false, Some(Bloat::Referenced(bloat_bytes)))
}
