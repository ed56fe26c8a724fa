// Raster output assembly: one full-page image XObject per page.

use lopdf::{Document, Object, Stream, dictionary};

/// Builds the raster-strategy output document page by page.
///
/// Each page holds a single DCTDecode image XObject stretched over the
/// full page box. Pages accumulate under a shared Pages node that is
/// wired up when the document is serialized, so pages can be appended in
/// source order without rebuilding the page tree.
pub struct PageWriter {
    doc: Document,
    pages_id: lopdf::ObjectId,
    page_ids: Vec<lopdf::ObjectId>,
}

impl PageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Add a JPEG image XObject.
    ///
    /// Returns the XObject's object ID.
    fn add_image_xobject(&mut self, jpeg_data: &[u8], width: u32, height: u32) -> lopdf::ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let stream = Stream::new(dict, jpeg_data.to_vec());
        self.doc.add_object(Object::Stream(stream))
    }

    /// Content stream drawing a single image over the full page box:
    /// `q <width> 0 0 <height> 0 0 cm /<name> Do Q`.
    fn build_image_content_stream(name: &str, width_pts: f32, height_pts: f32) -> Vec<u8> {
        format!("q {width_pts} 0 0 {height_pts} 0 0 cm /{name} Do Q").into_bytes()
    }

    /// Append a page containing `jpeg_data` stretched over a page box of
    /// `width_pts` x `height_pts` points.
    ///
    /// The page box is the *source* page's geometry, not the pixel
    /// dimensions of the rasterized image; the image is scaled to fill
    /// the box so physical page size survives any rasterization scale.
    pub fn add_image_page(
        &mut self,
        jpeg_data: &[u8],
        pixel_width: u32,
        pixel_height: u32,
        width_pts: f32,
        height_pts: f32,
    ) -> lopdf::ObjectId {
        let image_id = self.add_image_xobject(jpeg_data, pixel_width, pixel_height);

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set("Im0", Object::Reference(image_id));

        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes = Self::build_image_content_stream("Im0", width_pts, height_pts);
        let content_stream = Stream::new(dictionary! {}, content_bytes);
        let content_id = self.doc.add_object(Object::Stream(content_stream));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width_pts),
                Object::Real(height_pts),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });

        self.page_ids.push(page_id);
        page_id
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Mutable access to the document under construction, for metadata
    /// attachment before serialization.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Wire up the page tree and serialize the document to bytes.
    pub fn save_to_bytes(mut self) -> crate::error::Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| crate::error::SqueezeError::encoding(e.to_string()))?;
        Ok(buf)
    }
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}
