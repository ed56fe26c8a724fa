use lopdf::Document;

/// Read-only view over a decoded PDF document.
///
/// The engine is an in-memory transform, so documents are always decoded
/// from a byte slice rather than a path.
pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// Decode a PDF from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self { doc })
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Take ownership of the underlying lopdf document.
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Look up MediaBox on a page dictionary, following Parent links for
    /// inherited values.
    fn get_media_box(&self, dict: &lopdf::Dictionary) -> crate::error::Result<lopdf::Object> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            return Ok(obj.clone());
        }

        if let Ok(lopdf::Object::Reference(parent_id)) = dict.get(b"Parent") {
            let parent_dict = self.doc.get_dictionary(*parent_id)?;
            return self.get_media_box(parent_dict);
        }

        Err(crate::error::SqueezeError::decode("MediaBox not found"))
    }

    /// Page dimensions (width_pts, height_pts) for a 1-indexed page,
    /// derived from its MediaBox.
    pub fn page_dimensions(&self, page_num: u32) -> crate::error::Result<(f64, f64)> {
        let page_id = self.get_page_id(page_num)?;
        let page_dict = self.doc.get_dictionary(page_id)?;

        let media_box = self.get_media_box(page_dict)?;

        let media_box_array = media_box.as_array()?;
        if media_box_array.len() < 4 {
            return Err(crate::error::SqueezeError::decode("Invalid MediaBox"));
        }

        // MediaBox entries may be integers or reals
        let to_f64 = |obj: &lopdf::Object| -> crate::error::Result<f64> {
            match obj {
                lopdf::Object::Integer(i) => Ok(*i as f64),
                lopdf::Object::Real(f) => Ok(*f as f64),
                _ => Err(crate::error::SqueezeError::decode("Invalid MediaBox value")),
            }
        };

        let x0 = to_f64(&media_box_array[0])?;
        let y0 = to_f64(&media_box_array[1])?;
        let x1 = to_f64(&media_box_array[2])?;
        let y1 = to_f64(&media_box_array[3])?;

        let width = (x1 - x0).abs();
        let height = (y1 - y0).abs();

        if width <= 0.0 || height <= 0.0 {
            return Err(crate::error::SqueezeError::decode(
                "Invalid MediaBox: non-positive page dimensions",
            ));
        }

        // Upper bound from the PDF reference (14,400 pt ≈ 200 in per side).
        const PDF_MAX_DIMENSION_PT: f64 = 14_400.0;
        if width > PDF_MAX_DIMENSION_PT || height > PDF_MAX_DIMENSION_PT {
            return Err(crate::error::SqueezeError::decode(
                "Invalid MediaBox: page dimensions exceed PDF limits",
            ));
        }

        Ok((width, height))
    }

    /// ObjectId for a 1-indexed page number.
    fn get_page_id(&self, page_num: u32) -> crate::error::Result<lopdf::ObjectId> {
        let pages = self.doc.get_pages();
        pages.get(&page_num).copied().ok_or_else(|| {
            crate::error::SqueezeError::decode(format!("page {} not found", page_num))
        })
    }
}
