// Document Info dictionary handling: read, copy, clear.

use lopdf::{Document, Object};

/// The standard Info-dictionary fields the engine manipulates.
pub const INFO_FIELDS: [&[u8]; 6] = [
    b"Title",
    b"Author",
    b"Subject",
    b"Keywords",
    b"Producer",
    b"Creator",
];

fn info_dict_id(doc: &Document) -> Option<lopdf::ObjectId> {
    match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    }
}

/// Clear the standard Info fields to empty strings.
///
/// Documents without an Info dictionary are left untouched; there is
/// nothing to strip.
pub fn strip_document_info(doc: &mut Document) {
    let Some(info_id) = info_dict_id(doc) else {
        return;
    };
    let Ok(info) = doc.get_dictionary_mut(info_id) else {
        return;
    };
    for field in INFO_FIELDS {
        if info.has(field) {
            info.set(field, Object::string_literal(""));
        }
    }
}

/// Read the standard Info fields present on a document.
pub fn document_info(doc: &Document) -> Vec<(Vec<u8>, Object)> {
    let Some(info_id) = info_dict_id(doc) else {
        return Vec::new();
    };
    let Ok(info) = doc.get_dictionary(info_id) else {
        return Vec::new();
    };
    INFO_FIELDS
        .iter()
        .filter_map(|&field| {
            info.get(field)
                .ok()
                .map(|obj| (field.to_vec(), obj.clone()))
        })
        .collect()
}

/// Attach Info fields to a document, creating its Info dictionary.
///
/// Used by the raster strategy to carry source metadata over to the
/// freshly built output when the caller did not ask for stripping.
pub fn set_document_info(doc: &mut Document, fields: &[(Vec<u8>, Object)]) {
    if fields.is_empty() {
        return;
    }
    let mut info = lopdf::Dictionary::new();
    for (field, value) in fields {
        info.set(field.clone(), value.clone());
    }
    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));
}
