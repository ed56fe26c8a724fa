// Lossless strategy: re-serialize the document, dropping dead weight.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object};
use tracing::debug;

use crate::codec::{metadata, reader::PdfReader};
use crate::repack::RepackOutput;

/// Rebuild the document through the codec without touching page content.
///
/// Re-serialization is where bloated inputs shrink losslessly: objects
/// unreachable from the trailer (orphaned streams, stale revisions) are
/// pruned, and streams that shipped raw are deflated. Page order and
/// geometry are untouched by construction.
///
/// Fails with `DecodeError` when the source cannot be parsed at all;
/// the engine treats that as fatal for this strategy only.
pub fn repack(bytes: &[u8], strip_metadata: bool) -> crate::error::Result<RepackOutput> {
    let reader = PdfReader::from_bytes(bytes)?;
    let page_count = reader.page_count();
    let mut doc = reader.into_document();

    if strip_metadata {
        metadata::strip_document_info(&mut doc);
    }

    // Prune before deflating: orphaned streams are dropped, not compressed.
    doc.prune_objects();
    deflate_raw_streams(&mut doc);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| crate::error::SqueezeError::encoding(e.to_string()))?;

    debug!(
        input_bytes = bytes.len(),
        output_bytes = buf.len(),
        page_count,
        "structural repack complete"
    );

    Ok(RepackOutput {
        bytes: buf,
        page_count,
    })
}

/// Apply FlateDecode to every stream that carries no filter yet.
///
/// The deflated form is kept only when it is actually smaller; tiny
/// streams where the zlib envelope outweighs the payload stay raw.
fn deflate_raw_streams(doc: &mut Document) {
    for object in doc.objects.values_mut() {
        let Object::Stream(stream) = object else {
            continue;
        };
        if stream.dict.has(b"Filter") {
            continue;
        }

        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(stream.content.len()),
            Compression::default(),
        );
        let compressed = encoder
            .write_all(&stream.content)
            .and_then(|_| encoder.finish());

        if let Ok(compressed) = compressed
            && compressed.len() < stream.content.len()
        {
            stream.dict.set("Filter", "FlateDecode");
            stream.set_content(compressed);
        }
    }
}
