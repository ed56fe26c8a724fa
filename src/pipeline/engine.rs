// Strategy selection and batch orchestration.

use tracing::{debug, info, warn};

use crate::error::SqueezeError;
use crate::pipeline::progress::JobContext;
use crate::pipeline::request::{
    CompressionOutcome, CompressionRequest, CompressionResult, RequestMode, Strategy,
};
use crate::pipeline::target;
use crate::render::PageRasterizer;
use crate::repack::raster::RasterOptions;
use crate::repack::{RepackOutput, raster, structural};

/// Inputs smaller than this skip the raster strategy in Preset/Custom
/// modes; below it rasterization rarely helps and wastes time and memory.
pub const RASTER_MIN_INPUT_BYTES: u64 = 100 * 1024;

/// One document in a batch call.
pub struct BatchItem<'a> {
    /// Display name used in progress labels and logs.
    pub name: String,
    pub bytes: &'a [u8],
    pub request: CompressionRequest,
}

/// Stateless compression engine over an injected rasterizer.
///
/// Each call decodes the input fresh and owns its buffers for the
/// duration of that call only; nothing survives between invocations.
pub struct CompressionEngine<'r> {
    rasterizer: &'r dyn PageRasterizer,
}

impl<'r> CompressionEngine<'r> {
    pub fn new(rasterizer: &'r dyn PageRasterizer) -> Self {
        Self { rasterizer }
    }

    /// Compress one document.
    pub fn compress(
        &self,
        input: &[u8],
        request: &CompressionRequest,
        ctx: &JobContext<'_>,
    ) -> crate::error::Result<CompressionOutcome> {
        self.compress_named("document", input, request, ctx)
    }

    /// Compress one document, labelling progress and logs with `name`.
    pub fn compress_named(
        &self,
        name: &str,
        input: &[u8],
        request: &CompressionRequest,
        ctx: &JobContext<'_>,
    ) -> crate::error::Result<CompressionOutcome> {
        request.validate()?;

        let result = match request.mode {
            RequestMode::TargetSize { target_bytes } => {
                target::search(self.rasterizer, input, request, target_bytes, ctx, name)
            }
            RequestMode::Preset(_) | RequestMode::Custom => {
                self.select_best(input, request, ctx, name)
            }
        };

        match result {
            Ok(result) => {
                info!(
                    name,
                    strategy = %result.strategy,
                    original_size = result.original_size,
                    compressed_size = result.compressed_size,
                    "compression complete"
                );
                Ok(CompressionOutcome::Completed(result))
            }
            Err(SqueezeError::Cancelled) => Ok(CompressionOutcome::Cancelled),
            Err(e) => Err(e),
        }
    }

    /// Compress a batch of documents strictly in order.
    ///
    /// A per-document failure is recorded and the batch continues; a
    /// tripped cancel token marks the current and every remaining
    /// document `Cancelled`. Document-level progress is reported after
    /// each processed document.
    pub fn compress_all(
        &self,
        items: &[BatchItem<'_>],
        ctx: &JobContext<'_>,
    ) -> Vec<crate::error::Result<CompressionOutcome>> {
        let total = items.len() as u32;
        let mut results = Vec::with_capacity(items.len());
        let mut cancelled = false;

        for (index, item) in items.iter().enumerate() {
            if cancelled || ctx.check_cancelled().is_err() {
                cancelled = true;
                results.push(Ok(CompressionOutcome::Cancelled));
                continue;
            }

            let outcome = self.compress_named(&item.name, item.bytes, &item.request, ctx);
            match &outcome {
                Ok(CompressionOutcome::Cancelled) => {
                    cancelled = true;
                }
                Ok(CompressionOutcome::Completed(_)) => {
                    ctx.report(index as u32 + 1, total, "documents");
                }
                Err(e) => {
                    warn!(name = %item.name, error = %e, "document failed; batch continues");
                    ctx.report(index as u32 + 1, total, "documents");
                }
            }
            results.push(outcome);
        }

        results
    }

    /// Preset/Custom path: run both strategies, keep the smaller, fall
    /// back to the original bytes when neither wins.
    fn select_best(
        &self,
        input: &[u8],
        request: &CompressionRequest,
        ctx: &JobContext<'_>,
        name: &str,
    ) -> crate::error::Result<CompressionResult> {
        ctx.check_cancelled()?;
        let original_size = input.len() as u64;

        // Structural is cheap and always attempted.
        let mut structural_err = None;
        let structural_out = match structural::repack(input, request.strip_metadata) {
            Ok(out) => Some(out),
            Err(e) => {
                warn!(name, error = %e, "structural repack failed");
                structural_err = Some(e);
                None
            }
        };

        // Raster only pays off on inputs above the threshold.
        let mut raster_err = None;
        let raster_out = if original_size > RASTER_MIN_INPUT_BYTES {
            let opts = RasterOptions {
                quality: request.quality,
                resolution_factor: request.resolution_factor,
                strip_metadata: request.strip_metadata,
                grayscale: request.grayscale,
            };
            match raster::repack(input, &opts, self.rasterizer, ctx, name) {
                Ok(out) => Some(out),
                Err(SqueezeError::Cancelled) => return Err(SqueezeError::Cancelled),
                Err(e) => {
                    warn!(name, error = %e, "raster repack failed");
                    raster_err = Some(e);
                    None
                }
            }
        } else {
            debug!(name, original_size, "raster skipped: input below threshold");
            // Keep the aggregate progress bar monotonic even though no
            // pages were rasterized.
            if let Some(out) = &structural_out {
                ctx.report(out.page_count, out.page_count, name);
            }
            None
        };

        let (chosen, strategy) = match (structural_out, raster_out) {
            (Some(s), Some(r)) => {
                if r.bytes.len() < s.bytes.len() {
                    (r, Strategy::Raster)
                } else {
                    (s, Strategy::Structural)
                }
            }
            (Some(s), None) => (s, Strategy::Structural),
            (None, Some(r)) => (r, Strategy::Raster),
            (None, None) => {
                // Undecodable by both paths: fatal for this document.
                return Err(structural_err.or(raster_err).unwrap_or_else(|| {
                    SqueezeError::decode("document unreadable by every strategy")
                }));
            }
        };

        debug!(
            name,
            strategy = %strategy,
            candidate_size = chosen.bytes.len(),
            original_size,
            "strategy selected"
        );

        Ok(finalize(input, original_size, chosen, strategy, None))
    }
}

/// Apply the no-regression invariant and assemble the result.
///
/// A candidate at least as large as the input is discarded in favor of
/// the unchanged original bytes with `strategy = None`; this is a silent,
/// correct fallback rather than an error.
pub(crate) fn finalize(
    input: &[u8],
    original_size: u64,
    chosen: RepackOutput,
    strategy: Strategy,
    target_bytes: Option<u64>,
) -> CompressionResult {
    let RepackOutput { bytes, page_count } = chosen;
    let candidate_size = bytes.len() as u64;

    let (bytes, compressed_size, strategy) = if candidate_size >= original_size {
        debug!(
            candidate_size,
            original_size, "no-regression fallback: returning original bytes"
        );
        (input.to_vec(), original_size, Strategy::None)
    } else {
        (bytes, candidate_size, strategy)
    };

    CompressionResult {
        bytes,
        original_size,
        compressed_size,
        page_count,
        strategy,
        target_met: target_bytes.map(|target| compressed_size <= target),
    }
}
