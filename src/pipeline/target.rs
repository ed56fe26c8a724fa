// Target-size mode: bounded binary search over raster quality.

use tracing::{debug, warn};

use crate::error::SqueezeError;
use crate::pipeline::engine::finalize;
use crate::pipeline::progress::{JobContext, Progress};
use crate::pipeline::request::{CompressionRequest, CompressionResult, Strategy};
use crate::render::PageRasterizer;
use crate::repack::raster::RasterOptions;
use crate::repack::{RepackOutput, raster, structural};

pub(crate) const QUALITY_FLOOR: u8 = 5;
pub(crate) const QUALITY_CEILING: u8 = 95;
/// Hard cap on raster compressions per document.
pub(crate) const MAX_PROBES: u32 = 6;

/// A probe whose combined candidate met the byte budget. `raster: None`
/// means the once-computed structural candidate was the smaller of the
/// two for that probe.
struct ProbeWin {
    quality: u8,
    raster: Option<RepackOutput>,
}

/// Find the highest quality in `[5, 95]` whose output fits `target_bytes`.
///
/// Output size is not strictly monotonic in quality, so every candidate
/// is checked against the budget rather than trusted; the search is
/// deliberately bounded at [`MAX_PROBES`] full compressions and accepts a
/// near-boundary answer over an exact one. Probes force grayscale on,
/// the most reliable lever for aggressive targets. When no probe fits the
/// budget, the last allowed probe runs at the floor quality and its
/// result is returned as best effort with `target_met = Some(false)`.
pub(crate) fn search(
    rasterizer: &dyn PageRasterizer,
    input: &[u8],
    request: &CompressionRequest,
    target_bytes: u64,
    ctx: &JobContext<'_>,
    name: &str,
) -> crate::error::Result<CompressionResult> {
    ctx.check_cancelled()?;
    let original_size = input.len() as u64;

    // The structural candidate does not vary with quality: compute it
    // once and fold it into every probe's comparison.
    let mut structural_out = match structural::repack(input, request.strip_metadata) {
        Ok(out) => Some(out),
        Err(e) => {
            warn!(name, error = %e, "structural repack failed");
            None
        }
    };

    let page_count = match rasterizer.page_count(input) {
        Ok(n) if n > 0 => n,
        res => {
            // The raster path cannot probe this document. With a
            // structural candidate the search degrades to that single
            // answer; without one the document is unreadable everywhere.
            let Some(out) = structural_out.take() else {
                return Err(match res {
                    Err(e) => e,
                    Ok(_) => SqueezeError::raster("document has no pages"),
                });
            };
            warn!(name, "target search degraded: raster path unavailable");
            return Ok(finalize(
                input,
                original_size,
                out,
                Strategy::Structural,
                Some(target_bytes),
            ));
        }
    };

    let total_units = MAX_PROBES * page_count;
    let structural_size = structural_out.as_ref().map(|out| out.bytes.len());

    let mut low = QUALITY_FLOOR;
    let mut high = QUALITY_CEILING;
    let mut best: Option<ProbeWin> = None;
    // Most recent over-budget raster output; becomes the best-effort
    // answer when nothing fits.
    let mut fallback: Option<RepackOutput> = None;
    let mut last_raster_err: Option<SqueezeError> = None;

    let mut probes = 0u32;
    while low <= high && probes < MAX_PROBES {
        let final_probe = probes == MAX_PROBES - 1;
        // Entering the last allowed probe empty-handed, spend it on the
        // floor of the remaining range (quality 5 in a fully-failing
        // search) instead of the midpoint.
        let mid = if final_probe && best.is_none() {
            low
        } else {
            ((u16::from(low) + u16::from(high) + 1) / 2) as u8
        };

        let probe_base = probes * page_count;
        let probe_progress = |p: Progress<'_>| {
            ctx.report(probe_base + p.completed, total_units, p.label);
        };
        let mut probe_ctx = JobContext::new().with_progress(&probe_progress);
        if let Some(token) = ctx.cancel_token() {
            probe_ctx = probe_ctx.with_cancel(token);
        }

        let opts = RasterOptions {
            quality: mid,
            resolution_factor: request.resolution_factor,
            strip_metadata: request.strip_metadata,
            grayscale: true,
        };
        let outcome = raster::repack(input, &opts, rasterizer, &probe_ctx, name);
        probes += 1;

        match outcome {
            Ok(raster_out) => {
                let raster_smaller =
                    structural_size.is_none_or(|s| raster_out.bytes.len() < s);
                let candidate_size = if raster_smaller {
                    raster_out.bytes.len()
                } else {
                    structural_size.unwrap_or(usize::MAX)
                };
                debug!(
                    name,
                    quality = mid,
                    candidate_size,
                    target_bytes,
                    "target probe"
                );

                if candidate_size as u64 <= target_bytes {
                    best = Some(ProbeWin {
                        quality: mid,
                        raster: raster_smaller.then_some(raster_out),
                    });
                    low = mid + 1;
                } else {
                    fallback = Some(raster_out);
                    high = mid - 1;
                }
            }
            Err(SqueezeError::Cancelled) => return Err(SqueezeError::Cancelled),
            Err(e) => {
                warn!(name, quality = mid, error = %e, "target probe failed");
                last_raster_err = Some(e);
                high = mid - 1;
            }
        }
    }

    let (chosen, strategy) = match best {
        Some(win) => {
            debug!(name, quality = win.quality, "target search converged");
            match win.raster {
                Some(out) => (out, Strategy::Raster),
                None => match structural_out.take() {
                    Some(out) => (out, Strategy::Structural),
                    None => unreachable!("structural probe win requires a structural candidate"),
                },
            }
        }
        None => {
            debug!(name, "no probe met the byte budget; returning best effort");
            match (fallback, structural_out.take()) {
                (Some(r), Some(s)) => {
                    if r.bytes.len() <= s.bytes.len() {
                        (r, Strategy::Raster)
                    } else {
                        (s, Strategy::Structural)
                    }
                }
                (Some(r), None) => (r, Strategy::Raster),
                (None, Some(s)) => (s, Strategy::Structural),
                (None, None) => {
                    return Err(last_raster_err.unwrap_or_else(|| {
                        SqueezeError::decode("document unreadable by every strategy")
                    }));
                }
            }
        }
    };

    ctx.report(total_units, total_units, name);

    Ok(finalize(
        input,
        original_size,
        chosen,
        strategy,
        Some(target_bytes),
    ))
}
