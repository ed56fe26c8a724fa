//! PDF compression engine: lossless structural repacking, lossy
//! rasterize-and-re-embed repacking, and a bounded search for
//! size-targeted requests.

pub mod codec;
pub mod config;
pub mod error;
pub mod estimate;
pub mod pipeline;
pub mod render;
pub mod repack;

pub use error::{Result, SqueezeError};
pub use pipeline::engine::{BatchItem, CompressionEngine, RASTER_MIN_INPUT_BYTES};
pub use pipeline::progress::{CancelToken, JobContext, Progress};
pub use pipeline::request::{
    CompressionOutcome, CompressionRequest, CompressionResult, PresetLevel, RequestMode, Strategy,
};
