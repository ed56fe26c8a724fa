use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqueezeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document decode error: {0}")]
    DecodeError(String),

    #[error("Raster error: {0}")]
    RasterError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Internal marker raised when a [`CancelToken`](crate::pipeline::progress::CancelToken)
    /// trips mid-document. The engine converts it into
    /// [`CompressionOutcome::Cancelled`](crate::pipeline::request::CompressionOutcome)
    /// before it reaches callers.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`SqueezeError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl SqueezeError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a document decode error.
    decode => DecodeError,
    /// Create a raster error.
    raster => RasterError,
    /// Create an encoding error.
    encoding => EncodingError,
}

impl From<lopdf::Error> for SqueezeError {
    fn from(e: lopdf::Error) -> Self {
        Self::DecodeError(e.to_string())
    }
}

impl From<image::ImageError> for SqueezeError {
    fn from(e: image::ImageError) -> Self {
        Self::RasterError(e.to_string())
    }
}

impl From<serde_yml::Error> for SqueezeError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "render")]
impl From<pdfium_render::prelude::PdfiumError> for SqueezeError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RasterError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SqueezeError>;
