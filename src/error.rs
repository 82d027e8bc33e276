use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure an asset load can raise. A load either returns a complete
/// result or exactly one of these.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unexpected end of data: needed {needed} more byte(s)")]
    UnexpectedEndOfData { needed: usize },

    #[error("unsupported block compression codec '{0}'")]
    UnsupportedCodec(String),

    #[error("unknown image format in '{}'", .0.display())]
    UnknownImageFormat(PathBuf),

    #[error("image dimensions {width}x{height} are too large to decode")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported pixel format {0}")]
    UnsupportedPixelFormat(String),

    #[error("line {line}: {message}")]
    MalformedGeometry { line: usize, message: String },

    #[error("no registered loader matches '{0}'")]
    UnresolvedType(String),

    #[error("invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("referenced file does not exist: {}", .0.display())]
    MissingReference(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

pub type AssetResult<T> = Result<T, AssetError>;

impl AssetError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        AssetError::MalformedGeometry {
            line,
            message: message.into(),
        }
    }
}
