//! Error type shared by the conversion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Any failure that aborts a conversion run.
///
/// A label file without a matching image is not an error: it is logged and
/// counted in [`ProcessingStats`](crate::types::ProcessingStats) instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid label in {}:{line}: {message}", .path.display())]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to read image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to list {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },

    #[error("failed to serialize COCO file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid category configuration: {0}")]
    Categories(String),

    #[error("{0} id space exhausted; lower the start id")]
    IdOverflow(&'static str),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ConvertError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
