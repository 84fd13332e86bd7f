// crates/skyfire_shared/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring an asset (texture, sound, font) into a device.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("unsupported asset '{path}': {reason}")]
    Unsupported { path: PathBuf, reason: String },
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unsupported {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
