//! Conversion adapter interface and errors.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ModelDocument;

/// Options passed to every encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Request mesh compression.
    pub compression: bool,
    /// Compression effort, 0 (fastest) to 10 (smallest).
    pub compression_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression: false,
            compression_level: 10,
        }
    }
}

/// Errors that can occur while encoding a model.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The adapter does not implement a requested feature.
    #[error("unsupported conversion feature: {0}")]
    Unsupported(&'static str),

    /// A buffer references data that is not embedded in the document.
    #[error("buffer {index} is not an embedded base64 data URI")]
    ExternalBuffer { index: usize },

    /// Embedded buffer payload is not valid base64.
    #[error("buffer {index} has invalid base64 payload: {source}")]
    Base64 {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// Embedded buffer is shorter than its declared byte length.
    #[error("buffer {index} declares {expected} bytes but holds {actual}")]
    BufferLength {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// A buffer view points at a buffer that does not exist.
    #[error("buffer view {view} references missing buffer {buffer}")]
    DanglingBufferView { view: usize, buffer: usize },

    /// Container would exceed the 4 GiB GLB limit.
    #[error("encoded model exceeds the GLB size limit")]
    TooLarge,

    /// Malformed GLB container.
    #[error("invalid GLB container: {0}")]
    InvalidContainer(&'static str),

    #[error("model JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker running the conversion panicked or was cancelled.
    #[error("conversion worker failed: {0}")]
    Worker(String),
}

/// Produces the transport encoding of a model.
#[async_trait]
pub trait ConversionAdapter: Send + Sync + std::fmt::Debug {
    /// Encode `model` into its binary artifact.
    async fn encode(&self, model: ModelDocument, options: EncodeOptions) -> Result<Bytes, ConvertError>;

    /// Whether `EncodeOptions::compression` can be honoured.
    fn supports_compression(&self) -> bool {
        false
    }
}
