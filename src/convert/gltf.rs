//! glTF JSON output.

use async_trait::async_trait;
use bytes::Bytes;

use crate::convert::adapter::{ConversionAdapter, ConvertError, EncodeOptions};
use crate::model::ModelDocument;

/// Serializes documents as compact glTF JSON, buffers stay embedded.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfWriter;

#[async_trait]
impl ConversionAdapter for GltfWriter {
    async fn encode(&self, model: ModelDocument, options: EncodeOptions) -> Result<Bytes, ConvertError> {
        if options.compression {
            return Err(ConvertError::Unsupported("mesh compression"));
        }
        Ok(Bytes::from(serde_json::to_vec(&model)?))
    }
}
