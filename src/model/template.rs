//! Base model template.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::document::ModelDocument;

const BUNDLED_AVATAR: &str = include_str!("../../assets/avatar.gltf");

/// Errors raised while loading the template.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model template {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model template: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The read-only avatar every request starts from.
///
/// Customization always works on [`ModelTemplate::instantiate`], a deep
/// copy; the shared document is never handed out mutably.
#[derive(Debug)]
pub struct ModelTemplate {
    document: ModelDocument,
}

impl ModelTemplate {
    /// The avatar shipped with the binary.
    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_json_str(BUNDLED_AVATAR)
    }

    /// Load a glTF JSON document from disk.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let document: ModelDocument = serde_json::from_str(content)?;
        if document.materials.is_empty() {
            tracing::warn!("Model template has no materials; colour overrides will have no effect");
        }
        Ok(Self { document })
    }

    pub fn document(&self) -> &ModelDocument {
        &self.document
    }

    /// Deep copy of the template for a single customization.
    pub fn instantiate(&self) -> ModelDocument {
        self.document.clone()
    }

    /// Lower-cased names of all named materials, in document order.
    pub fn slots(&self) -> Vec<String> {
        self.document.materials.iter().filter_map(|m| m.slot()).collect()
    }
}
