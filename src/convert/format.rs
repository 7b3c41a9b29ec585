//! Output formats and their content types.

use std::fmt;

/// Transport encoding requested by the path extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// Binary glTF container (`.glb`).
    Glb,
    /// glTF JSON with embedded buffers (`.gltf`).
    Gltf,
}

impl ModelFormat {
    /// Match a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("glb") {
            Some(ModelFormat::Glb)
        } else if ext.eq_ignore_ascii_case("gltf") {
            Some(ModelFormat::Gltf)
        } else {
            None
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ModelFormat::Glb => "model/gltf-binary",
            ModelFormat::Gltf => "model/gltf+json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelFormat::Glb => "glb",
            ModelFormat::Gltf => "gltf",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
