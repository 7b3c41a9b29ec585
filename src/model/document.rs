//! glTF 2.0 document types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A glTF document with typed access to materials and buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,

    #[serde(rename = "bufferViews", default, skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<BufferView>,

    /// Untyped top-level properties (asset, nodes, meshes, accessors...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A material entry. The name is the colour slot identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "pbrMetallicRoughness", default, skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Material {
    /// Lower-cased material name, used to match colour slots.
    pub fn slot(&self) -> Option<String> {
        self.name.as_deref().map(str::to_lowercase)
    }

    pub fn base_color_factor(&self) -> Option<[f64; 4]> {
        self.pbr_metallic_roughness
            .as_ref()
            .and_then(|pbr| pbr.base_color_factor)
    }

    pub fn set_base_color_factor(&mut self, factor: [f64; 4]) {
        self.pbr_metallic_roughness
            .get_or_insert_with(PbrMetallicRoughness::default)
            .base_color_factor = Some(factor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PbrMetallicRoughness {
    #[serde(rename = "baseColorFactor", default, skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f64; 4]>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferView {
    pub buffer: usize,

    #[serde(rename = "byteOffset", default, skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<usize>,

    #[serde(rename = "byteLength")]
    pub byte_length: usize,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
