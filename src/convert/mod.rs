//! Model conversion subsystem.
//!
//! # Data Flow
//! ```text
//! customized ModelDocument
//!     → ConversionAdapter::encode (async, may fail)
//!         glb.rs  : embedded buffers → single BIN chunk → GLB container
//!         gltf.rs : compact glTF JSON
//!     → Bytes artifact (cached by the pipeline)
//! ```
//!
//! # Design Decisions
//! - Adapters sit behind a trait so the pipeline can be driven by test doubles
//! - Heavy packing runs on the blocking pool, never on a runtime worker
//! - Mesh compression is part of the interface; built-ins report they lack it

pub mod adapter;
pub mod format;
pub mod glb;
pub mod gltf;

pub use adapter::{ConversionAdapter, ConvertError, EncodeOptions};
pub use format::ModelFormat;
pub use glb::{pack_glb, unpack_glb, GlbPackager};
pub use gltf::GltfWriter;
