//! Avatar model subsystem.
//!
//! # Data Flow
//! ```text
//! bundled avatar.gltf / configured path (startup)
//!     → template.rs (parse once, read-only)
//!     → Arc<ModelTemplate>
//!
//! Per request (cache miss):
//!     ModelTemplate::instantiate (deep copy)
//!     → customize.rs (substitute material colours)
//!         → colour.rs (hex → RGBA8 → linear)
//!     → ModelDocument handed to the converter
//! ```
//!
//! # Design Decisions
//! - Only the fields the service touches are typed; everything else rides
//!   along in flattened JSON maps and is written back untouched
//! - The template never hands out mutable access

pub mod colour;
pub mod customize;
pub mod document;
pub mod template;

pub use customize::customize;
pub use document::{Buffer, BufferView, Material, ModelDocument, PbrMetallicRoughness};
pub use template::{ModelError, ModelTemplate};
