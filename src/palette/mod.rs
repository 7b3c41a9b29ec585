//! Colour palette subsystem.
//!
//! # Data Flow
//! ```text
//! config.palette.colors (startup)
//!     → Palette::from_tokens (normalize, dedupe)
//!     → Arc<Palette> shared by normalizer and customizer
//!
//! Per request:
//!     raw token ("#F7F6F5") → normalize_token → "f7f6f5" → set membership
//! ```
//!
//! # Design Decisions
//! - Palette is immutable once built; no interior mutability
//! - Validation is total: malformed tokens are simply "not in the palette"
//! - Case and a single leading `#` marker are ignored

pub mod validator;

pub use validator::{normalize_token, Palette, PaletteError, DEFAULT_COLORS};
