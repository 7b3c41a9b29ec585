//! Request parameter canonicalization.
//!
//! # Data Flow
//! ```text
//! query string pairs (any order, any casing)
//!     → normalizer.rs (sort by raw key, lower-case keys, palette check)
//!     → CanonicalParams (ordered slot → colour)
//!     → key.rs (compact JSON serialization)
//!     → CacheKey
//! ```
//!
//! # Design Decisions
//! - Invalid or unknown values are dropped, never reported
//! - Non-slot keys survive here; the customizer ignores them later
//! - Ordering comes from the raw keys so the key is independent of query order

pub mod key;
pub mod normalizer;

pub use key::CacheKey;
pub use normalizer::{normalize, CanonicalParams};
