//! Generation cache subsystem.
//!
//! # Data Flow
//! ```text
//! pipeline (per format)
//!     → Mutex<GenerationCache<Bytes>>
//!         has(key)      : presence, recency untouched
//!         get(key)      : value, entry becomes most recent
//!         set(key, v)   : insert/replace, evict least recent when full
//! ```
//!
//! # Design Decisions
//! - Explicit hash map + index-linked recency list; no reliance on map ordering
//! - Nodes live in a slab, freed slots are reused, so memory stays at capacity
//! - Not internally synchronized; callers hold one lock per cache

pub mod lru;

pub use lru::GenerationCache;

/// Default number of artifacts kept per output format.
pub const DEFAULT_CAPACITY: usize = 50;
