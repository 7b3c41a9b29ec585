//! Request pipeline.
//!
//! # Data Flow
//! ```text
//! raw query pairs
//!     → params::normalize → CanonicalParams → CacheKey
//!     → per-format stage
//!         cache hit  → Bytes                         (hit)
//!         in flight  → await the running conversion  (joined)
//!         miss       → spawn: customize → encode → store → Bytes (miss)
//! ```
//!
//! # Design Decisions
//! - Conversions run as detached tasks; an abandoned request still fills the cache
//! - One conversion per key at a time (in-flight map), unless disabled by config
//! - Failed conversions are never cached; the next request retries
//! - Each output format has its own cache, keyed by the bare parameter key

pub mod generator;

pub use generator::{AvatarPipeline, CacheStatus, Generated, PipelineBuilder, PipelineError};
