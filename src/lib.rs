//! Avatar colour customization server library.

// Core subsystems
pub mod config;
pub mod http;
pub mod pipeline;

// Domain
pub mod cache;
pub mod convert;
pub mod model;
pub mod palette;
pub mod params;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AvatarConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::AvatarPipeline;
