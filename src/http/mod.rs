//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → avatar.rs (path → format, query → pipeline)
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod avatar;
pub mod request;
pub mod response;
pub mod server;

pub use avatar::X_AVATAR_CACHE;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::AppError;
pub use server::{AppState, HttpServer};
