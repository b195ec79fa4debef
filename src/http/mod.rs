//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → redirect middleware (301 or pass)
//!     → upstream.rs (forward once, relay response)
//!     → Send to client
//! ```

pub mod server;
pub mod upstream;

pub use server::{HttpServer, X_REQUEST_ID};
pub use upstream::Upstream;
