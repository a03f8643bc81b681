//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request id + trace middleware)
//!     → handlers.rs (parameter checks, ChainClient call)
//!     → render.rs (plain-text `===` blocks or `Error:` line)
//!     → Send to client
//! ```

pub mod handlers;
pub mod render;
pub mod request;
pub mod server;

pub use handlers::AppState;
pub use request::X_REQUEST_ID;
pub use server::{build_router, HttpServer};
