//! Shared HTTP plumbing used by both routers.
//!
//! # Data Flow
//! ```text
//! request
//!     → cors.rs (OPTIONS short-circuit; CORS on every response)
//!     → handler
//!     → mime.rs (extension → Content-Type for file bodies)
//!     → rewrite.rs (viewer bodies only: origin rewrite + script injection)
//! ```

pub mod cors;
pub mod mime;
pub mod rewrite;
