//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies)
//!     → handler (write authorization in http::auth)
//! Outgoing response:
//!     → headers.rs (nosniff, frame and referrer policy)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: multiple layers of protection
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
pub mod limits;

pub use headers::with_security_headers;
pub use limits::with_body_limit;
