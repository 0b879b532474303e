//! Sanitization and validation subsystem.
//!
//! # Data Flow
//! ```text
//! candidate (untyped JSON) + current document
//!     → validator.rs (walk schema fields in order)
//!         → sanitizer.rs / builtins.rs (per-field cleanup)
//!     → ValidationOutcome { document, errors }
//! ```
//!
//! # Design Decisions
//! - Never rejects a write: invalid input is coerced to a safe value
//! - Errors are data (collected), not `Err` returns
//! - No I/O and no authorization here; the service layer does both

pub mod builtins;
pub mod error;
pub mod sanitizer;
pub mod validator;

pub use error::ValidationError;
pub use sanitizer::{SanitizeFn, Sanitizer, SanitizerRegistry};
pub use validator::{validate, ValidationOutcome};
