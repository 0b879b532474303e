//! Settings schema subsystem.
//!
//! # Data Flow
//! ```text
//! builtin.rs (plugin schema) or json.rs (schema file)
//!     → SchemaBuilder + extension hooks (applied once)
//!     → SchemaModel (frozen, immutable)
//!     → shared via Arc with the validator and the service
//! ```
//!
//! # Design Decisions
//! - Node kinds are a closed enum; dispatch on them is exhaustive
//! - Hooks are applied at construction only, there is no re-registration
//! - Every top-level property is a section and must be an object node

pub mod builtin;
pub mod json;
pub mod model;
pub mod node;

pub use model::{FieldRef, SchemaBuilder, SchemaError, SchemaHook, SchemaModel};
pub use node::{LeafNode, ObjectNode, SchemaNode};
