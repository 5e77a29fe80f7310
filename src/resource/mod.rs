// Submodules for separation of concerns
mod handler;
mod schema;
mod validate;

pub use handler::{Populate, ResourceHandler};
pub use schema::{DefaultValue, FieldKind, FieldRule, Schema};
pub use validate::{ValidationMode, apply_defaults, strip_unknown, validate};
pub(crate) use validate::as_f64;
