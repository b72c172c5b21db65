//! Form session state
//!
//! Per-entity create/edit form state: field values, schema validation,
//! conditional visibility driven by sibling values, and submission through
//! the mutation gateway.

mod presets;
mod schema;
mod session;
mod visibility;

pub use presets::*;
pub use schema::*;
pub use session::*;
pub use visibility::*;
