//! Headless table state
//!
//! The engine owns everything the user currently sees in a table: rows,
//! search text, filters, sort, pagination, column visibility and row
//! selection. Rendering is someone else's job; the shell reads
//! [`TableEngine::visible_rows`] and draws.

mod column;
mod engine;
mod filter;
mod row;
mod source;

pub use column::*;
pub use engine::*;
pub use filter::*;
pub use row::*;
pub use source::*;
