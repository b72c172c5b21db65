//! API operations and wire types

pub mod autocomplete;
pub mod crud;
pub mod gateway;
pub mod order;
pub mod page;
pub mod pages;
pub mod query;

pub use crud::*;
pub use gateway::*;
pub use order::*;
pub use page::*;
pub use pages::*;
pub use query::*;
