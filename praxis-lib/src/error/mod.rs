//! Error types

mod api;
mod field;
mod server;
mod validation;

pub use api::*;
pub use field::*;
pub use server::*;
pub use validation::*;

use uuid::Uuid;

use crate::model::Entity;

/// Top-level error type for the praxis client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An API call failed (network, timeout, HTTP error, bad response).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local validation rejected the values before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The action's target record no longer exists server-side.
    #[error("{entity} record {id} no longer exists")]
    StaleReference {
        /// The collection the record belonged to.
        entity: Entity,
        /// The id that could not be found.
        id: Uuid,
    },

    /// The operation cannot be performed in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Returns `true` if retrying the same call may succeed.
    ///
    /// Stale references and validation failures are not retryable; the
    /// caller has to change something first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.is_retryable(),
            _ => false,
        }
    }

    /// Returns the per-field messages of a server rejection, if any.
    pub fn field_errors(&self) -> Option<&ServerErrorDetail> {
        match self {
            Error::Api(ApiError::Http { detail: Some(detail), .. }) => Some(detail.as_ref()),
            _ => None,
        }
    }
}
