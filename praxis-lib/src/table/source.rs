//! Table data source
//!
//! Glue between the async world and the synchronous engine: every fetch
//! is tagged with a generation, and only the result of the newest
//! generation may be applied. Navigating away (or simply starting a newer
//! fetch) cancels what is in flight and makes any late result inert, so a
//! stale response can never overwrite fresher state.

use tokio_util::sync::CancellationToken;

use crate::api::CollectionChanged;
use crate::error::Error;
use crate::model::Entity;

/// Tracks fetch freshness for one table instance.
///
/// # Example
///
/// ```ignore
/// let mut source = TableSource::new(Entity::Clinics);
///
/// let fetch = source.start();
/// let result = fetch
///     .run(async { client.list(Entity::Clinics).execute().await })
///     .await;
///
/// if let Some(Ok(response)) = result {
///     if source.is_current(&fetch) {
///         engine.set_rows(response.into_inner().into_records());
///     }
/// }
/// ```
pub struct TableSource {
    entity: Entity,
    generation: u64,
    cancel: CancellationToken,
}

impl TableSource {
    /// Creates a source for the given collection.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// The collection this source feeds from.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns `true` if the event concerns this source's collection.
    pub fn invalidated_by(&self, event: &CollectionChanged) -> bool {
        event.entity == self.entity
    }

    /// Begins a new fetch: cancels anything in flight and hands out a
    /// ticket for the new generation.
    pub fn start(&mut self) -> Fetch {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;

        Fetch {
            generation: self.generation,
            cancel: self.cancel.clone(),
        }
    }

    /// Returns `true` if the ticket belongs to the newest fetch.
    ///
    /// The "is this result still relevant" check: call it before applying
    /// a completed fetch to shared state.
    pub fn is_current(&self, fetch: &Fetch) -> bool {
        fetch.generation == self.generation
    }

    /// The newest fetch generation.
    ///
    /// For callers that moved their ticket into a spawned future and only
    /// kept the number.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Cancels whatever is in flight without starting a new fetch.
    ///
    /// Used on unmount, so a response landing afterwards has nowhere to go.
    pub fn cancel_in_flight(&mut self) {
        self.cancel.cancel();
        self.generation += 1;
    }
}

/// A ticket for one fetch generation.
pub struct Fetch {
    generation: u64,
    cancel: CancellationToken,
}

impl Fetch {
    /// Runs the fetch future, racing it against cancellation.
    ///
    /// Returns `None` if the fetch was cancelled before completing.
    pub async fn run<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, Error>>,
    ) -> Option<Result<T, Error>> {
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = fut => Some(result),
        }
    }

    /// The generation this ticket belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newer_fetch_makes_older_ticket_stale() {
        let mut source = TableSource::new(Entity::Clinics);

        let first = source.start();
        let second = source.start();

        assert!(!source.is_current(&first));
        assert!(source.is_current(&second));
    }

    #[tokio::test]
    async fn starting_a_fetch_cancels_the_previous_one() {
        let mut source = TableSource::new(Entity::Clinics);

        let first = source.start();
        let _second = source.start();

        // The first fetch's future never completes; cancellation must win.
        let result = first
            .run(async {
                futures::future::pending::<Result<(), Error>>().await
            })
            .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn completed_fetch_passes_through() {
        let mut source = TableSource::new(Entity::Symptoms);

        let fetch = source.start();
        let result = fetch.run(async { Ok(7usize) }).await;

        assert!(source.is_current(&fetch));
        assert_eq!(result.unwrap().unwrap(), 7);
    }

    #[test]
    fn invalidation_matches_only_own_entity() {
        let source = TableSource::new(Entity::Clinics);

        assert!(source.invalidated_by(&CollectionChanged {
            entity: Entity::Clinics
        }));
        assert!(!source.invalidated_by(&CollectionChanged {
            entity: Entity::Symptoms
        }));
    }
}
