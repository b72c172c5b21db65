//! Mutation gateway
//!
//! The single boundary through which writes leave the process. Each
//! [`Operation`] maps to exactly one network call; there is no automatic
//! retry. On success the gateway drops the affected collection from the
//! cache and publishes a [`CollectionChanged`] event so every reader of
//! that collection (tables, autocompletes) can refetch. On failure nothing
//! is invalidated and nothing is published.

use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Method;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::ApiError;
use crate::error::Error;
use crate::error::ServerErrorDetail;
use crate::model::Entity;
use crate::model::Record;
use crate::PraxisClient;

use super::crud::MutationOutcome;
use super::crud::Operation;

/// Notification that a collection's server-side contents changed.
///
/// Published after every successful mutation. Subscribers refetch; the
/// event deliberately carries no record data, only which collection moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChanged {
    /// The collection that was mutated.
    pub entity: Entity,
}

/// Performs remote writes and reconciles local cache state.
///
/// Cheap to clone; all clones share the same event channel.
///
/// # Example
///
/// ```ignore
/// let gateway = MutationGateway::new(client.clone());
/// let mut events = gateway.subscribe();
///
/// gateway.execute(Operation::delete(Entity::Clinics, id)).await?;
///
/// // every subscriber sees the change
/// assert_eq!(events.recv().await?.entity, Entity::Clinics);
/// ```
#[derive(Clone)]
pub struct MutationGateway {
    client: PraxisClient,
    events: broadcast::Sender<CollectionChanged>,
}

impl MutationGateway {
    /// Creates a gateway over the given client.
    pub fn new(client: PraxisClient) -> Self {
        let (events, _) = broadcast::channel(64);
        Self { client, events }
    }

    /// Subscribes to collection-change events.
    ///
    /// Receivers created after an event was published do not see it;
    /// subscribe before the first mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChanged> {
        self.events.subscribe()
    }

    /// Executes one operation: one network call, no retry.
    ///
    /// Success invalidates the collection's cache entries and publishes
    /// [`CollectionChanged`]. Failure returns the error untouched; the
    /// cache keeps whatever it had, and the caller decides about retrying.
    pub async fn execute(&self, operation: Operation) -> Result<MutationOutcome, Error> {
        let entity = operation.entity();
        let outcome = self.perform(operation).await?;

        if let Some(cache) = self.client.cache() {
            cache.remove_prefix(&entity.cache_prefix()).await;
        }
        // No receivers is fine; the event is best-effort fan-out.
        let _ = self.events.send(CollectionChanged { entity });

        Ok(outcome)
    }

    async fn perform(&self, operation: Operation) -> Result<MutationOutcome, Error> {
        match operation {
            Operation::Create { entity, record } => self.create(entity, record).await,
            Operation::Update { entity, id, record } => self.update(entity, id, record).await,
            Operation::Delete { entity, id } => self.delete(entity, id).await,
            Operation::BulkDelete { entity, ids } => self.bulk_delete(entity, ids).await,
        }
    }

    async fn create(&self, entity: Entity, record: Record) -> Result<MutationOutcome, Error> {
        let url = self.client.collection_url(entity);
        let payload = to_payload(&record)?;

        let response = self
            .client
            .request(Method::POST, &url, json_headers(), Some(payload))
            .await?;

        let record = decode_record(response, entity).await?;
        Ok(MutationOutcome::Created(record))
    }

    async fn update(
        &self,
        entity: Entity,
        id: Uuid,
        record: Record,
    ) -> Result<MutationOutcome, Error> {
        let url = self.client.record_url(entity, id);
        let payload = to_payload(&record)?;

        let response = self
            .client
            .request(Method::PATCH, &url, json_headers(), Some(payload))
            .await?;

        if response.status().as_u16() == 404 {
            return Err(Error::StaleReference { entity, id });
        }

        let record = decode_record(response, entity).await?;
        Ok(MutationOutcome::Updated(record))
    }

    async fn delete(&self, entity: Entity, id: Uuid) -> Result<MutationOutcome, Error> {
        let url = self.client.record_url(entity, id);

        let response = self
            .client
            .request(Method::DELETE, &url, json_headers(), None)
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(Error::StaleReference { entity, id });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status.as_u16(), &body).into());
        }

        Ok(MutationOutcome::Deleted { entity, id })
    }

    async fn bulk_delete(&self, entity: Entity, ids: Vec<Uuid>) -> Result<MutationOutcome, Error> {
        let url = format!("{}bulk_delete/", self.client.collection_url(entity));
        let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let mut body = serde_json::Map::new();
        body.insert(
            entity.bulk_delete_key().to_string(),
            serde_json::json!(id_strings),
        );
        let payload = serde_json::Value::Object(body);

        let response = self
            .client
            .request(Method::DELETE, &url, json_headers(), Some(payload))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status.as_u16(), &body).into());
        }

        Ok(MutationOutcome::BulkDeleted { entity, ids })
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Accept", HeaderValue::from_static("application/json"));
    headers
}

fn to_payload(record: &Record) -> Result<serde_json::Value, Error> {
    serde_json::to_value(record)
        .map_err(|e| Error::Api(ApiError::parse(format!("Payload serialization: {e}"))))
}

/// Decodes a create/update response body into the returned record.
async fn decode_record(response: reqwest::Response, entity: Entity) -> Result<Record, Error> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from)?;

    if !status.is_success() {
        return Err(http_error(status.as_u16(), &body).into());
    }

    let mut record: Record = serde_json::from_str(&body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;
    record.set_entity_name(entity.logical_name());
    Ok(record)
}

/// Builds an [`ApiError::Http`] from a status and raw error body.
///
/// The body is parsed for structured field errors; when it carries none,
/// the trimmed text becomes the message.
pub(crate) fn http_error(status: u16, body: &str) -> ApiError {
    match ServerErrorDetail::from_body(body) {
        Some(detail) => {
            let message = detail.summary();
            ApiError::http_with_detail(status, message, detail)
        }
        None => {
            let message = body.trim();
            let message = if message.is_empty() {
                "request failed".to_string()
            } else {
                message.chars().take(200).collect()
            };
            ApiError::http(status, message)
        }
    }
}
