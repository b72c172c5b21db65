//! Autocomplete endpoint client
//!
//! Each collection exposes `autocomplete/?search=<q>&limit=<n>` returning
//! bounded `{value, label}` candidates for the multi-select form controls.
//! An empty query yields the initial candidate set: the first page of the
//! plain list endpoint, mapped to the same pair shape.

use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Method;
use serde::Deserialize;

use crate::cache::CachedValue;
use crate::error::Error;
use crate::model::Entity;
use crate::model::Record;
use crate::PraxisClient;

use super::gateway::http_error;

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutocompleteEntry {
    /// The value submitted when the candidate is picked (the record id).
    pub value: String,
    /// The label shown to the user.
    pub label: String,
}

/// Builder for autocomplete requests.
///
/// # Example
///
/// ```ignore
/// let candidates = client.autocomplete(Entity::Symptoms)
///     .search("cou")
///     .limit(10)
///     .execute()
///     .await?;
/// ```
pub struct AutocompleteRequest<'a> {
    client: &'a PraxisClient,
    entity: Entity,
    search: String,
    limit: usize,
}

impl<'a> AutocompleteRequest<'a> {
    /// Creates a new autocomplete request for the given collection.
    pub(crate) fn new(client: &'a PraxisClient, entity: Entity) -> Self {
        Self {
            client,
            entity,
            search: String::new(),
            limit: 10,
        }
    }

    /// Sets the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Bounds the candidate list.
    ///
    /// Defaults to 10.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Builds the autocomplete URL (non-empty search only).
    pub(crate) fn build_url(&self) -> String {
        format!(
            "{}autocomplete/?search={}&limit={}",
            self.client.collection_url(self.entity),
            urlencoding::encode(self.search.trim()),
            self.limit
        )
    }

    /// Executes the request.
    ///
    /// A blank search falls back to the first page of the list endpoint so
    /// the control has something to offer before the user types. Candidate
    /// sets are cached under the collection's prefix, so a mutation through
    /// the gateway drops them together with the list pages.
    pub async fn execute(self) -> Result<Vec<AutocompleteEntry>, Error> {
        if self.search.trim().is_empty() {
            return self.initial_candidates().await;
        }

        let url = self.build_url();
        let cache_key = format!("{}autocomplete:{}", self.entity.cache_prefix(), url);
        let ttl = self.client.cache_config().autocomplete_ttl;

        if !ttl.is_zero() {
            if let Some(cache) = self.client.cache() {
                if let Some(cached) = cache.get(&cache_key).await {
                    if let Ok(entries) = serde_json::from_slice(&cached.data) {
                        return Ok(entries);
                    }
                }
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let response = self.client.request(Method::GET, &url, headers, None).await?;
        let status = response.status();
        let body = response.text().await.map_err(crate::error::ApiError::from)?;

        if !status.is_success() {
            return Err(http_error(status.as_u16(), &body).into());
        }

        let entries: Vec<AutocompleteEntry> = serde_json::from_str(&body)
            .map_err(|e| crate::error::ApiError::parse_with_body(e.to_string(), body.clone()))?;

        if !ttl.is_zero() {
            if let Some(cache) = self.client.cache() {
                cache
                    .set(&cache_key, CachedValue::with_ttl(body.into_bytes(), ttl))
                    .await;
            }
        }

        Ok(entries)
    }

    async fn initial_candidates(self) -> Result<Vec<AutocompleteEntry>, Error> {
        let response = self
            .client
            .list(self.entity)
            .page_size(self.limit)
            .execute()
            .await?;

        let entries = response
            .into_inner()
            .into_records()
            .into_iter()
            .take(self.limit)
            .map(entry_from_record)
            .collect();
        Ok(entries)
    }
}

fn entry_from_record(record: Record) -> AutocompleteEntry {
    let label = record
        .get_string("name")
        .ok()
        .flatten()
        .map(str::to_string)
        .unwrap_or_else(|| {
            record
                .get("name")
                .map(|v| v.display_string())
                .unwrap_or_default()
        });
    let value = record
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| label.clone());

    AutocompleteEntry { value, label }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_autocomplete_url() {
        let client = PraxisClient::builder()
            .url("https://practice.example.org")
            .build();

        let url = client
            .autocomplete(Entity::Symptoms)
            .search("cou gh")
            .limit(5)
            .build_url();

        assert_eq!(
            url,
            "https://practice.example.org/api/others/symptoms/autocomplete/?search=cou%20gh&limit=5"
        );
    }

    #[test]
    fn maps_records_to_entries() {
        let id: uuid::Uuid = "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102".parse().unwrap();
        let record = Record::with_id("symptom", id).set("name", "cough");

        let entry = entry_from_record(record);

        assert_eq!(entry.value, id.to_string());
        assert_eq!(entry.label, "cough");
    }
}
