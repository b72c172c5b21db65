//! Page type and list-body decoding
//!
//! List endpoints answer with either a flat JSON array of records or the
//! paginated envelope `{count, next, previous, page_size, current_page,
//! total_pages, has_next, has_previous, results}`. Both shapes decode into
//! [`Page`]; the envelope takes precedence when present.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::Entity;
use crate::model::Record;

/// A page of list results with pagination information.
///
/// # Example
///
/// ```ignore
/// let page = client.list(Entity::Patients).execute().await?.into_inner();
///
/// for record in page.records() {
///     println!("{:?}", record.get_string("name"));
/// }
///
/// if page.has_more() {
///     // follow page.next_link() or use into_pages()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    records: Vec<Record>,
    next_link: Option<String>,
    previous_link: Option<String>,
    total_count: Option<usize>,
    total_pages: Option<usize>,
    current_page: Option<usize>,
}

impl Page {
    /// Creates a new page with records and no pagination info (flat array).
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            next_link: None,
            previous_link: None,
            total_count: None,
            total_pages: None,
            current_page: None,
        }
    }

    /// Decodes a list-endpoint body, accepting both response shapes.
    ///
    /// Every decoded record is stamped with the collection's logical name,
    /// since the wire format does not carry one.
    pub fn decode(body: &str, entity: Entity) -> Result<Page, ApiError> {
        let parsed: ListBody = serde_json::from_str(body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;

        let mut page = match parsed {
            ListBody::Envelope(envelope) => Page {
                records: envelope.results,
                next_link: envelope.next,
                previous_link: envelope.previous,
                total_count: Some(envelope.count),
                total_pages: envelope.total_pages,
                current_page: envelope.current_page,
            },
            ListBody::Flat(records) => Page::new(records),
        };

        for record in &mut page.records {
            record.set_entity_name(entity.logical_name());
        }

        Ok(page)
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the link for fetching the next page, if available.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Returns the link for fetching the previous page, if available.
    pub fn previous_link(&self) -> Option<&str> {
        self.previous_link.as_deref()
    }

    /// Returns the total record count across all pages, if known.
    ///
    /// Flat-array responses carry no count; the page itself is the whole
    /// collection then.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Returns the total number of pages, if the envelope reported it.
    pub fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    /// Returns the 1-based index of this page, if the envelope reported it.
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Envelope(PageEnvelope),
    Flat(Vec<Record>),
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    count: usize,
    next: Option<String>,
    previous: Option<String>,
    current_page: Option<usize>,
    total_pages: Option<usize>,
    results: Vec<Record>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_paginated_envelope() {
        let body = r#"{
            "count": 42,
            "next": "https://practice.example.org/api/others/clinics/?page=3",
            "previous": "https://practice.example.org/api/others/clinics/?page=1",
            "page_size": 20,
            "current_page": 2,
            "total_pages": 3,
            "has_next": true,
            "has_previous": true,
            "results": [
                {"id": "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102", "name": "Blue Clinic"}
            ]
        }"#;

        let page = Page::decode(body, Entity::Clinics).unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.total_count(), Some(42));
        assert_eq!(page.total_pages(), Some(3));
        assert_eq!(page.current_page(), Some(2));
        assert!(page.has_more());
        assert_eq!(page.records()[0].entity_name(), "clinic");
    }

    #[test]
    fn decodes_flat_array() {
        let body = r#"[
            {"id": "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102", "name": "cough"},
            {"id": "0b7c4f6a-8e52-4f07-8d2b-51d6f0a92203", "name": "fever"}
        ]"#;

        let page = Page::decode(body, Entity::Symptoms).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.total_count(), None);
        assert!(!page.has_more());
        assert_eq!(page.records()[1].entity_name(), "symptom");
    }

    #[test]
    fn rejects_malformed_bodies() {
        let err = Page::decode("{\"oops\"", Entity::Clinics).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }
}
