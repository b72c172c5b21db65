//! Async iterator for list pagination

use crate::error::Error;
use crate::model::Entity;
use crate::PraxisClient;

use super::page::Page;
use super::query::fetch_list_body;
use super::query::ListQuery;

/// Async iterator that yields pages of list results.
///
/// Automatically follows the envelope's `next` link. Pages beyond the
/// first are always fetched live; the cache only serves single-page
/// queries.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.list(Entity::Patients).page_size(50).into_pages();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for record in page.records() {
///         println!("{:?}", record.get_string("name"));
///     }
/// }
/// ```
pub struct ListPages<'a> {
    client: &'a PraxisClient,
    entity: Entity,
    next_url: Option<String>,
    done: bool,
}

impl<'a> ListPages<'a> {
    /// Creates a new page iterator from a list query.
    pub(crate) fn new(query: ListQuery<'a>) -> Self {
        let client = query.client();
        let entity = query.entity();
        let initial_url = query.build_url();

        Self {
            client,
            entity,
            next_url: Some(initial_url),
            done: false,
        }
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed. A failed fetch
    /// ends the iteration after yielding the error.
    pub async fn next(&mut self) -> Option<Result<Page, Error>> {
        if self.done {
            return None;
        }

        let url = match self.next_url.take() {
            Some(url) => url,
            None => {
                self.done = true;
                return None;
            }
        };

        let body = match fetch_list_body(self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let page = match Page::decode(&body, self.entity) {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };

        match page.next_link() {
            Some(link) => self.next_url = Some(link.to_string()),
            None => self.done = true,
        }

        Some(Ok(page))
    }
}
