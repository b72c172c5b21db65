//! List query builder

use futures::Stream;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Method;

use crate::cache::CachedValue;
use crate::error::Error;
use crate::model::Entity;
use crate::model::Record;
use crate::response::Response;
use crate::PraxisClient;

use super::order::OrderBy;
use super::page::Page;
use super::pages::ListPages;

/// Builder for list queries against a collection endpoint.
///
/// Use [`PraxisClient::list`] to create one. Search, ordering and field
/// filters are applied server-side; the table engine applies its own
/// client-side pipeline on top of whatever the server returns.
///
/// # Example
///
/// ```ignore
/// let response = client.list(Entity::Adults)
///     .search("john")
///     .order_by(OrderBy::desc("created_at"))
///     .page_size(20)
///     .execute()
///     .await?;
///
/// for record in response.data().records() {
///     println!("{:?}", record.get_string("name"));
/// }
/// ```
pub struct ListQuery<'a> {
    client: &'a PraxisClient,
    entity: Entity,
    search: Option<String>,
    order_by: Option<OrderBy>,
    page: Option<usize>,
    page_size: Option<usize>,
    field_filters: Vec<(String, String)>,
    bypass_cache: bool,
}

impl<'a> ListQuery<'a> {
    /// Creates a new list query for the given collection.
    pub(crate) fn new(client: &'a PraxisClient, entity: Entity) -> Self {
        Self {
            client,
            entity,
            search: None,
            order_by: None,
            page: None,
            page_size: None,
            field_filters: Vec::new(),
            bypass_cache: false,
        }
    }

    /// Sets the free-text search term (matched server-side against the
    /// collection's search fields).
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.trim().is_empty() {
            self.search = Some(term);
        }
        self
    }

    /// Sets the server-side ordering.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Requests a specific server page (1-based).
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the server page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Adds an exact-match field filter, e.g. `gender=female`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.field_filters.push((field.into(), value.into()));
        self
    }

    /// Skips the cache for this query, forcing a fresh fetch.
    pub fn fresh(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    /// Returns the collection this query targets.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns a reference to the client.
    pub(crate) fn client(&self) -> &'a PraxisClient {
        self.client
    }

    /// Builds the query URL.
    pub(crate) fn build_url(&self) -> String {
        let mut url = self.client.collection_url(self.entity);
        let mut params = Vec::new();

        if let Some(search) = &self.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(order) = &self.order_by {
            params.push(format!(
                "ordering={}",
                urlencoding::encode(&order.to_query_param())
            ));
        }
        if let Some(page) = self.page {
            params.push(format!("page={page}"));
        }
        if let Some(size) = self.page_size {
            params.push(format!("page_size={size}"));
        }
        for (field, value) in &self.field_filters {
            params.push(format!(
                "{}={}",
                urlencoding::encode(field),
                urlencoding::encode(value)
            ));
        }

        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        url
    }

    /// Executes the query and returns one page of results.
    ///
    /// Serves from the cache when a provider is configured, the TTL is
    /// non-zero and the same URL was fetched recently; a mutation through
    /// the gateway drops the collection's entries, so a hit is never
    /// staler than the last known write.
    pub async fn execute(self) -> Result<Response<Page>, Error> {
        let url = self.build_url();
        let cache_key = format!("{}{}", self.entity.cache_prefix(), url);
        let ttl = self.client.cache_config().list_ttl;
        let use_cache = !self.bypass_cache && !ttl.is_zero();

        if use_cache {
            if let Some(cache) = self.client.cache() {
                if let Some(cached) = cache.get(&cache_key).await {
                    if let Ok(body) = String::from_utf8(cached.data.clone()) {
                        let page = Page::decode(&body, self.entity)?;
                        return Ok(Response::cache_hit(
                            page,
                            cached.created_at,
                            cached.expires_at,
                        ));
                    }
                }
            }
        }

        let body = fetch_list_body(self.client, &url).await?;
        let page = Page::decode(&body, self.entity)?;

        if use_cache {
            if let Some(cache) = self.client.cache() {
                let value = CachedValue::with_ttl(body.into_bytes(), ttl);
                let (created_at, expires_at) = (value.created_at, value.expires_at);
                cache.set(&cache_key, value).await;
                return Ok(Response::cache_miss(page, created_at, expires_at));
            }
        }

        Ok(Response::new(page))
    }

    /// Converts the query into an async page iterator.
    pub fn into_pages(self) -> ListPages<'a> {
        ListPages::new(self)
    }

    /// Streams every record across all pages.
    ///
    /// Follows `next` links until the collection is exhausted.
    pub fn stream(self) -> impl Stream<Item = Result<Record, Error>> + 'a {
        async_stream::try_stream! {
            let mut pages = self.into_pages();
            while let Some(page) = pages.next().await {
                let page = page?;
                for record in page.into_records() {
                    yield record;
                }
            }
        }
    }
}

/// Fetches a list URL and returns the raw response body.
///
/// Non-success statuses become [`ApiError::Http`] with whatever structured
/// detail the body carried.
pub(crate) async fn fetch_list_body(client: &PraxisClient, url: &str) -> Result<String, Error> {
    let mut headers = HeaderMap::new();
    headers.insert("Accept", HeaderValue::from_static("application/json"));

    let response = client.request(Method::GET, url, headers, None).await?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(crate::error::ApiError::from)?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(super::gateway::http_error(status.as_u16(), &body).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PraxisClient {
        PraxisClient::builder()
            .url("https://practice.example.org")
            .build()
    }

    #[test]
    fn builds_plain_collection_url() {
        let client = client();
        let url = client.list(Entity::Symptoms).build_url();
        assert_eq!(url, "https://practice.example.org/api/others/symptoms/");
    }

    #[test]
    fn builds_url_with_all_parameters() {
        let client = client();
        let url = client
            .list(Entity::Adults)
            .search("john doe")
            .order_by(OrderBy::desc("created_at").then_asc("name"))
            .page(2)
            .page_size(20)
            .filter("gender", "female")
            .build_url();

        assert_eq!(
            url,
            "https://practice.example.org/api/patients/adults/\
             ?search=john%20doe&ordering=-created_at%2Cname&page=2&page_size=20&gender=female"
        );
    }

    #[test]
    fn blank_search_is_dropped() {
        let client = client();
        let url = client.list(Entity::Clinics).search("   ").build_url();
        assert_eq!(url, "https://practice.example.org/api/others/clinics/");
    }
}
