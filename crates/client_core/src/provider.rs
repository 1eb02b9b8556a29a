use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    error::{ErrorBody, FetchError},
    protocol::{ListRecipesQuery, RecipePage, SearchRecipesQuery, SortOrder},
};

/// Development backend address; override per provider instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Largest page the backend accepts. Larger limits are rejected with a 422,
/// so callers are clamped instead of bounced.
pub const MAX_WIRE_LIMIT: u32 = 50;

/// Source of recipe pages. Pages are 1-based here because that is what the
/// wire protocol speaks; the controller translates from its 0-based index.
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// One page of the whole catalogue, ordered by rating.
    async fn list(&self, page: u32, limit: u32, sort: SortOrder)
        -> Result<RecipePage, FetchError>;

    /// One page of recipes whose title contains `title`, case-insensitive.
    async fn search(&self, page: u32, limit: u32, title: &str) -> Result<RecipePage, FetchError>;
}

/// reqwest-backed provider speaking the backend's JSON-over-GET protocol.
pub struct HttpRecipeProvider {
    http: Client,
    base_url: String,
}

impl HttpRecipeProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    async fn fetch_page<Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<RecipePage, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::new(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => "no detail".to_string(),
            };
            return Err(FetchError::new(format!("{url} returned {status}: {detail}")));
        }

        response
            .json()
            .await
            .map_err(|err| FetchError::new(format!("undecodable body from {url}: {err}")))
    }
}

#[async_trait]
impl RecipeProvider for HttpRecipeProvider {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        sort: SortOrder,
    ) -> Result<RecipePage, FetchError> {
        let limit = limit.clamp(1, MAX_WIRE_LIMIT);
        tracing::debug!(page, limit, ?sort, "fetching recipe list page");
        self.fetch_page("/api/recipes", &ListRecipesQuery { page, limit, sort })
            .await
    }

    async fn search(&self, page: u32, limit: u32, title: &str) -> Result<RecipePage, FetchError> {
        let limit = limit.clamp(1, MAX_WIRE_LIMIT);
        tracing::debug!(page, limit, title, "searching recipes by title");
        self.fetch_page(
            "/api/recipes/search",
            &SearchRecipesQuery {
                page,
                limit,
                title: title.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
