//! Movie catalog over HTTP (TMDB v3 compatible).

use super::{error_message, transport_message};
use crate::error::CatalogError;
use crate::movie::{MovieDetail, MovieId, MoviePage};
use crate::providers::{CatalogClient, ListKind};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Catalog client authenticating with an `api_key` query parameter.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCatalogClient {
    /// Client for the catalog at `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: bool,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(transport_message(&e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND && not_found {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            let message = error_message(response).await;
            tracing::warn!(path, status = status.as_u16(), %message, "Catalog request failed");
            return Err(CatalogError::Server(message));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Server(format!("invalid catalog response: {e}")))
    }
}

impl CatalogClient for HttpCatalogClient {
    fn list(&self, list: ListKind, page: u32) -> BoxFuture<'_, Result<MoviePage, CatalogError>> {
        async move {
            self.get(&list.path(), &[("page", page.to_string())], false)
                .await
        }
        .boxed()
    }

    fn search<'a>(&'a self, query: &'a str, page: u32) -> BoxFuture<'a, Result<MoviePage, CatalogError>> {
        async move {
            let params = [
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ];
            self.get("/search/movie", &params, false).await
        }
        .boxed()
    }

    fn detail(&self, id: MovieId) -> BoxFuture<'_, Result<MovieDetail, CatalogError>> {
        async move { self.get(&format!("/movie/{id}"), &[], true).await }.boxed()
    }
}
