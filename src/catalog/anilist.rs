use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::query::{SEARCH_QUERY, SearchVariables};
use crate::catalog::{CatalogProvider, MediaItem};
use crate::error::{Error, Result};

pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

/// AniList GraphQL client. One POST per call, no retries.
pub struct AniListClient {
    http: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct GraphQLRequest<'a, V> {
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
struct PageResponse {
    #[serde(rename = "Page")]
    page: PageData,
}

#[derive(Deserialize)]
struct PageData {
    media: Vec<MediaItem>,
}

impl AniListClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn graphql_request<T: DeserializeOwned, V: Serialize>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T> {
        debug!(operation, endpoint = %self.endpoint, "AniList GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&GraphQLRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation, status = status.as_u16(), "AniList API error");
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        // Decode the whole envelope up front so a shape mismatch surfaces as
        // MalformedResponse rather than a transport error.
        let body = response.text().await?;
        let envelope: GraphQLResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

        match envelope.data {
            Some(data) => Ok(data),
            None => Err(match envelope.errors.into_iter().next() {
                Some(err) => Error::Graphql(err.message),
                None => Error::MalformedResponse("response carries no data".to_string()),
            }),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for AniListClient {
    async fn search(&self, variables: &SearchVariables) -> Result<Vec<MediaItem>> {
        let resp: PageResponse = self
            .graphql_request("MangaSearch", SEARCH_QUERY, variables)
            .await?;
        debug!(results = resp.page.media.len(), "AniList search complete");
        Ok(resp.page.media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{envelope, media_json, spawn_upstream};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_posts_fixed_query_and_variables() {
        let body = envelope(vec![media_json(1, "Naruto"), media_json(2, "Boruto")]);
        let (url, requests) = spawn_upstream(StatusCode::OK, body).await;
        let client = AniListClient::new(url);

        let vars = SearchVariables {
            search: Some("Naruto".to_string()),
            ..Default::default()
        };
        let media = client.search(&vars).await.unwrap();

        assert_eq!(media.len(), 2);
        assert_eq!(media[0].title.romaji.as_deref(), Some("Naruto"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["query"], json!(SEARCH_QUERY));
        assert_eq!(requests[0]["variables"], json!({ "search": "Naruto" }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let (url, _) = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "{}").await;
        let client = AniListClient::new(url);

        let err = client.search(&SearchVariables::default()).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus(503)));
    }

    #[tokio::test]
    async fn test_missing_media_is_malformed() {
        let body = json!({ "data": { "Page": {} } }).to_string();
        let (url, _) = spawn_upstream(StatusCode::OK, body).await;
        let client = AniListClient::new(url);

        let err = client.search(&SearchVariables::default()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (url, _) = spawn_upstream(StatusCode::OK, "<html>oops</html>").await;
        let client = AniListClient::new(url);

        let err = client.search(&SearchVariables::default()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_graphql_errors_without_data() {
        let body = json!({ "data": null, "errors": [{ "message": "Invalid token" }] }).to_string();
        let (url, _) = spawn_upstream(StatusCode::OK, body).await;
        let client = AniListClient::new(url);

        let err = client.search(&SearchVariables::default()).await.unwrap_err();
        match err {
            Error::Graphql(message) => assert_eq!(message, "Invalid token"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        let client = AniListClient::new("http://127.0.0.1:1/graphql");

        let err = client.search(&SearchVariables::default()).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
