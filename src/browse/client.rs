use reqwest::Client;
use tracing::debug;

use crate::browse::state::SearchFilters;
use crate::catalog::MediaItem;
use crate::error::{Error, Result};

/// HTTP client for the search proxy's `/api/search` route.
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<MediaItem>> {
        let url = format!("{}/api/search", self.base_url);
        let pairs = filters.query_pairs();
        debug!(?pairs, "Querying search proxy");

        let response = self.client.get(&url).query(&pairs).send().await?;

        if !response.status().is_success() {
            return Err(Error::ProxyStatus(response.status().as_u16()));
        }

        let items: Vec<MediaItem> = response.json().await?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::catalog::{CatalogProvider, MediaFormat, MediaStatus, SearchVariables};
    use crate::proxy::{AppState, build_router};
    use crate::test_support::{media_json, spawn_app};

    /// Catalog stand-in that records what the proxy forwarded.
    struct RecordingCatalog {
        seen: Arc<Mutex<Vec<SearchVariables>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for RecordingCatalog {
        async fn search(&self, variables: &SearchVariables) -> Result<Vec<MediaItem>> {
            self.seen.lock().unwrap().push(variables.clone());
            if self.fail {
                return Err(Error::UpstreamStatus(500));
            }
            Ok(vec![serde_json::from_value(media_json(42, "Yotsuba&!")).unwrap()])
        }
    }

    async fn spawn_proxy(fail: bool) -> (ProxyClient, Arc<Mutex<Vec<SearchVariables>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let catalog = RecordingCatalog {
            seen: seen.clone(),
            fail,
        };
        let addr = spawn_app(build_router(AppState::new(Arc::new(catalog)))).await;
        (ProxyClient::new(&format!("http://{addr}/")), seen)
    }

    #[tokio::test]
    async fn test_default_search_sends_no_params() {
        let (client, seen) = spawn_proxy(false).await;

        let items = client.search(&SearchFilters::default()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 42);
        assert_eq!(seen.lock().unwrap()[0], SearchVariables::default());
    }

    #[tokio::test]
    async fn test_filters_round_trip_through_proxy() {
        let (client, seen) = spawn_proxy(false).await;
        let filters = SearchFilters {
            query: "  Yotsuba & friends ".to_string(),
            genres: vec!["Comedy".to_string(), "Slice of Life".to_string()],
            formats: vec![MediaFormat::Manga],
            statuses: vec![MediaStatus::Finished, MediaStatus::Cancelled],
        };

        client.search(&filters).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0],
            SearchVariables {
                search: Some("Yotsuba & friends".to_string()),
                genres: Some(vec!["Comedy".to_string(), "Slice of Life".to_string()]),
                formats: Some(vec!["MANGA".to_string()]),
                status: Some(vec!["FINISHED".to_string(), "CANCELLED".to_string()]),
            }
        );
    }

    #[tokio::test]
    async fn test_proxy_failure_is_error() {
        let (client, _) = spawn_proxy(true).await;

        let err = client.search(&SearchFilters::default()).await.unwrap_err();
        assert!(matches!(err, Error::ProxyStatus(500)));
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_network_error() {
        let client = ProxyClient::new("http://127.0.0.1:1");

        let err = client.search(&SearchFilters::default()).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
