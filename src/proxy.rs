use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::catalog::{CatalogProvider, SearchParams, SearchVariables};
use crate::error::{Error, Result};

/// The only error text callers of the proxy ever see.
pub const SEARCH_FAILED: &str = "Failed to perform search";

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn CatalogProvider + Send + Sync>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider + Send + Sync>) -> Self {
        Self { catalog }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/search", get(search_handler))
        .with_state(state)
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let Query(pairs) = match query {
        Ok(query) => query,
        Err(e) => {
            error!(error = %e, "Rejected search query string");
            return search_failed_response();
        }
    };

    let params = SearchParams::from_pairs(pairs);
    let variables = SearchVariables::from_params(&params);
    debug!(?variables, "Search request");

    match state.catalog.search(&variables).await {
        Ok(media) => {
            info!(results = media.len(), "Search relayed");
            Json(media).into_response()
        }
        Err(e) => {
            error!(error = %e, "Search API error");
            search_failed_response()
        }
    }
}

fn search_failed_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": SEARCH_FAILED })),
    )
        .into_response()
}

pub fn parse_bind_addr(bind: &str) -> Result<SocketAddr> {
    bind.parse()
        .map_err(|e| Error::InvalidAddress(format!("{bind}: {e}")))
}

/// Serve the proxy on `bind` until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let addr = parse_bind_addr(bind)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Search proxy listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down search proxy");
        })
        .await?;

    Ok(())
}
