use axum::{Router, middleware, routing::post};
use rankings::RankingEngine;

use super::handlers::{apply_entry, correct_entry};
use crate::middleware::auth::{ApiKeys, require_auth};

/// Mounted next to the ranking routes, under `/api/rankings`.
pub fn ranking_routes(api_keys: ApiKeys) -> Router<RankingEngine> {
    Router::new()
        .route("/:definition_id/entries", post(apply_entry))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

pub fn routes(api_keys: ApiKeys) -> Router<RankingEngine> {
    Router::new()
        .route("/:entry_id/correction", post(correct_entry))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
