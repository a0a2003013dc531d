use axum::{
    Router, middleware,
    routing::{get, post},
};
use rankings::RankingEngine;

use super::handlers::{correct_match, get_match, list_matches, record_match};
use crate::middleware::auth::{ApiKeys, require_auth};

/// Mounted next to the ranking routes, under `/api/rankings`.
pub fn routes(api_keys: ApiKeys) -> Router<RankingEngine> {
    let protected = Router::new()
        .route("/:definition_id/matches", post(record_match))
        .route("/:definition_id/matches/:match_id/correction", post(correct_match))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:definition_id/matches", get(list_matches))
        .route("/:definition_id/matches/:match_id", get(get_match))
        .merge(protected)
}
