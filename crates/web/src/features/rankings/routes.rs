use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use rankings::RankingEngine;

use super::handlers::{
    add_level, assign_level, create_definition, get_definition, get_leaderboard,
    get_member_history, get_member_rank, list_definitions, list_levels,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<RankingEngine> {
    let protected = Router::new()
        .route("/", post(create_definition))
        .route("/:definition_id/levels", post(add_level))
        .route("/:definition_id/members/:user_id/level", put(assign_level))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_definitions))
        .route("/:definition_id", get(get_definition))
        .route("/:definition_id/levels", get(list_levels))
        .route("/:definition_id/members/:user_id", get(get_member_rank))
        .route("/:definition_id/members/:user_id/history", get(get_member_history))
        .route("/:definition_id/leaderboard", get(get_leaderboard))
        .merge(protected)
}
