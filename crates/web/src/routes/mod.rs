use axum::Router;
use rankings::RankingEngine;

use crate::features::{domains, entries, matches, rankings as ranking_feature};
use crate::middleware::auth::ApiKeys;

pub fn router(engine: RankingEngine, api_keys: ApiKeys) -> Router {
    let rankings = ranking_feature::routes::routes(api_keys.clone())
        .merge(matches::routes::routes(api_keys.clone()))
        .merge(entries::routes::ranking_routes(api_keys.clone()));

    Router::new()
        .nest("/api/domains", domains::routes::routes())
        .nest("/api/rankings", rankings)
        .nest("/api/entries", entries::routes::routes(api_keys))
        .with_state(engine)
}
