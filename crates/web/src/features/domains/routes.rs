use axum::{Router, routing::get};
use rankings::RankingEngine;

use super::handlers::{get_domain, get_format_for_team_size, get_match_formats, list_domains};

pub fn routes() -> Router<RankingEngine> {
    Router::new()
        .route("/", get(list_domains))
        .route("/:domain_id", get(get_domain))
        .route("/:domain_id/formats", get(get_match_formats))
        .route("/:domain_id/formats/by-team-size", get(get_format_for_team_size))
}
