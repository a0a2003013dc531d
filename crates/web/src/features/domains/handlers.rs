use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use rankings::{
    RankingEngine,
    dto::domain::{DomainResponse, MatchFormatInfo, MatchFormatsResponse, TeamSizeQuery},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/domains",
    responses(
        (status = 200, description = "List all supported domains", body = Vec<DomainResponse>)
    ),
    tag = "domains"
)]
pub async fn list_domains(State(engine): State<RankingEngine>) -> Result<Response, WebError> {
    Ok(Json(services::list_domains(&engine)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/domains/{domain_id}",
    params(
        ("domain_id" = String, Path, description = "Domain id, e.g. `padel`")
    ),
    responses(
        (status = 200, description = "Domain found", body = DomainResponse),
        (status = 400, description = "Unknown domain")
    ),
    tag = "domains"
)]
pub async fn get_domain(
    State(engine): State<RankingEngine>,
    Path(domain_id): Path<String>,
) -> Result<Response, WebError> {
    let domain = services::get_domain(&engine, &domain_id)?;

    Ok(Json(domain).into_response())
}

#[utoipa::path(
    get,
    path = "/api/domains/{domain_id}/formats",
    params(
        ("domain_id" = String, Path, description = "Domain id")
    ),
    responses(
        (status = 200, description = "Formats of a match-mode domain", body = MatchFormatsResponse),
        (status = 400, description = "Unknown domain or domain without match mode")
    ),
    tag = "domains"
)]
pub async fn get_match_formats(
    State(engine): State<RankingEngine>,
    Path(domain_id): Path<String>,
) -> Result<Response, WebError> {
    let formats = services::get_match_formats(&engine, &domain_id)?;

    Ok(Json(formats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/domains/{domain_id}/formats/by-team-size",
    params(
        ("domain_id" = String, Path, description = "Domain id"),
        TeamSizeQuery
    ),
    responses(
        (status = 200, description = "Format matching the player count", body = MatchFormatInfo),
        (status = 404, description = "No format fits this many players")
    ),
    tag = "domains"
)]
pub async fn get_format_for_team_size(
    State(engine): State<RankingEngine>,
    Path(domain_id): Path<String>,
    Query(query): Query<TeamSizeQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let format = services::get_format_for_team_size(&engine, &domain_id, query.total_players)?;

    Ok(Json(format).into_response())
}
