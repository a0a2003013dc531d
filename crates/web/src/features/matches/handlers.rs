use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rankings::{
    RankingEngine,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        matches::{
            CorrectMatchRequest, MatchCorrectionResponse, MatchResponse, RecordMatchRequest,
            RecordedMatchResponse,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/matches",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Recorded matches, newest first", body = PaginatedResponse<MatchResponse>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "matches"
)]
pub async fn list_matches(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let matches = services::list_matches(&engine, definition_id).await?;

    let response: Vec<MatchResponse> = matches.into_iter().map(MatchResponse::from).collect();

    Ok(Json(PaginatedResponse::from_ordered(response, &params)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/matches/{match_id}",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        ("match_id" = Uuid, Path, description = "Match id")
    ),
    responses(
        (status = 200, description = "Match found", body = MatchResponse),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn get_match(
    State(engine): State<RankingEngine>,
    Path((definition_id, match_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let record = services::get_match(&engine, definition_id, match_id).await?;

    Ok(Json(MatchResponse::from(record)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rankings/{definition_id}/matches",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id")
    ),
    request_body = RecordMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Match recorded and stats applied", body = RecordedMatchResponse),
        (status = 400, description = "Validation error, unsupported format or invalid teams"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ranking definition not found"),
        (status = 409, description = "Session already recorded"),
        (status = 422, description = "Score is not valid for the domain")
    ),
    tag = "matches"
)]
pub async fn record_match(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
    Json(req): Json<RecordMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let recorded = services::record_match(&engine, definition_id, &req).await?;

    Ok((StatusCode::CREATED, Json(RecordedMatchResponse::from(recorded))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rankings/{definition_id}/matches/{match_id}/correction",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        ("match_id" = Uuid, Path, description = "Id of the match being corrected")
    ),
    request_body = CorrectMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Original reversed and corrected result applied", body = MatchCorrectionResponse),
        (status = 400, description = "Validation error, unsupported format or invalid teams"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match already corrected"),
        (status = 422, description = "Score is not valid for the domain")
    ),
    tag = "matches"
)]
pub async fn correct_match(
    State(engine): State<RankingEngine>,
    Path((definition_id, match_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CorrectMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let correction = services::correct_match(&engine, definition_id, match_id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MatchCorrectionResponse::from(correction)),
    )
        .into_response())
}
