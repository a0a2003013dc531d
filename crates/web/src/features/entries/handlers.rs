use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rankings::{
    RankingEngine,
    dto::entry::{CorrectEntryRequest, EntryCorrectionResponse, StatEntryRequest, StatEntryResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rankings/{definition_id}/entries",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id")
    ),
    request_body = StatEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Entry applied", body = StatEntryResponse),
        (status = 400, description = "Validation error or unknown stat field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ranking definition not found"),
        (status = 409, description = "Session already recorded for this member"),
        (status = 422, description = "A stat would become negative")
    ),
    tag = "entries"
)]
pub async fn apply_entry(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
    Json(req): Json<StatEntryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let entry = services::apply_entry(&engine, definition_id, &req).await?;

    Ok((StatusCode::CREATED, Json(StatEntryResponse::from(entry))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/entries/{entry_id}/correction",
    params(
        ("entry_id" = Uuid, Path, description = "Id of the manual entry being corrected")
    ),
    request_body = CorrectEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Entry reversed and replacement applied", body = EntryCorrectionResponse),
        (status = 400, description = "Validation error or unknown stat field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry already corrected or belongs to a match"),
        (status = 422, description = "A stat would become negative")
    ),
    tag = "entries"
)]
pub async fn correct_entry(
    State(engine): State<RankingEngine>,
    Path(entry_id): Path<Uuid>,
    Json(req): Json<CorrectEntryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let correction = services::correct_entry(&engine, entry_id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryCorrectionResponse::from(correction)),
    )
        .into_response())
}
