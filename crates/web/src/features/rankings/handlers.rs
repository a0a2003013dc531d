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
        entry::StatEntryResponse,
        ranking::{
            AssignLevelRequest, CreateDefinitionRequest, CreateLevelRequest, DefinitionListQuery,
            LeaderboardEntryResponse, MemberRankResponse, RankingDefinitionResponse,
            RankingLevelResponse,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/rankings",
    request_body = CreateDefinitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Ranking definition created", body = RankingDefinitionResponse),
        (status = 400, description = "Validation error or unknown domain"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Activity already has a ranking")
    ),
    tag = "rankings"
)]
pub async fn create_definition(
    State(engine): State<RankingEngine>,
    Json(req): Json<CreateDefinitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let definition = services::create_definition(&engine, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RankingDefinitionResponse::from(definition)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings",
    params(DefinitionListQuery),
    responses(
        (status = 200, description = "Ranking definitions of an organization", body = Vec<RankingDefinitionResponse>)
    ),
    tag = "rankings"
)]
pub async fn list_definitions(
    State(engine): State<RankingEngine>,
    Query(query): Query<DefinitionListQuery>,
) -> Result<Response, WebError> {
    let definitions = services::list_definitions(&engine, query.organization_id).await?;

    let response: Vec<RankingDefinitionResponse> = definitions
        .into_iter()
        .map(RankingDefinitionResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id")
    ),
    responses(
        (status = 200, description = "Ranking definition found", body = RankingDefinitionResponse),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "rankings"
)]
pub async fn get_definition(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let definition = services::get_definition(&engine, definition_id).await?;

    Ok(Json(RankingDefinitionResponse::from(definition)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/levels",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id")
    ),
    responses(
        (status = 200, description = "Levels, lowest first", body = Vec<RankingLevelResponse>),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "rankings"
)]
pub async fn list_levels(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let levels = services::list_levels(&engine, definition_id).await?;

    let response: Vec<RankingLevelResponse> =
        levels.into_iter().map(RankingLevelResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rankings/{definition_id}/levels",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id")
    ),
    request_body = CreateLevelRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Level added", body = RankingLevelResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ranking definition not found"),
        (status = 409, description = "Level order already taken")
    ),
    tag = "rankings"
)]
pub async fn add_level(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
    Json(req): Json<CreateLevelRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let level = services::add_level(&engine, definition_id, &req).await?;

    Ok((StatusCode::CREATED, Json(RankingLevelResponse::from(level))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/members/{user_id}",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        ("user_id" = Uuid, Path, description = "Member user id")
    ),
    responses(
        (status = 200, description = "Member rank, zero stats when never recorded", body = MemberRankResponse),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "rankings"
)]
pub async fn get_member_rank(
    State(engine): State<RankingEngine>,
    Path((definition_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let rank = services::get_member_rank(&engine, definition_id, user_id).await?;

    Ok(Json(MemberRankResponse::from(rank)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/rankings/{definition_id}/members/{user_id}/level",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        ("user_id" = Uuid, Path, description = "Member user id")
    ),
    request_body = AssignLevelRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Level assigned", body = MemberRankResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Definition or level not found")
    ),
    tag = "rankings"
)]
pub async fn assign_level(
    State(engine): State<RankingEngine>,
    Path((definition_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignLevelRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let rank = services::assign_level(&engine, definition_id, user_id, req.level_id).await?;

    Ok(Json(MemberRankResponse::from(rank)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/members/{user_id}/history",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        ("user_id" = Uuid, Path, description = "Member user id")
    ),
    responses(
        (status = 200, description = "Ledger entries, oldest first", body = Vec<StatEntryResponse>),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "rankings"
)]
pub async fn get_member_history(
    State(engine): State<RankingEngine>,
    Path((definition_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let entries = services::get_member_history(&engine, definition_id, user_id).await?;

    let response: Vec<StatEntryResponse> =
        entries.into_iter().map(StatEntryResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/{definition_id}/leaderboard",
    params(
        ("definition_id" = Uuid, Path, description = "Ranking definition id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Leaderboard page ordered by the domain's tie-break rules", body = PaginatedResponse<LeaderboardEntryResponse>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 404, description = "Ranking definition not found")
    ),
    tag = "rankings"
)]
pub async fn get_leaderboard(
    State(engine): State<RankingEngine>,
    Path(definition_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let leaderboard = services::get_leaderboard(&engine, definition_id).await?;

    let rows: Vec<LeaderboardEntryResponse> = leaderboard
        .rows
        .into_iter()
        .map(LeaderboardEntryResponse::from)
        .collect();

    Ok(Json(PaginatedResponse::from_ordered(rows, &params)).into_response())
}
