use rankings::{
    RankingEngine,
    dto::ranking::{CreateDefinitionRequest, CreateLevelRequest},
    error::Result,
    models::{MemberRank, RankStatEntry, RankingDefinition, RankingLevel},
    services::Leaderboard,
};
use uuid::Uuid;

/// Create a ranking definition
pub async fn create_definition(
    engine: &RankingEngine,
    req: &CreateDefinitionRequest,
) -> Result<RankingDefinition> {
    engine.create_definition(req).await
}

/// List the definitions of an organization
pub async fn list_definitions(
    engine: &RankingEngine,
    organization_id: Uuid,
) -> Result<Vec<RankingDefinition>> {
    engine.list_definitions(organization_id).await
}

pub async fn get_definition(engine: &RankingEngine, definition_id: Uuid) -> Result<RankingDefinition> {
    engine.get_definition(definition_id).await
}

pub async fn list_levels(engine: &RankingEngine, definition_id: Uuid) -> Result<Vec<RankingLevel>> {
    engine.list_levels(definition_id).await
}

pub async fn add_level(
    engine: &RankingEngine,
    definition_id: Uuid,
    req: &CreateLevelRequest,
) -> Result<RankingLevel> {
    engine.add_level(definition_id, req).await
}

/// Current rank of a member, zero stats if never seen
pub async fn get_member_rank(
    engine: &RankingEngine,
    definition_id: Uuid,
    user_id: Uuid,
) -> Result<MemberRank> {
    engine.member_rank(definition_id, user_id).await
}

pub async fn assign_level(
    engine: &RankingEngine,
    definition_id: Uuid,
    user_id: Uuid,
    level_id: Option<Uuid>,
) -> Result<MemberRank> {
    engine.assign_level(definition_id, user_id, level_id).await
}

/// Ledger entries of a member, oldest first
pub async fn get_member_history(
    engine: &RankingEngine,
    definition_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<RankStatEntry>> {
    engine.member_history(definition_id, user_id).await
}

/// Full ordered leaderboard of a definition
pub async fn get_leaderboard(engine: &RankingEngine, definition_id: Uuid) -> Result<Leaderboard> {
    engine.leaderboard(definition_id).await
}
