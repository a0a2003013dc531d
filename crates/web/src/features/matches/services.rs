use rankings::{
    RankingEngine,
    dto::matches::{CorrectMatchRequest, RecordMatchRequest},
    error::Result,
    models::MatchRecord,
    services::{MatchCorrection, RecordedMatch},
};
use uuid::Uuid;

/// Record a match and apply its stats
pub async fn record_match(
    engine: &RankingEngine,
    definition_id: Uuid,
    req: &RecordMatchRequest,
) -> Result<RecordedMatch> {
    engine.record_match(definition_id, req).await
}

/// Replace a recorded match with corrected values
pub async fn correct_match(
    engine: &RankingEngine,
    definition_id: Uuid,
    match_id: Uuid,
    req: &CorrectMatchRequest,
) -> Result<MatchCorrection> {
    engine.correct_match(definition_id, match_id, req).await
}

pub async fn get_match(
    engine: &RankingEngine,
    definition_id: Uuid,
    match_id: Uuid,
) -> Result<MatchRecord> {
    engine.get_match(definition_id, match_id).await
}

/// Matches of a definition, newest first
pub async fn list_matches(engine: &RankingEngine, definition_id: Uuid) -> Result<Vec<MatchRecord>> {
    engine.list_matches(definition_id).await
}
