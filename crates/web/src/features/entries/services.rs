use rankings::{
    RankingEngine,
    dto::entry::{CorrectEntryRequest, StatEntryRequest},
    error::Result,
    models::RankStatEntry,
    services::EntryCorrection,
};
use uuid::Uuid;

/// Apply a manual stat adjustment
pub async fn apply_entry(
    engine: &RankingEngine,
    definition_id: Uuid,
    req: &StatEntryRequest,
) -> Result<RankStatEntry> {
    engine.apply_manual_entry(definition_id, req).await
}

/// Reverse a manual entry and apply replacement deltas
pub async fn correct_entry(
    engine: &RankingEngine,
    entry_id: Uuid,
    req: &CorrectEntryRequest,
) -> Result<EntryCorrection> {
    engine.correct_entry(entry_id, req).await
}
