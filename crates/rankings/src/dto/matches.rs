use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entry::StatEntryResponse;
use crate::domains::Winner;
use crate::models::MatchRecord;
use crate::services::{MatchCorrection, RecordedMatch};

/// Request payload for recording a match result
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordMatchRequest {
    /// Ties every participant's entry to one real-world event; a second
    /// submission for the same session is rejected.
    pub session_id: Option<Uuid>,

    /// Defaults to the domain's default format.
    #[validate(length(min = 1, max = 32))]
    pub format: Option<String>,

    #[validate(length(min = 1, max = 64, message = "team1 must have between 1 and 64 players"))]
    pub team1: Vec<Uuid>,

    #[validate(length(min = 1, max = 64, message = "team2 must have between 1 and 64 players"))]
    pub team2: Vec<Uuid>,

    /// Domain-specific raw score, e.g. `{"team1": 3, "team2": 1}`.
    #[schema(value_type = Object)]
    pub score: Value,

    pub recorded_by: Uuid,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Request payload for replacing a recorded match with corrected values
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CorrectMatchRequest {
    #[validate(length(min = 1, max = 32))]
    pub format: Option<String>,

    #[validate(length(min = 1, max = 64, message = "team1 must have between 1 and 64 players"))]
    pub team1: Vec<Uuid>,

    #[validate(length(min = 1, max = 64, message = "team2 must have between 1 and 64 players"))]
    pub team2: Vec<Uuid>,

    #[schema(value_type = Object)]
    pub score: Value,

    pub recorded_by: Uuid,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub definition_id: Uuid,
    pub session_id: Option<Uuid>,
    pub format: String,
    pub team1: Vec<Uuid>,
    pub team2: Vec<Uuid>,
    #[schema(value_type = Object)]
    pub score: Value,
    pub winner: Winner,
    pub stats_snapshot: BTreeMap<Uuid, BTreeMap<String, i64>>,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_match_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl From<MatchRecord> for MatchResponse {
    fn from(record: MatchRecord) -> Self {
        Self {
            match_id: record.match_id,
            definition_id: record.definition_id,
            session_id: record.session_id,
            format: record.format,
            team1: record.team1,
            team2: record.team2,
            score: record.score,
            winner: record.winner,
            stats_snapshot: record.stats_snapshot,
            recorded_by: record.recorded_by,
            note: record.note,
            correction_of_match_id: record.correction_of_match_id,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordedMatchResponse {
    #[serde(rename = "match")]
    pub match_record: MatchResponse,
    pub entries: Vec<StatEntryResponse>,
}

impl From<RecordedMatch> for RecordedMatchResponse {
    fn from(recorded: RecordedMatch) -> Self {
        Self {
            match_record: recorded.match_record.into(),
            entries: recorded.entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchCorrectionResponse {
    pub original_match_id: Uuid,
    #[serde(rename = "match")]
    pub match_record: MatchResponse,
    pub reversals: Vec<StatEntryResponse>,
    pub reapplications: Vec<StatEntryResponse>,
}

impl From<MatchCorrection> for MatchCorrectionResponse {
    fn from(correction: MatchCorrection) -> Self {
        Self {
            original_match_id: correction.original_match_id,
            match_record: correction.match_record.into(),
            reversals: correction.reversals.into_iter().map(Into::into).collect(),
            reapplications: correction
                .reapplications
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
