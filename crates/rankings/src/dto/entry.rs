use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{EntryKind, RankStatEntry};
use crate::services::EntryCorrection;

/// Request payload for a manual stat adjustment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StatEntryRequest {
    pub user_id: Uuid,

    pub session_id: Option<Uuid>,

    /// Signed change per stat field.
    #[validate(length(min = 1, message = "At least one stat delta is required"))]
    pub deltas: BTreeMap<String, i64>,

    pub recorded_by: Uuid,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Request payload for replacing a manual entry's deltas
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CorrectEntryRequest {
    #[validate(length(min = 1, message = "At least one stat delta is required"))]
    pub deltas: BTreeMap<String, i64>,

    pub recorded_by: Uuid,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatEntryResponse {
    pub entry_id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
    pub kind: EntryKind,
    pub deltas: BTreeMap<String, i64>,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_entry_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl From<RankStatEntry> for StatEntryResponse {
    fn from(entry: RankStatEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            user_id: entry.user_id,
            session_id: entry.session_id,
            match_id: entry.match_id,
            kind: entry.kind,
            deltas: entry.deltas,
            recorded_by: entry.recorded_by,
            note: entry.note,
            correction_of_entry_id: entry.correction_of_entry_id,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryCorrectionResponse {
    pub reversal: StatEntryResponse,
    pub reapplication: StatEntryResponse,
}

impl From<EntryCorrection> for EntryCorrectionResponse {
    fn from(correction: EntryCorrection) -> Self {
        Self {
            reversal: correction.reversal.into(),
            reapplication: correction.reapplication.into(),
        }
    }
}
