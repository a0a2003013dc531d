use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::StatSnapshot;
use crate::domains::Winner;

/// An immutable record of one resolved match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Uuid,
    pub definition_id: Uuid,
    pub session_id: Option<Uuid>,
    pub format: String,
    pub team1: Vec<Uuid>,
    pub team2: Vec<Uuid>,
    pub score: Value,
    pub winner: Winner,
    /// Stats each participant received, kept so audits survive stat-field changes.
    pub stats_snapshot: StatSnapshot,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_match_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl MatchRecord {
    pub fn participants(&self) -> impl Iterator<Item = &Uuid> {
        self.team1.iter().chain(self.team2.iter())
    }
}

#[derive(Debug, Clone)]
pub struct NewMatchRecord {
    pub match_id: Uuid,
    pub definition_id: Uuid,
    pub session_id: Option<Uuid>,
    pub format: String,
    pub team1: Vec<Uuid>,
    pub team2: Vec<Uuid>,
    pub score: Value,
    pub winner: Winner,
    pub stats_snapshot: StatSnapshot,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_match_id: Option<Uuid>,
}

impl NewMatchRecord {
    pub fn into_record(self, created_at: NaiveDateTime) -> MatchRecord {
        MatchRecord {
            match_id: self.match_id,
            definition_id: self.definition_id,
            session_id: self.session_id,
            format: self.format,
            team1: self.team1,
            team2: self.team2,
            score: self.score,
            winner: self.winner,
            stats_snapshot: self.stats_snapshot,
            recorded_by: self.recorded_by,
            note: self.note,
            correction_of_match_id: self.correction_of_match_id,
            created_at,
        }
    }
}
