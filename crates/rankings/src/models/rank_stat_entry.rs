use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::StatLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Deltas applied from a match or a manual adjustment.
    Apply,
    /// Negation of an earlier entry.
    Reversal,
    /// Replacement deltas written by a correction.
    Reapply,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Reversal => "reversal",
            Self::Reapply => "reapply",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply" => Ok(Self::Apply),
            "reversal" => Ok(Self::Reversal),
            "reapply" => Ok(Self::Reapply),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

/// Append-only audit row for one delta applied to one member.
///
/// At most one `Apply` entry exists per (definition, user, session) when the
/// session is set, and at most one `Reversal` per corrected entry. Everything
/// a correction writes is a `Reversal` or `Reapply` and keeps the session only
/// for reference, so a correction can bring back a player an earlier
/// correction removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankStatEntry {
    pub entry_id: Uuid,
    pub definition_id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
    pub kind: EntryKind,
    pub deltas: StatLine,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_entry_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl RankStatEntry {
    pub fn is_session_guarded(&self) -> bool {
        self.kind == EntryKind::Apply && self.session_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewRankStatEntry {
    pub entry_id: Uuid,
    pub definition_id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
    pub kind: EntryKind,
    pub deltas: StatLine,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub correction_of_entry_id: Option<Uuid>,
}

impl NewRankStatEntry {
    pub fn is_session_guarded(&self) -> bool {
        self.kind == EntryKind::Apply && self.session_id.is_some()
    }

    pub fn into_entry(self, created_at: NaiveDateTime) -> RankStatEntry {
        RankStatEntry {
            entry_id: self.entry_id,
            definition_id: self.definition_id,
            user_id: self.user_id,
            session_id: self.session_id,
            match_id: self.match_id,
            kind: self.kind,
            deltas: self.deltas,
            recorded_by: self.recorded_by,
            note: self.note,
            correction_of_entry_id: self.correction_of_entry_id,
            created_at,
        }
    }
}
