use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StatLine;

/// A member's cumulative stats within one definition.
/// Only the stat aggregator changes `stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRank {
    pub definition_id: Uuid,
    pub user_id: Uuid,
    pub stats: StatLine,
    pub current_level_id: Option<Uuid>,
    pub last_activity_at: Option<NaiveDateTime>,
}

impl MemberRank {
    pub fn new(definition_id: Uuid, user_id: Uuid) -> Self {
        Self {
            definition_id,
            user_id,
            stats: StatLine::new(),
            current_level_id: None,
            last_activity_at: None,
        }
    }

    pub fn stat(&self, field: &str) -> i64 {
        self.stats.get(field).copied().unwrap_or(0)
    }
}
