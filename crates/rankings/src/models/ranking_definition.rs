use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One ranking system enabled for one activity of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RankingDefinition {
    pub definition_id: Uuid,
    pub organization_id: Uuid,
    pub activity_id: Uuid,
    pub domain_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRankingDefinition {
    pub definition_id: Uuid,
    pub organization_id: Uuid,
    pub activity_id: Uuid,
    pub domain_id: String,
}
