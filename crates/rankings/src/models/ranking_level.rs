use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named tier within a definition, ordered lowest to highest by `level_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RankingLevel {
    pub level_id: Uuid,
    pub definition_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub level_order: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRankingLevel {
    pub level_id: Uuid,
    pub definition_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub level_order: i32,
}
