use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{MemberRank, RankingDefinition, RankingLevel};
use crate::services::LeaderboardRow;

/// Request payload for enabling a ranking on an activity
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDefinitionRequest {
    pub organization_id: Uuid,

    pub activity_id: Uuid,

    #[validate(length(min = 1, max = 64, message = "Domain id is required"))]
    pub domain_id: String,

    /// Copy the domain's default level ladder into the new definition.
    #[serde(default)]
    pub seed_default_levels: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct DefinitionListQuery {
    pub organization_id: Uuid,
}

/// Request payload for adding a level to a definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLevelRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,

    #[validate(range(min = 0, max = 1000))]
    pub level_order: i32,
}

/// Request payload for manually setting a member's level; `null` clears it
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignLevelRequest {
    pub level_id: Option<Uuid>,
}

fn validate_color(color: &str) -> Result<(), validator::ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_color"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingDefinitionResponse {
    pub definition_id: Uuid,
    pub organization_id: Uuid,
    pub activity_id: Uuid,
    pub domain_id: String,
    pub created_at: NaiveDateTime,
}

impl From<RankingDefinition> for RankingDefinitionResponse {
    fn from(definition: RankingDefinition) -> Self {
        Self {
            definition_id: definition.definition_id,
            organization_id: definition.organization_id,
            activity_id: definition.activity_id,
            domain_id: definition.domain_id,
            created_at: definition.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingLevelResponse {
    pub level_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub level_order: i32,
}

impl From<RankingLevel> for RankingLevelResponse {
    fn from(level: RankingLevel) -> Self {
        Self {
            level_id: level.level_id,
            name: level.name,
            color: level.color,
            level_order: level.level_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberRankResponse {
    pub user_id: Uuid,
    pub stats: BTreeMap<String, i64>,
    pub current_level_id: Option<Uuid>,
    pub last_activity_at: Option<NaiveDateTime>,
}

impl From<MemberRank> for MemberRankResponse {
    fn from(rank: MemberRank) -> Self {
        Self {
            user_id: rank.user_id,
            stats: rank.stats,
            current_level_id: rank.current_level_id,
            last_activity_at: rank.last_activity_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntryResponse {
    /// 1-based, no shared positions.
    pub position: u32,
    pub user_id: Uuid,
    pub stats: BTreeMap<String, i64>,
    pub level: Option<RankingLevelResponse>,
    pub last_activity_at: Option<NaiveDateTime>,
}

impl From<LeaderboardRow> for LeaderboardEntryResponse {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            position: row.position,
            user_id: row.member.user_id,
            stats: row.member.stats,
            level: row.level.map(RankingLevelResponse::from),
            last_activity_at: row.member.last_activity_at,
        }
    }
}
