use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domains::{Direction, DomainDescriptor, FormatSummary, MatchFormat, TeamSize, TieBreakRule};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatFieldInfo {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TieBreakInfo {
    /// Stat field id, or `(left - right)` style expression.
    pub key: String,
    pub fields: Vec<String>,
    pub direction: Direction,
}

impl From<&TieBreakRule> for TieBreakInfo {
    fn from(rule: &TieBreakRule) -> Self {
        Self {
            key: rule.key.to_string(),
            fields: rule.key.fields().into_iter().map(String::from).collect(),
            direction: rule.direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchFormatInfo {
    pub id: String,
    pub label: String,
    pub team_size: TeamSize,
}

impl From<&MatchFormat> for MatchFormatInfo {
    fn from(format: &MatchFormat) -> Self {
        Self {
            id: format.id.to_string(),
            label: format.label.to_string(),
            team_size: format.team_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchFormatsResponse {
    pub formats: Vec<MatchFormatInfo>,
    pub default_format: String,
}

impl From<FormatSummary> for MatchFormatsResponse {
    fn from(summary: FormatSummary) -> Self {
        Self {
            formats: summary.formats.iter().map(MatchFormatInfo::from).collect(),
            default_format: summary.default_format.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LevelTemplateInfo {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttributeFieldInfo {
    pub id: String,
    pub label: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DomainResponse {
    pub id: String,
    pub name: String,
    pub stat_fields: Vec<StatFieldInfo>,
    pub tie_break: Vec<TieBreakInfo>,
    pub match_mode: bool,
    pub match_formats: Option<MatchFormatsResponse>,
    pub default_levels: Vec<LevelTemplateInfo>,
    pub attributes: Vec<AttributeFieldInfo>,
}

impl From<&DomainDescriptor> for DomainResponse {
    fn from(descriptor: &DomainDescriptor) -> Self {
        Self {
            id: descriptor.id.to_string(),
            name: descriptor.name.to_string(),
            stat_fields: descriptor
                .stat_fields
                .iter()
                .map(|field| StatFieldInfo {
                    id: field.id.to_string(),
                    label: field.label.to_string(),
                })
                .collect(),
            tie_break: descriptor.tie_break.iter().map(TieBreakInfo::from).collect(),
            match_mode: descriptor.is_match_mode(),
            match_formats: descriptor.match_config.map(|config| {
                MatchFormatsResponse::from(FormatSummary {
                    formats: config.formats,
                    default_format: config.default_format,
                })
            }),
            default_levels: descriptor
                .default_levels
                .iter()
                .map(|level| LevelTemplateInfo {
                    name: level.name.to_string(),
                    color: level.color.to_string(),
                })
                .collect(),
            attributes: descriptor
                .attributes
                .iter()
                .map(|attribute| AttributeFieldInfo {
                    id: attribute.id.to_string(),
                    label: attribute.label.to_string(),
                    options: attribute.options.iter().map(|o| o.to_string()).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TeamSizeQuery {
    /// Players on both teams together.
    pub total_players: usize,
}

impl TeamSizeQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.total_players == 0 {
            return Err("total_players must be >= 1".to_string());
        }
        Ok(())
    }
}
