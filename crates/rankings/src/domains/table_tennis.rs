use super::ladder::{PointLadder, STAT_FIELDS, TIE_BREAK};
use super::{DomainDescriptor, LevelTemplate, MatchConfig, MatchFormat, TeamSize};

static SCORER: PointLadder = PointLadder {
    target: 11,
    cap: None,
    max_games: 7,
};

const FORMATS: &[MatchFormat] = &[
    MatchFormat {
        id: "singles",
        label: "Singles",
        team_size: TeamSize::Exact { size: 1 },
    },
    MatchFormat {
        id: "doubles",
        label: "Doubles",
        team_size: TeamSize::Exact { size: 2 },
    },
];

const LEVELS: &[LevelTemplate] = &[
    LevelTemplate { name: "Casual", color: "#A3A3A3" },
    LevelTemplate { name: "Club", color: "#F59E0B" },
    LevelTemplate { name: "League", color: "#0EA5E9" },
];

pub(crate) static TABLE_TENNIS: DomainDescriptor = DomainDescriptor {
    id: "table_tennis",
    name: "Table tennis",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "singles",
        scorer: &SCORER,
    }),
    default_levels: LEVELS,
    attributes: &[],
};
