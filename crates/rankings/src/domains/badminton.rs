use super::ladder::{PointLadder, STAT_FIELDS, TIE_BREAK};
use super::{DomainDescriptor, MatchConfig, MatchFormat, TeamSize};

static SCORER: PointLadder = PointLadder {
    target: 21,
    cap: Some(30),
    max_games: 3,
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

pub(crate) static BADMINTON: DomainDescriptor = DomainDescriptor {
    id: "badminton",
    name: "Badminton",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "doubles",
        scorer: &SCORER,
    }),
    default_levels: &[],
    attributes: &[],
};
