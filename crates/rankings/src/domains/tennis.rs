use super::racquet::{STAT_FIELDS, SetScorer, TIE_BREAK};
use super::{AttributeField, DomainDescriptor, MatchConfig, MatchFormat, TeamSize};

static SCORER: SetScorer = SetScorer { max_sets: 5 };

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

const ATTRIBUTES: &[AttributeField] = &[AttributeField {
    id: "dominant_hand",
    label: "Dominant hand",
    options: &["left", "right"],
}];

pub(crate) static TENNIS: DomainDescriptor = DomainDescriptor {
    id: "tennis",
    name: "Tennis",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "singles",
        scorer: &SCORER,
    }),
    default_levels: &[],
    attributes: ATTRIBUTES,
};
