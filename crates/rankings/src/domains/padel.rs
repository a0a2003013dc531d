use super::racquet::{STAT_FIELDS, SetScorer, TIE_BREAK};
use super::{AttributeField, DomainDescriptor, LevelTemplate, MatchConfig, MatchFormat, TeamSize};

static SCORER: SetScorer = SetScorer { max_sets: 3 };

const FORMATS: &[MatchFormat] = &[MatchFormat {
    id: "doubles",
    label: "Doubles",
    team_size: TeamSize::Exact { size: 2 },
}];

const LEVELS: &[LevelTemplate] = &[
    LevelTemplate { name: "Beginner", color: "#9CA3AF" },
    LevelTemplate { name: "Intermediate", color: "#22C55E" },
    LevelTemplate { name: "Advanced", color: "#3B82F6" },
    LevelTemplate { name: "Competition", color: "#A855F7" },
    LevelTemplate { name: "Pro", color: "#EF4444" },
];

const ATTRIBUTES: &[AttributeField] = &[AttributeField {
    id: "preferred_side",
    label: "Preferred side",
    options: &["left", "right", "both"],
}];

pub(crate) static PADEL: DomainDescriptor = DomainDescriptor {
    id: "padel",
    name: "Padel",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "doubles",
        scorer: &SCORER,
    }),
    default_levels: LEVELS,
    attributes: ATTRIBUTES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{MatchResolver, ScoreValidator};
    use serde_json::json;

    #[test]
    fn test_padel_caps_at_three_sets() {
        let scorer = PADEL.match_config.unwrap().scorer;
        assert!(scorer.validate(&json!({"sets": [[6, 3], [6, 4]]})).is_ok());
        assert!(
            scorer
                .validate(&json!({"sets": [[6, 3], [3, 6], [6, 4], [6, 4]]}))
                .is_err()
        );
        assert!(
            scorer
                .validate(&json!({"sets": [[6, 4], [6, 4], [4, 6]]}))
                .is_err()
        );
    }

    #[test]
    fn test_padel_is_doubles_only() {
        let config = PADEL.match_config.unwrap();
        assert_eq!(config.formats.len(), 1);
        assert!(config.format("doubles").unwrap().team_size.allows(2));
        assert!(config.format("singles").is_none());
    }
}
