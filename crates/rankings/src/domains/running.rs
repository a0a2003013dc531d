use super::{AttributeField, DomainDescriptor, LevelTemplate, StatField, TieBreakRule};

const SESSIONS_ATTENDED: &str = "sessions_attended";
const DISTANCE_M: &str = "distance_m";
const ELEVATION_M: &str = "elevation_m";

const STAT_FIELDS: &[StatField] = &[
    StatField::new(SESSIONS_ATTENDED, "Sessions attended"),
    StatField::new(DISTANCE_M, "Distance (m)"),
    StatField::new(ELEVATION_M, "Elevation gain (m)"),
];

const TIE_BREAK: &[TieBreakRule] = &[
    TieBreakRule::desc(DISTANCE_M),
    TieBreakRule::desc(SESSIONS_ATTENDED),
    TieBreakRule::desc(ELEVATION_M),
];

const LEVELS: &[LevelTemplate] = &[
    LevelTemplate { name: "Walker", color: "#FDE68A" },
    LevelTemplate { name: "Jogger", color: "#FCA5A5" },
    LevelTemplate { name: "Runner", color: "#60A5FA" },
    LevelTemplate { name: "Racer", color: "#1D4ED8" },
];

const ATTRIBUTES: &[AttributeField] = &[AttributeField {
    id: "preferred_distance",
    label: "Preferred distance",
    options: &["5k", "10k", "half_marathon", "marathon"],
}];

/// Attendance-driven; stats arrive as manual entries, never from matches.
pub(crate) static RUNNING: DomainDescriptor = DomainDescriptor {
    id: "running",
    name: "Running club",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: None,
    default_levels: LEVELS,
    attributes: ATTRIBUTES,
};
