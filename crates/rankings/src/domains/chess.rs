use serde_json::Value;

use super::score::field;
use super::{
    DRAWS, DomainDescriptor, LOSSES, LevelTemplate, MATCHES_PLAYED, MatchConfig, MatchFormat,
    MatchOutcome, MatchResolver, ScoreValidator, StatField, TeamSize, TieBreakRule, WINS, Winner,
};

/// `{"result": "1-0"}`, `{"result": "0-1"}` or `{"result": "1/2-1/2"}`.
struct ResultScorer;

fn result(score: &Value) -> Result<Winner, String> {
    let text = field(score, "result")?
        .as_str()
        .ok_or_else(|| "result must be a string".to_string())?;

    match text.trim() {
        "1-0" => Ok(Winner::Team1),
        "0-1" => Ok(Winner::Team2),
        "1/2-1/2" | "½-½" => Ok(Winner::Draw),
        other => Err(format!(
            "unknown result '{}', expected 1-0, 0-1 or 1/2-1/2",
            other
        )),
    }
}

impl ScoreValidator for ResultScorer {
    fn validate(&self, score: &Value) -> Result<(), String> {
        result(score).map(|_| ())
    }
}

impl MatchResolver for ResultScorer {
    fn resolve(&self, score: &Value) -> MatchOutcome {
        MatchOutcome::new(result(score).unwrap_or(Winner::Draw), true)
    }
}

static SCORER: ResultScorer = ResultScorer;

const STAT_FIELDS: &[StatField] = &[
    StatField::new(MATCHES_PLAYED, "Games played"),
    StatField::new(WINS, "Wins"),
    StatField::new(DRAWS, "Draws"),
    StatField::new(LOSSES, "Losses"),
];

const TIE_BREAK: &[TieBreakRule] = &[
    TieBreakRule::desc(WINS),
    TieBreakRule::desc(DRAWS),
    TieBreakRule::asc(LOSSES),
    TieBreakRule::desc(MATCHES_PLAYED),
];

const FORMATS: &[MatchFormat] = &[
    MatchFormat {
        id: "individual",
        label: "Individual",
        team_size: TeamSize::Exact { size: 1 },
    },
    MatchFormat {
        id: "team",
        label: "Team match",
        team_size: TeamSize::Range { min: 2, max: 6 },
    },
];

const LEVELS: &[LevelTemplate] = &[
    LevelTemplate { name: "Novice", color: "#D4D4D8" },
    LevelTemplate { name: "Improver", color: "#84CC16" },
    LevelTemplate { name: "Expert", color: "#6366F1" },
    LevelTemplate { name: "Master", color: "#111827" },
];

pub(crate) static CHESS: DomainDescriptor = DomainDescriptor {
    id: "chess",
    name: "Chess",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "individual",
        scorer: &SCORER,
    }),
    default_levels: LEVELS,
    attributes: &[],
};
