use serde_json::Value;

use super::score::{field, non_negative};
use super::{
    AttributeField, DRAWS, DomainDescriptor, LOSSES, MATCHES_PLAYED, MatchConfig, MatchFormat,
    MatchOutcome, MatchResolver, ScoreValidator, StatField, TeamSize, TieBreakRule, WINS, Winner,
};

const GOALS_SCORED: &str = "goals_scored";
const GOALS_CONCEDED: &str = "goals_conceded";

/// `{"team1": 3, "team2": 1}`
struct GoalScorer;

fn goals(score: &Value) -> Result<(u32, u32), String> {
    Ok((
        non_negative(field(score, "team1")?, "team1 goals")?,
        non_negative(field(score, "team2")?, "team2 goals")?,
    ))
}

impl ScoreValidator for GoalScorer {
    fn validate(&self, score: &Value) -> Result<(), String> {
        let extra = score
            .as_object()
            .map(|obj| obj.keys().any(|k| k != "team1" && k != "team2"))
            .unwrap_or(false);
        if extra {
            return Err("score may only contain 'team1' and 'team2'".to_string());
        }
        goals(score).map(|_| ())
    }
}

impl MatchResolver for GoalScorer {
    fn resolve(&self, score: &Value) -> MatchOutcome {
        let (team1, team2) = goals(score).unwrap_or((0, 0));
        MatchOutcome::new(Winner::from_counts(team1, team2), true).with_pair(
            GOALS_SCORED,
            GOALS_CONCEDED,
            team1,
            team2,
        )
    }
}

static SCORER: GoalScorer = GoalScorer;

const STAT_FIELDS: &[StatField] = &[
    StatField::new(MATCHES_PLAYED, "Matches played"),
    StatField::new(WINS, "Wins"),
    StatField::new(DRAWS, "Draws"),
    StatField::new(LOSSES, "Losses"),
    StatField::new(GOALS_SCORED, "Goals scored"),
    StatField::new(GOALS_CONCEDED, "Goals conceded"),
];

const TIE_BREAK: &[TieBreakRule] = &[
    TieBreakRule::desc(WINS),
    TieBreakRule::desc(DRAWS),
    TieBreakRule::difference_desc(GOALS_SCORED, GOALS_CONCEDED),
    TieBreakRule::desc(GOALS_SCORED),
    TieBreakRule::asc(MATCHES_PLAYED),
];

const FORMATS: &[MatchFormat] = &[
    MatchFormat {
        id: "5v5",
        label: "Five-a-side",
        team_size: TeamSize::Exact { size: 5 },
    },
    MatchFormat {
        id: "7v7",
        label: "Seven-a-side",
        team_size: TeamSize::Exact { size: 7 },
    },
    MatchFormat {
        id: "11v11",
        label: "Eleven-a-side",
        team_size: TeamSize::Exact { size: 11 },
    },
    MatchFormat {
        id: "pickup",
        label: "Pickup game",
        team_size: TeamSize::Range { min: 2, max: 11 },
    },
];

const ATTRIBUTES: &[AttributeField] = &[AttributeField {
    id: "position",
    label: "Position",
    options: &["goalkeeper", "defender", "midfielder", "forward"],
}];

pub(crate) static FOOTBALL: DomainDescriptor = DomainDescriptor {
    id: "football",
    name: "Football",
    stat_fields: STAT_FIELDS,
    tie_break: TIE_BREAK,
    match_config: Some(MatchConfig {
        formats: FORMATS,
        default_format: "5v5",
        scorer: &SCORER,
    }),
    default_levels: &[],
    attributes: ATTRIBUTES,
};
