//! Set-based scoring shared by tennis and padel.

use serde_json::Value;

use super::score::{check_decided, pairs, tally, totals};
use super::{
    LOSSES, MATCHES_PLAYED, MatchOutcome, MatchResolver, ScoreValidator, StatField, TieBreakRule,
    WINS, Winner,
};

pub(crate) const SETS_WON: &str = "sets_won";
pub(crate) const SETS_LOST: &str = "sets_lost";
pub(crate) const GAMES_WON: &str = "games_won";
pub(crate) const GAMES_LOST: &str = "games_lost";

pub(crate) const STAT_FIELDS: &[StatField] = &[
    StatField::new(MATCHES_PLAYED, "Matches played"),
    StatField::new(WINS, "Wins"),
    StatField::new(LOSSES, "Losses"),
    StatField::new(SETS_WON, "Sets won"),
    StatField::new(SETS_LOST, "Sets lost"),
    StatField::new(GAMES_WON, "Games won"),
    StatField::new(GAMES_LOST, "Games lost"),
];

pub(crate) const TIE_BREAK: &[TieBreakRule] = &[
    TieBreakRule::desc(WINS),
    TieBreakRule::difference_desc(SETS_WON, SETS_LOST),
    TieBreakRule::difference_desc(GAMES_WON, GAMES_LOST),
    TieBreakRule::asc(MATCHES_PLAYED),
];

/// `{"sets": [[6, 4], [3, 6], [7, 5]]}`
#[derive(Debug, Clone, Copy)]
pub(crate) struct SetScorer {
    pub max_sets: usize,
}

/// 6-0..6-4, 7-5, or 7-6 after a tiebreak.
pub(crate) fn is_valid_set(a: u32, b: u32) -> bool {
    let (winner, loser) = (a.max(b), a.min(b));
    match winner {
        6 => loser <= 4,
        7 => loser == 5 || loser == 6,
        _ => false,
    }
}

impl ScoreValidator for SetScorer {
    fn validate(&self, score: &Value) -> Result<(), String> {
        let sets = pairs(score, "sets", "set", self.max_sets)?;

        for (idx, &(a, b)) in sets.iter().enumerate() {
            if !is_valid_set(a, b) {
                return Err(format!(
                    "set {}: {}-{} is not a valid set score",
                    idx + 1,
                    a,
                    b
                ));
            }
        }

        check_decided(&sets, self.max_sets, "set")?;

        let (team1, team2) = tally(&sets);
        if team1 == team2 {
            return Err(format!("sets are tied {}-{}, a match needs a winner", team1, team2));
        }

        Ok(())
    }
}

impl MatchResolver for SetScorer {
    fn resolve(&self, score: &Value) -> MatchOutcome {
        let sets = pairs(score, "sets", "set", self.max_sets).unwrap_or_default();
        let (sets1, sets2) = tally(&sets);
        let (games1, games2) = totals(&sets);

        MatchOutcome::new(Winner::from_counts(sets1, sets2), false)
            .with_pair(SETS_WON, SETS_LOST, sets1, sets2)
            .with_pair(GAMES_WON, GAMES_LOST, games1, games2)
    }
}
