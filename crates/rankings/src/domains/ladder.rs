//! Rally-point games played to a target with a two-point margin.

use serde_json::Value;

use super::score::{check_decided, pairs, tally, totals};
use super::{
    LOSSES, MATCHES_PLAYED, MatchOutcome, MatchResolver, ScoreValidator, StatField, TieBreakRule,
    WINS, Winner,
};

pub(crate) const GAMES_WON: &str = "games_won";
pub(crate) const GAMES_LOST: &str = "games_lost";
pub(crate) const POINTS_WON: &str = "points_won";
pub(crate) const POINTS_LOST: &str = "points_lost";

pub(crate) const STAT_FIELDS: &[StatField] = &[
    StatField::new(MATCHES_PLAYED, "Matches played"),
    StatField::new(WINS, "Wins"),
    StatField::new(LOSSES, "Losses"),
    StatField::new(GAMES_WON, "Games won"),
    StatField::new(GAMES_LOST, "Games lost"),
    StatField::new(POINTS_WON, "Points won"),
    StatField::new(POINTS_LOST, "Points lost"),
];

pub(crate) const TIE_BREAK: &[TieBreakRule] = &[
    TieBreakRule::desc(WINS),
    TieBreakRule::difference_desc(GAMES_WON, GAMES_LOST),
    TieBreakRule::difference_desc(POINTS_WON, POINTS_LOST),
    TieBreakRule::asc(MATCHES_PLAYED),
];

/// `{"games": [[11, 9], [9, 11], [12, 10]]}`
#[derive(Debug, Clone, Copy)]
pub(crate) struct PointLadder {
    pub target: u32,
    /// Sudden-death score that ends extended deuce, if any.
    pub cap: Option<u32>,
    pub max_games: usize,
}

impl PointLadder {
    pub fn is_finished_game(&self, a: u32, b: u32) -> bool {
        let (winner, loser) = (a.max(b), a.min(b));
        if winner < self.target || winner == loser {
            return false;
        }
        if let Some(cap) = self.cap
            && winner >= cap
        {
            return winner == cap && (loser + 1 == cap || loser + 2 == cap);
        }
        if loser + 1 >= self.target {
            winner == loser + 2
        } else {
            winner == self.target
        }
    }
}

impl ScoreValidator for PointLadder {
    fn validate(&self, score: &Value) -> Result<(), String> {
        let games = pairs(score, "games", "game", self.max_games)?;

        for (idx, &(a, b)) in games.iter().enumerate() {
            if !self.is_finished_game(a, b) {
                return Err(format!(
                    "game {}: {}-{} is not a finished game to {}",
                    idx + 1,
                    a,
                    b,
                    self.target
                ));
            }
        }

        check_decided(&games, self.max_games, "game")?;

        let (team1, team2) = tally(&games);
        if team1 == team2 {
            return Err(format!("games are tied {}-{}, a match needs a winner", team1, team2));
        }

        Ok(())
    }
}

impl MatchResolver for PointLadder {
    fn resolve(&self, score: &Value) -> MatchOutcome {
        let games = pairs(score, "games", "game", self.max_games).unwrap_or_default();
        let (games1, games2) = tally(&games);
        let (points1, points2) = totals(&games);

        MatchOutcome::new(Winner::from_counts(games1, games2), false)
            .with_pair(GAMES_WON, GAMES_LOST, games1, games2)
            .with_pair(POINTS_WON, POINTS_LOST, points1, points2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TO_ELEVEN: PointLadder = PointLadder {
        target: 11,
        cap: None,
        max_games: 7,
    };

    const TO_TWENTY_ONE: PointLadder = PointLadder {
        target: 21,
        cap: Some(30),
        max_games: 3,
    };

    #[test]
    fn test_eleven_point_games() {
        assert!(TO_ELEVEN.is_finished_game(11, 0));
        assert!(TO_ELEVEN.is_finished_game(9, 11));
        assert!(TO_ELEVEN.is_finished_game(12, 10));
        assert!(TO_ELEVEN.is_finished_game(18, 16));
        assert!(!TO_ELEVEN.is_finished_game(11, 10));
        assert!(!TO_ELEVEN.is_finished_game(12, 9));
        assert!(!TO_ELEVEN.is_finished_game(10, 8));
        assert!(!TO_ELEVEN.is_finished_game(13, 10));
    }

    #[test]
    fn test_capped_games() {
        assert!(TO_TWENTY_ONE.is_finished_game(21, 19));
        assert!(TO_TWENTY_ONE.is_finished_game(22, 20));
        assert!(TO_TWENTY_ONE.is_finished_game(30, 29));
        assert!(TO_TWENTY_ONE.is_finished_game(30, 28));
        assert!(!TO_TWENTY_ONE.is_finished_game(31, 29));
        assert!(!TO_TWENTY_ONE.is_finished_game(21, 20));
        assert!(!TO_TWENTY_ONE.is_finished_game(30, 27));
    }
}
