//! Pluggable activity domains.
//!
//! Each supported activity is described by a static [`DomainDescriptor`]: the
//! stat fields it accumulates, how its leaderboard breaks ties, and (for
//! match-based activities) the formats it accepts plus a [`MatchScorer`] that
//! validates raw scores and resolves them into per-team stat contributions.

mod badminton;
mod chess;
mod football;
mod ladder;
mod padel;
mod racquet;
mod registry;
mod running;
mod score;
mod table_tennis;
mod tennis;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::StatLine;

pub use registry::{DomainRegistry, FormatSummary};

pub const MATCHES_PLAYED: &str = "matches_played";
pub const WINS: &str = "wins";
pub const LOSSES: &str = "losses";
pub const DRAWS: &str = "draws";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatField {
    pub id: &'static str,
    pub label: &'static str,
}

impl StatField {
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
}

impl BinaryOp {
    fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            Self::Add => left.saturating_add(right),
            Self::Sub => left.saturating_sub(right),
        }
    }
}

/// What a tie-break rule compares: a stat directly, or `left op right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Field(&'static str),
    Binary {
        op: BinaryOp,
        left: &'static str,
        right: &'static str,
    },
}

impl SortKey {
    /// Missing fields count as zero.
    pub fn evaluate(&self, stats: &StatLine) -> i64 {
        let value = |field: &str| stats.get(field).copied().unwrap_or(0);
        match *self {
            Self::Field(field) => value(field),
            Self::Binary { op, left, right } => op.apply(value(left), value(right)),
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        match *self {
            Self::Field(field) => vec![field],
            Self::Binary { left, right, .. } => vec![left, right],
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{}", field),
            Self::Binary { op, left, right } => {
                let symbol = match op {
                    BinaryOp::Add => '+',
                    BinaryOp::Sub => '-',
                };
                write!(f, "({} {} {})", left, symbol, right)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieBreakRule {
    pub key: SortKey,
    pub direction: Direction,
}

impl TieBreakRule {
    pub const fn desc(field: &'static str) -> Self {
        Self {
            key: SortKey::Field(field),
            direction: Direction::Desc,
        }
    }

    pub const fn asc(field: &'static str) -> Self {
        Self {
            key: SortKey::Field(field),
            direction: Direction::Asc,
        }
    }

    pub const fn difference_desc(left: &'static str, right: &'static str) -> Self {
        Self {
            key: SortKey::Binary {
                op: BinaryOp::Sub,
                left,
                right,
            },
            direction: Direction::Desc,
        }
    }

    /// Orders `a` before `b` when `a` ranks higher under this rule.
    pub fn compare(&self, a: &StatLine, b: &StatLine) -> Ordering {
        let (left, right) = (self.key.evaluate(a), self.key.evaluate(b));
        match self.direction {
            Direction::Asc => left.cmp(&right),
            Direction::Desc => right.cmp(&left),
        }
    }
}

/// Players per team allowed by a match format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TeamSize {
    Exact { size: u32 },
    Range { min: u32, max: u32 },
}

impl TeamSize {
    pub fn allows(&self, players: usize) -> bool {
        let players = players as u64;
        match *self {
            Self::Exact { size } => players == u64::from(size),
            Self::Range { min, max } => (u64::from(min)..=u64::from(max)).contains(&players),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFormat {
    pub id: &'static str,
    pub label: &'static str,
    pub team_size: TeamSize,
}

impl MatchFormat {
    /// Whether two equally sized teams totalling `total_players` fit this format.
    pub fn fits_total(&self, total_players: usize) -> bool {
        total_players > 0 && total_players % 2 == 0 && self.team_size.allows(total_players / 2)
    }
}

/// Checks raw scores. Pure: same input, same answer.
pub trait ScoreValidator {
    fn validate(&self, score: &Value) -> Result<(), String>;
}

/// Turns an accepted raw score into a winner and this match's stat
/// contribution per team. Only called on scores the validator accepted.
pub trait MatchResolver {
    fn resolve(&self, score: &Value) -> MatchOutcome;
}

pub trait MatchScorer: ScoreValidator + MatchResolver + Send + Sync {}

impl<T> MatchScorer for T where T: ScoreValidator + MatchResolver + Send + Sync {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Team1,
    Team2,
    Draw,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team1 => "team1",
            Self::Team2 => "team2",
            Self::Draw => "draw",
        }
    }

    pub fn from_counts(team1: u32, team2: u32) -> Self {
        match team1.cmp(&team2) {
            Ordering::Greater => Self::Team1,
            Ordering::Less => Self::Team2,
            Ordering::Equal => Self::Draw,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Winner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "team1" => Ok(Self::Team1),
            "team2" => Ok(Self::Team2),
            "draw" => Ok(Self::Draw),
            other => Err(format!("unknown winner '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Winner,
    pub team1: StatLine,
    pub team2: StatLine,
}

impl MatchOutcome {
    /// Seeds both lines with `matches_played` and the outcome bucket.
    /// `draws` is only written when the domain tracks it.
    pub fn new(winner: Winner, tracks_draws: bool) -> Self {
        let line = |won: bool, lost: bool| {
            let mut stats = StatLine::new();
            stats.insert(MATCHES_PLAYED.to_string(), 1);
            stats.insert(WINS.to_string(), i64::from(won));
            stats.insert(LOSSES.to_string(), i64::from(lost));
            if tracks_draws {
                stats.insert(DRAWS.to_string(), i64::from(!won && !lost));
            }
            stats
        };

        let (team1, team2) = match winner {
            Winner::Team1 => (line(true, false), line(false, true)),
            Winner::Team2 => (line(false, true), line(true, false)),
            Winner::Draw => (line(false, false), line(false, false)),
        };

        Self {
            winner,
            team1,
            team2,
        }
    }

    /// Records a for/against counter pair, mirrored for the opponents.
    pub fn with_pair(mut self, won_field: &str, lost_field: &str, team1: u32, team2: u32) -> Self {
        self.team1.insert(won_field.to_string(), i64::from(team1));
        self.team1.insert(lost_field.to_string(), i64::from(team2));
        self.team2.insert(won_field.to_string(), i64::from(team2));
        self.team2.insert(lost_field.to_string(), i64::from(team1));
        self
    }
}

#[derive(Clone, Copy)]
pub struct MatchConfig {
    pub formats: &'static [MatchFormat],
    pub default_format: &'static str,
    pub scorer: &'static dyn MatchScorer,
}

impl MatchConfig {
    pub fn format(&self, id: &str) -> Option<&'static MatchFormat> {
        self.formats.iter().find(|format| format.id == id)
    }
}

impl fmt::Debug for MatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchConfig")
            .field("formats", &self.formats)
            .field("default_format", &self.default_format)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTemplate {
    pub name: &'static str,
    pub color: &'static str,
}

/// Free-form categorical tag offered for members; never accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeField {
    pub id: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

#[derive(Debug)]
pub struct DomainDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub stat_fields: &'static [StatField],
    pub tie_break: &'static [TieBreakRule],
    pub match_config: Option<MatchConfig>,
    pub default_levels: &'static [LevelTemplate],
    pub attributes: &'static [AttributeField],
}

impl DomainDescriptor {
    pub fn has_stat_field(&self, id: &str) -> bool {
        self.stat_fields.iter().any(|field| field.id == id)
    }

    pub fn stat_field_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stat_fields.iter().map(|field| field.id)
    }

    /// Every declared field at zero.
    pub fn empty_stats(&self) -> StatLine {
        self.stat_field_ids()
            .map(|id| (id.to_string(), 0))
            .collect()
    }

    pub fn is_match_mode(&self) -> bool {
        self.match_config.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pairs: &[(&str, i64)]) -> StatLine {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_binary_sort_key_evaluates_difference() {
        let key = SortKey::Binary {
            op: BinaryOp::Sub,
            left: "goals_scored",
            right: "goals_conceded",
        };
        assert_eq!(key.evaluate(&stats(&[("goals_scored", 7), ("goals_conceded", 9)])), -2);
        assert_eq!(key.evaluate(&StatLine::new()), 0);
        assert_eq!(key.to_string(), "(goals_scored - goals_conceded)");
    }

    #[test]
    fn test_binary_sort_key_evaluates_sum() {
        let key = SortKey::Binary {
            op: BinaryOp::Add,
            left: "wins",
            right: "draws",
        };
        assert_eq!(key.evaluate(&stats(&[("wins", 4), ("draws", 3)])), 7);
        assert_eq!(key.evaluate(&stats(&[("wins", i64::MAX), ("draws", 1)])), i64::MAX);
        assert_eq!(key.to_string(), "(wins + draws)");
        assert_eq!(key.fields(), vec!["wins", "draws"]);

        let fewest_decided = TieBreakRule {
            key,
            direction: Direction::Asc,
        };
        let busy = stats(&[("wins", 2), ("draws", 2)]);
        let quiet = stats(&[("wins", 3)]);
        assert_eq!(fewest_decided.compare(&quiet, &busy), Ordering::Less);
        assert_eq!(fewest_decided.compare(&busy, &busy), Ordering::Equal);
    }

    #[test]
    fn test_tie_break_direction() {
        let high = stats(&[("wins", 5)]);
        let low = stats(&[("wins", 2)]);
        assert_eq!(TieBreakRule::desc("wins").compare(&high, &low), Ordering::Less);
        assert_eq!(TieBreakRule::asc("wins").compare(&high, &low), Ordering::Greater);
    }

    #[test]
    fn test_team_size_rules() {
        assert!(TeamSize::Exact { size: 2 }.allows(2));
        assert!(!TeamSize::Exact { size: 2 }.allows(3));
        assert!(TeamSize::Range { min: 3, max: 5 }.allows(4));
        assert!(!TeamSize::Range { min: 3, max: 5 }.allows(6));
    }

    #[test]
    fn test_outcome_buckets() {
        let outcome = MatchOutcome::new(Winner::Team2, true);
        assert_eq!(outcome.team1[LOSSES], 1);
        assert_eq!(outcome.team2[WINS], 1);
        assert_eq!(outcome.team1[DRAWS], 0);

        let draw = MatchOutcome::new(Winner::Draw, true);
        assert_eq!(draw.team1[DRAWS], 1);
        assert_eq!(draw.team2[DRAWS], 1);

        let no_draws = MatchOutcome::new(Winner::Team1, false);
        assert!(!no_draws.team1.contains_key(DRAWS));
    }
}
