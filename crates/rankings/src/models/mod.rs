mod match_record;
mod member_rank;
mod rank_stat_entry;
mod ranking_definition;
mod ranking_level;

use std::collections::BTreeMap;

use uuid::Uuid;

pub use match_record::{MatchRecord, NewMatchRecord};
pub use member_rank::MemberRank;
pub use rank_stat_entry::{EntryKind, NewRankStatEntry, RankStatEntry};
pub use ranking_definition::{NewRankingDefinition, RankingDefinition};
pub use ranking_level::{NewRankingLevel, RankingLevel};

/// Stat field id -> value. Ordered so serialized lines are stable.
pub type StatLine = BTreeMap<String, i64>;

/// Per-user stat lines derived from one match.
pub type StatSnapshot = BTreeMap<Uuid, StatLine>;
