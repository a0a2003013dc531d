//! Persistence for rankings.
//!
//! [`RankingStore`] is everything the engine needs from storage. Writes that
//! touch cumulative stats only go through [`RankingStore::commit`], which
//! must apply a whole [`LedgerBatch`] or nothing.

pub mod definition;
pub mod ledger;
pub mod level;
pub mod match_record;
pub mod member_rank;
pub mod memory;
pub mod postgres;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    MatchRecord, MemberRank, NewMatchRecord, NewRankStatEntry, NewRankingDefinition,
    NewRankingLevel, RankStatEntry, RankingDefinition, RankingLevel, StatLine,
};

pub use memory::MemoryRankingStore;
pub use postgres::PgRankingStore;

/// One atomic unit of ledger work.
///
/// Committing it inserts the optional match record, inserts every entry
/// (rejecting duplicates of a session-linked entry and second reversals of the
/// same entry), then adds each member's summed deltas into their stats.
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    pub match_record: Option<NewMatchRecord>,
    pub entries: Vec<NewRankStatEntry>,
}

impl LedgerBatch {
    pub fn single(entry: NewRankStatEntry) -> Self {
        Self {
            match_record: None,
            entries: vec![entry],
        }
    }

    /// Deltas summed per (definition, user), in key order. Stores merge in
    /// this order so concurrent batches lock member rows consistently.
    pub fn member_deltas(&self) -> BTreeMap<(Uuid, Uuid), StatLine> {
        let mut members: BTreeMap<(Uuid, Uuid), StatLine> = BTreeMap::new();
        for entry in &self.entries {
            let line = members
                .entry((entry.definition_id, entry.user_id))
                .or_default();
            for (field, delta) in &entry.deltas {
                let value = line.entry(field.clone()).or_insert(0);
                *value = value.saturating_add(*delta);
            }
        }
        members
    }
}

#[derive(Debug, Clone)]
pub struct CommittedBatch {
    pub match_record: Option<MatchRecord>,
    pub entries: Vec<RankStatEntry>,
    /// Member ranks as they stand after the commit, one per touched user.
    pub member_ranks: Vec<MemberRank>,
}

#[async_trait::async_trait]
pub trait RankingStore: Send + Sync {
    /// Fails with `ConstraintViolation` if the organization already ranks this activity.
    async fn insert_definition(
        &self,
        definition: NewRankingDefinition,
        levels: Vec<NewRankingLevel>,
    ) -> Result<RankingDefinition>;

    async fn find_definition(&self, definition_id: Uuid) -> Result<RankingDefinition>;

    async fn list_definitions(&self, organization_id: Uuid) -> Result<Vec<RankingDefinition>>;

    /// Fails with `ConstraintViolation` if the order is already taken.
    async fn insert_level(&self, level: NewRankingLevel) -> Result<RankingLevel>;

    /// Lowest level first.
    async fn list_levels(&self, definition_id: Uuid) -> Result<Vec<RankingLevel>>;

    /// Sets (or clears) a member's level, creating the member rank if needed.
    async fn set_member_level(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
        level_id: Option<Uuid>,
    ) -> Result<MemberRank>;

    async fn find_member_rank(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRank>>;

    async fn list_member_ranks(&self, definition_id: Uuid) -> Result<Vec<MemberRank>>;

    async fn find_match(&self, match_id: Uuid) -> Result<MatchRecord>;

    /// Newest first.
    async fn list_matches(&self, definition_id: Uuid) -> Result<Vec<MatchRecord>>;

    async fn find_entry(&self, entry_id: Uuid) -> Result<RankStatEntry>;

    async fn entries_for_match(&self, match_id: Uuid) -> Result<Vec<RankStatEntry>>;

    /// Oldest first.
    async fn member_entries(&self, definition_id: Uuid, user_id: Uuid)
    -> Result<Vec<RankStatEntry>>;

    async fn commit(&self, batch: LedgerBatch) -> Result<CommittedBatch>;
}
