use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::definition::DefinitionRepository;
use super::ledger::{LedgerRepository, insert_entry};
use super::level::LevelRepository;
use super::match_record::{MatchRecordRepository, insert_match};
use super::member_rank::{MemberRankRepository, merge_stats};
use super::{CommittedBatch, LedgerBatch, RankingStore};
use crate::error::Result;
use crate::models::{
    MatchRecord, MemberRank, NewRankingDefinition, NewRankingLevel, RankStatEntry,
    RankingDefinition, RankingLevel,
};

/// [`RankingStore`] backed by PostgreSQL. Each commit is one transaction.
#[derive(Debug, Clone)]
pub struct PgRankingStore {
    pool: PgPool,
}

impl PgRankingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl RankingStore for PgRankingStore {
    async fn insert_definition(
        &self,
        definition: NewRankingDefinition,
        levels: Vec<NewRankingLevel>,
    ) -> Result<RankingDefinition> {
        DefinitionRepository::new(&self.pool)
            .create(&definition, &levels)
            .await
    }

    async fn find_definition(&self, definition_id: Uuid) -> Result<RankingDefinition> {
        DefinitionRepository::new(&self.pool)
            .find_by_id(definition_id)
            .await
    }

    async fn list_definitions(&self, organization_id: Uuid) -> Result<Vec<RankingDefinition>> {
        DefinitionRepository::new(&self.pool)
            .list_for_organization(organization_id)
            .await
    }

    async fn insert_level(&self, level: NewRankingLevel) -> Result<RankingLevel> {
        LevelRepository::new(&self.pool).create(&level).await
    }

    async fn list_levels(&self, definition_id: Uuid) -> Result<Vec<RankingLevel>> {
        LevelRepository::new(&self.pool)
            .list_for_definition(definition_id)
            .await
    }

    async fn set_member_level(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
        level_id: Option<Uuid>,
    ) -> Result<MemberRank> {
        MemberRankRepository::new(&self.pool)
            .set_level(definition_id, user_id, level_id)
            .await
    }

    async fn find_member_rank(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRank>> {
        MemberRankRepository::new(&self.pool)
            .find(definition_id, user_id)
            .await
    }

    async fn list_member_ranks(&self, definition_id: Uuid) -> Result<Vec<MemberRank>> {
        MemberRankRepository::new(&self.pool)
            .list_for_definition(definition_id)
            .await
    }

    async fn find_match(&self, match_id: Uuid) -> Result<MatchRecord> {
        MatchRecordRepository::new(&self.pool)
            .find_by_id(match_id)
            .await
    }

    async fn list_matches(&self, definition_id: Uuid) -> Result<Vec<MatchRecord>> {
        MatchRecordRepository::new(&self.pool)
            .list_for_definition(definition_id)
            .await
    }

    async fn find_entry(&self, entry_id: Uuid) -> Result<RankStatEntry> {
        LedgerRepository::new(&self.pool).find_by_id(entry_id).await
    }

    async fn entries_for_match(&self, match_id: Uuid) -> Result<Vec<RankStatEntry>> {
        LedgerRepository::new(&self.pool)
            .list_for_match(match_id)
            .await
    }

    async fn member_entries(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<RankStatEntry>> {
        LedgerRepository::new(&self.pool)
            .list_for_member(definition_id, user_id)
            .await
    }

    async fn commit(&self, batch: LedgerBatch) -> Result<CommittedBatch> {
        // Dropping `tx` on any early return rolls the whole batch back.
        let mut tx = self.pool.begin().await?;

        let match_record = match &batch.match_record {
            Some(record) => Some(insert_match(&mut tx, record).await?),
            None => None,
        };

        let mut entries = Vec::with_capacity(batch.entries.len());
        for entry in &batch.entries {
            entries.push(insert_entry(&mut tx, entry).await?);
        }

        let mut member_ranks = Vec::new();
        for ((definition_id, user_id), deltas) in batch.member_deltas() {
            member_ranks.push(merge_stats(&mut tx, definition_id, user_id, &deltas).await?);
        }

        tx.commit().await?;

        debug!(
            entries = entries.len(),
            members = member_ranks.len(),
            "Committed ledger batch"
        );

        Ok(CommittedBatch {
            match_record,
            entries,
            member_ranks,
        })
    }
}
