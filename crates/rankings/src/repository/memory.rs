//! In-process store. Every commit runs under one write lock, so readers see a
//! batch either entirely or not at all.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{CommittedBatch, LedgerBatch, RankingStore};
use crate::error::{RankingError, Result};
use crate::models::{
    EntryKind, MatchRecord, MemberRank, NewRankingDefinition, NewRankingLevel, RankStatEntry,
    RankingDefinition, RankingLevel,
};
use crate::services::aggregator::merge_checked;

#[derive(Debug, Default)]
struct MemoryState {
    definitions: HashMap<Uuid, RankingDefinition>,
    levels: HashMap<Uuid, RankingLevel>,
    member_ranks: HashMap<(Uuid, Uuid), MemberRank>,
    matches: Vec<MatchRecord>,
    entries: Vec<RankStatEntry>,
}

impl MemoryState {
    fn require_definition(&self, definition_id: Uuid) -> Result<()> {
        if self.definitions.contains_key(&definition_id) {
            Ok(())
        } else {
            Err(RankingError::NotFound)
        }
    }

    fn has_session_entry(&self, definition_id: Uuid, user_id: Uuid, session_id: Uuid) -> bool {
        self.entries.iter().any(|entry| {
            entry.is_session_guarded()
                && entry.definition_id == definition_id
                && entry.user_id == user_id
                && entry.session_id == Some(session_id)
        })
    }

    fn is_reversed(&self, entry_id: Uuid) -> bool {
        self.entries.iter().any(|entry| {
            entry.kind == EntryKind::Reversal && entry.correction_of_entry_id == Some(entry_id)
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryRankingStore {
    state: RwLock<MemoryState>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait::async_trait]
impl RankingStore for MemoryRankingStore {
    async fn insert_definition(
        &self,
        definition: NewRankingDefinition,
        levels: Vec<NewRankingLevel>,
    ) -> Result<RankingDefinition> {
        let mut state = self.state.write().await;

        let taken = state.definitions.values().any(|existing| {
            existing.organization_id == definition.organization_id
                && existing.activity_id == definition.activity_id
        });
        if taken {
            return Err(RankingError::ConstraintViolation(
                "Activity already has a ranking definition".to_string(),
            ));
        }

        let created_at = now();
        let record = RankingDefinition {
            definition_id: definition.definition_id,
            organization_id: definition.organization_id,
            activity_id: definition.activity_id,
            domain_id: definition.domain_id,
            created_at,
        };
        state.definitions.insert(record.definition_id, record.clone());

        for level in levels {
            state.levels.insert(
                level.level_id,
                RankingLevel {
                    level_id: level.level_id,
                    definition_id: level.definition_id,
                    name: level.name,
                    color: level.color,
                    level_order: level.level_order,
                    created_at,
                },
            );
        }

        Ok(record)
    }

    async fn find_definition(&self, definition_id: Uuid) -> Result<RankingDefinition> {
        let state = self.state.read().await;
        state
            .definitions
            .get(&definition_id)
            .cloned()
            .ok_or(RankingError::NotFound)
    }

    async fn list_definitions(&self, organization_id: Uuid) -> Result<Vec<RankingDefinition>> {
        let state = self.state.read().await;
        let mut definitions: Vec<_> = state
            .definitions
            .values()
            .filter(|definition| definition.organization_id == organization_id)
            .cloned()
            .collect();
        definitions.sort_by_key(|definition| (definition.created_at, definition.definition_id));
        Ok(definitions)
    }

    async fn insert_level(&self, level: NewRankingLevel) -> Result<RankingLevel> {
        let mut state = self.state.write().await;
        state.require_definition(level.definition_id)?;

        let taken = state.levels.values().any(|existing| {
            existing.definition_id == level.definition_id
                && existing.level_order == level.level_order
        });
        if taken {
            return Err(RankingError::ConstraintViolation(format!(
                "Level order {} already exists",
                level.level_order
            )));
        }

        let record = RankingLevel {
            level_id: level.level_id,
            definition_id: level.definition_id,
            name: level.name,
            color: level.color,
            level_order: level.level_order,
            created_at: now(),
        };
        state.levels.insert(record.level_id, record.clone());
        Ok(record)
    }

    async fn list_levels(&self, definition_id: Uuid) -> Result<Vec<RankingLevel>> {
        let state = self.state.read().await;
        let mut levels: Vec<_> = state
            .levels
            .values()
            .filter(|level| level.definition_id == definition_id)
            .cloned()
            .collect();
        levels.sort_by_key(|level| level.level_order);
        Ok(levels)
    }

    async fn set_member_level(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
        level_id: Option<Uuid>,
    ) -> Result<MemberRank> {
        let mut state = self.state.write().await;
        state.require_definition(definition_id)?;

        let rank = state
            .member_ranks
            .entry((definition_id, user_id))
            .or_insert_with(|| MemberRank::new(definition_id, user_id));
        rank.current_level_id = level_id;
        Ok(rank.clone())
    }

    async fn find_member_rank(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRank>> {
        let state = self.state.read().await;
        Ok(state.member_ranks.get(&(definition_id, user_id)).cloned())
    }

    async fn list_member_ranks(&self, definition_id: Uuid) -> Result<Vec<MemberRank>> {
        let state = self.state.read().await;
        Ok(state
            .member_ranks
            .values()
            .filter(|rank| rank.definition_id == definition_id)
            .cloned()
            .collect())
    }

    async fn find_match(&self, match_id: Uuid) -> Result<MatchRecord> {
        let state = self.state.read().await;
        state
            .matches
            .iter()
            .find(|record| record.match_id == match_id)
            .cloned()
            .ok_or(RankingError::NotFound)
    }

    async fn list_matches(&self, definition_id: Uuid) -> Result<Vec<MatchRecord>> {
        let state = self.state.read().await;
        Ok(state
            .matches
            .iter()
            .rev()
            .filter(|record| record.definition_id == definition_id)
            .cloned()
            .collect())
    }

    async fn find_entry(&self, entry_id: Uuid) -> Result<RankStatEntry> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|entry| entry.entry_id == entry_id)
            .cloned()
            .ok_or(RankingError::NotFound)
    }

    async fn entries_for_match(&self, match_id: Uuid) -> Result<Vec<RankStatEntry>> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .iter()
            .filter(|entry| entry.match_id == Some(match_id))
            .cloned()
            .collect())
    }

    async fn member_entries(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<RankStatEntry>> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .iter()
            .filter(|entry| entry.definition_id == definition_id && entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, batch: LedgerBatch) -> Result<CommittedBatch> {
        let mut state = self.state.write().await;

        // Every check runs before the first write, so a rejected batch
        // leaves no trace.
        if let Some(record) = &batch.match_record {
            state.require_definition(record.definition_id)?;
            if let Some(original) = record.correction_of_match_id {
                let corrected = state
                    .matches
                    .iter()
                    .any(|existing| existing.correction_of_match_id == Some(original));
                if corrected {
                    return Err(RankingError::AlreadyCorrected(original));
                }
            }
        }

        for (idx, entry) in batch.entries.iter().enumerate() {
            state.require_definition(entry.definition_id)?;
            let earlier = &batch.entries[..idx];

            if entry.is_session_guarded()
                && let Some(session_id) = entry.session_id
            {
                let in_batch = earlier.iter().any(|other| {
                    other.is_session_guarded()
                        && other.definition_id == entry.definition_id
                        && other.user_id == entry.user_id
                        && other.session_id == Some(session_id)
                });
                if in_batch
                    || state.has_session_entry(entry.definition_id, entry.user_id, session_id)
                {
                    debug!(user_id = %entry.user_id, session_id = %session_id, "Duplicate session entry");
                    return Err(RankingError::AlreadyRecorded {
                        user_id: entry.user_id,
                        session_id,
                    });
                }
            }

            if entry.kind == EntryKind::Reversal
                && let Some(original) = entry.correction_of_entry_id
            {
                let in_batch = earlier.iter().any(|other| {
                    other.kind == EntryKind::Reversal
                        && other.correction_of_entry_id == Some(original)
                });
                if in_batch || state.is_reversed(original) {
                    return Err(RankingError::AlreadyCorrected(original));
                }
            }
        }

        let mut touched = Vec::new();
        for ((definition_id, user_id), deltas) in batch.member_deltas() {
            let mut rank = state
                .member_ranks
                .get(&(definition_id, user_id))
                .cloned()
                .unwrap_or_else(|| MemberRank::new(definition_id, user_id));
            rank.stats = merge_checked(user_id, &rank.stats, &deltas)?;
            touched.push(rank);
        }

        let created_at = now();
        let match_record = batch.match_record.map(|record| {
            let record = record.into_record(created_at);
            state.matches.push(record.clone());
            record
        });

        let entries: Vec<RankStatEntry> = batch
            .entries
            .into_iter()
            .map(|entry| entry.into_entry(created_at))
            .collect();
        state.entries.extend(entries.iter().cloned());

        for rank in &mut touched {
            rank.last_activity_at = Some(created_at);
            state
                .member_ranks
                .insert((rank.definition_id, rank.user_id), rank.clone());
        }

        Ok(CommittedBatch {
            match_record,
            entries,
            member_ranks: touched,
        })
    }
}
