//! Stat aggregation and manual ledger entries.
//!
//! Member stats only ever change by adding an entry's deltas field-wise. The
//! storage layer calls [`merge_checked`] (or its SQL equivalent) inside the
//! commit so a batch that would push any stat below zero is rejected whole.

use tracing::{info, warn};
use uuid::Uuid;

use super::RankingEngine;
use crate::domains::DomainDescriptor;
use crate::dto::entry::{CorrectEntryRequest, StatEntryRequest};
use crate::error::{RankingError, Result};
use crate::models::{EntryKind, NewRankStatEntry, RankStatEntry, StatLine};
use crate::repository::LedgerBatch;

/// Adds `deltas` into `stats`. Fields missing on either side count as zero.
pub fn merge_checked(user_id: Uuid, stats: &StatLine, deltas: &StatLine) -> Result<StatLine> {
    let mut merged = stats.clone();
    for (field, delta) in deltas {
        let value = merged.entry(field.clone()).or_insert(0);
        *value = value
            .checked_add(*delta)
            .ok_or(RankingError::StatOverflow { user_id })?;
        if *value < 0 {
            return Err(RankingError::NegativeStat {
                user_id,
                field: field.clone(),
            });
        }
    }
    Ok(merged)
}

pub fn negate(deltas: &StatLine) -> StatLine {
    deltas
        .iter()
        .map(|(field, delta)| (field.clone(), delta.saturating_neg()))
        .collect()
}

/// Rejects fields the domain does not declare and fills in the rest with zero.
pub fn declared_deltas(descriptor: &DomainDescriptor, deltas: &StatLine) -> Result<StatLine> {
    let mut line = descriptor.empty_stats();
    for (field, delta) in deltas {
        match line.get_mut(field) {
            Some(value) => *value = *delta,
            None => {
                return Err(RankingError::UnknownStatField {
                    domain: descriptor.id.to_string(),
                    field: field.clone(),
                });
            }
        }
    }
    Ok(line)
}

/// Result of replacing a manual entry.
#[derive(Debug, Clone)]
pub struct EntryCorrection {
    pub reversal: RankStatEntry,
    pub reapplication: RankStatEntry,
}

impl RankingEngine {
    /// Applies a manual adjustment to one member.
    ///
    /// With a session set, a second entry for the same user and session fails
    /// with `AlreadyRecorded` and leaves stats untouched.
    pub async fn apply_manual_entry(
        &self,
        definition_id: Uuid,
        request: &StatEntryRequest,
    ) -> Result<RankStatEntry> {
        let (definition, descriptor) = self.load_definition(definition_id).await?;
        let deltas = declared_deltas(descriptor, &request.deltas)?;

        let entry = NewRankStatEntry {
            entry_id: Uuid::new_v4(),
            definition_id: definition.definition_id,
            user_id: request.user_id,
            session_id: request.session_id,
            match_id: None,
            kind: EntryKind::Apply,
            deltas,
            recorded_by: request.recorded_by,
            note: request.note.clone(),
            correction_of_entry_id: None,
        };

        let committed = self
            .store
            .commit(LedgerBatch::single(entry))
            .await
            .inspect_err(|e| {
                if e.is_conflict() {
                    warn!(%definition_id, user_id = %request.user_id, "Manual entry rejected: {}", e);
                }
            })?;

        let entry = committed
            .entries
            .into_iter()
            .next()
            .ok_or(RankingError::NotFound)?;

        info!(
            %definition_id,
            user_id = %entry.user_id,
            entry_id = %entry.entry_id,
            "Applied manual stat entry"
        );

        Ok(entry)
    }

    /// Reverses a manual entry and applies replacement deltas in one commit.
    ///
    /// Match entries are corrected through their match instead.
    pub async fn correct_entry(
        &self,
        entry_id: Uuid,
        request: &CorrectEntryRequest,
    ) -> Result<EntryCorrection> {
        let original = self.store.find_entry(entry_id).await?;

        if original.kind == EntryKind::Reversal {
            return Err(RankingError::ConstraintViolation(
                "Reversal entries cannot be corrected".to_string(),
            ));
        }
        if let Some(match_id) = original.match_id {
            return Err(RankingError::ConstraintViolation(format!(
                "Entry belongs to match {}; correct the match instead",
                match_id
            )));
        }

        let (_, descriptor) = self.load_definition(original.definition_id).await?;
        let deltas = declared_deltas(descriptor, &request.deltas)?;

        let reversal = NewRankStatEntry {
            entry_id: Uuid::new_v4(),
            definition_id: original.definition_id,
            user_id: original.user_id,
            session_id: original.session_id,
            match_id: None,
            kind: EntryKind::Reversal,
            deltas: negate(&original.deltas),
            recorded_by: request.recorded_by,
            note: request.note.clone(),
            correction_of_entry_id: Some(original.entry_id),
        };
        let reapplication = NewRankStatEntry {
            entry_id: Uuid::new_v4(),
            kind: EntryKind::Reapply,
            deltas,
            ..reversal.clone()
        };

        let committed = self
            .store
            .commit(LedgerBatch {
                match_record: None,
                entries: vec![reversal, reapplication],
            })
            .await?;

        let mut entries = committed.entries.into_iter();
        let (Some(reversal), Some(reapplication)) = (entries.next(), entries.next()) else {
            return Err(RankingError::NotFound);
        };

        info!(
            definition_id = %original.definition_id,
            user_id = %original.user_id,
            original_entry_id = %original.entry_id,
            "Corrected manual stat entry"
        );

        Ok(EntryCorrection {
            reversal,
            reapplication,
        })
    }

    /// A member's ledger, oldest first.
    pub async fn member_history(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<RankStatEntry>> {
        self.store.find_definition(definition_id).await?;
        self.store.member_entries(definition_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainRegistry;

    fn line(pairs: &[(&str, i64)]) -> StatLine {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_merge_adds_field_wise() {
        let merged = merge_checked(
            Uuid::new_v4(),
            &line(&[("wins", 2), ("losses", 1)]),
            &line(&[("wins", 1), ("draws", 1)]),
        )
        .unwrap();
        assert_eq!(merged, line(&[("wins", 3), ("losses", 1), ("draws", 1)]));
    }

    #[test]
    fn test_merge_rejects_negative_totals() {
        let user_id = Uuid::new_v4();
        let err = merge_checked(user_id, &line(&[("wins", 1)]), &line(&[("wins", -2)])).unwrap_err();
        match err {
            RankingError::NegativeStat { user_id: u, field } => {
                assert_eq!(u, user_id);
                assert_eq!(field, "wins");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_overflow_is_validation_error() {
        let user_id = Uuid::new_v4();
        let err = merge_checked(user_id, &line(&[("wins", i64::MAX)]), &line(&[("wins", 1)]))
            .unwrap_err();
        assert!(matches!(err, RankingError::StatOverflow { user_id: u } if u == user_id));
        assert!(err.is_validation());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_negation_reverses_merge() {
        let stats = line(&[("wins", 4), ("losses", 2)]);
        let deltas = line(&[("wins", 1), ("losses", 0)]);
        let user_id = Uuid::new_v4();

        let applied = merge_checked(user_id, &stats, &deltas).unwrap();
        let reverted = merge_checked(user_id, &applied, &negate(&deltas)).unwrap();
        assert_eq!(reverted, stats);
    }

    #[test]
    fn test_declared_deltas_pads_and_rejects_unknown() {
        let registry = DomainRegistry::new();
        let running = registry.get("running").unwrap();

        let padded = declared_deltas(running, &line(&[("distance_m", 5000)])).unwrap();
        assert_eq!(padded["distance_m"], 5000);
        assert_eq!(padded["sessions_attended"], 0);
        assert_eq!(padded.len(), running.stat_fields.len());

        let err = declared_deltas(running, &line(&[("goals_scored", 1)])).unwrap_err();
        assert!(err.is_configuration());
    }
}
