//! Match recording and correction.
//!
//! Input is validated and resolved entirely in memory before anything touches
//! storage. The resulting match record and its ledger entries are committed as
//! one batch, so a rejected score or a duplicate session never leaves a
//! partial match behind.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::RankingEngine;
use crate::domains::{DomainDescriptor, MatchFormat, MatchResolver, ScoreValidator, Winner};
use crate::dto::matches::{CorrectMatchRequest, RecordMatchRequest};
use crate::error::{RankingError, Result};
use crate::models::{
    EntryKind, MatchRecord, NewMatchRecord, NewRankStatEntry, RankStatEntry, StatLine,
    StatSnapshot,
};
use crate::repository::LedgerBatch;

use super::aggregator::negate;

#[derive(Debug, Clone)]
pub struct RecordedMatch {
    pub match_record: MatchRecord,
    pub entries: Vec<RankStatEntry>,
}

#[derive(Debug, Clone)]
pub struct MatchCorrection {
    pub original_match_id: Uuid,
    pub match_record: MatchRecord,
    pub reversals: Vec<RankStatEntry>,
    pub reapplications: Vec<RankStatEntry>,
}

/// A validated score, resolved into per-player contributions.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
    pub format: &'static MatchFormat,
    pub winner: Winner,
    pub snapshot: StatSnapshot,
}

/// Checks format, rosters and score, then resolves the score.
///
/// Pure: never touches storage, so it is safe to call before any write.
pub fn resolve_match(
    descriptor: &DomainDescriptor,
    format: Option<&str>,
    team1: &[Uuid],
    team2: &[Uuid],
    score: &Value,
) -> Result<ResolvedMatch> {
    let config = descriptor
        .match_config
        .ok_or_else(|| RankingError::MatchModeDisabled(descriptor.id.to_string()))?;

    let format_id = format.unwrap_or(config.default_format);
    let format = config
        .format(format_id)
        .ok_or_else(|| RankingError::UnsupportedFormat {
            domain: descriptor.id.to_string(),
            format: format_id.to_string(),
        })?;

    validate_teams(format, team1, team2)?;

    config.scorer.validate(score).map_err(|reason| {
        debug!(domain = descriptor.id, %reason, "Score rejected");
        RankingError::invalid_score(reason)
    })?;

    let outcome = config.scorer.resolve(score);
    let team1_line = declared_line(descriptor, &outcome.team1);
    let team2_line = declared_line(descriptor, &outcome.team2);

    let mut snapshot = StatSnapshot::new();
    for user_id in team1 {
        snapshot.insert(*user_id, team1_line.clone());
    }
    for user_id in team2 {
        snapshot.insert(*user_id, team2_line.clone());
    }

    Ok(ResolvedMatch {
        format,
        winner: outcome.winner,
        snapshot,
    })
}

/// Exactly the domain's declared fields, missing ones at zero.
fn declared_line(descriptor: &DomainDescriptor, contribution: &StatLine) -> StatLine {
    let mut line = descriptor.empty_stats();
    for (field, value) in line.iter_mut() {
        *value = contribution.get(field).copied().unwrap_or(0);
    }
    line
}

fn validate_teams(format: &MatchFormat, team1: &[Uuid], team2: &[Uuid]) -> Result<()> {
    for (name, team) in [("team1", team1), ("team2", team2)] {
        if team.is_empty() {
            return Err(RankingError::InvalidTeams(format!("{} has no players", name)));
        }
        if !format.team_size.allows(team.len()) {
            return Err(RankingError::TeamSize {
                format: format.id.to_string(),
                size: team.len(),
            });
        }
    }

    let mut seen = HashSet::new();
    for user_id in team1.iter().chain(team2) {
        if !seen.insert(user_id) {
            return Err(RankingError::InvalidTeams(format!(
                "player {} appears more than once",
                user_id
            )));
        }
    }

    Ok(())
}

impl RankingEngine {
    /// Records a match and applies every participant's stats atomically.
    pub async fn record_match(
        &self,
        definition_id: Uuid,
        request: &RecordMatchRequest,
    ) -> Result<RecordedMatch> {
        let (definition, descriptor) = self.load_definition(definition_id).await?;
        let resolved = resolve_match(
            descriptor,
            request.format.as_deref(),
            &request.team1,
            &request.team2,
            &request.score,
        )?;

        let match_id = Uuid::new_v4();
        let entries = participant_entries(
            definition.definition_id,
            match_id,
            request.session_id,
            &resolved.snapshot,
            request.recorded_by,
            request.note.as_deref(),
            EntryKind::Apply,
            |_| None,
        );

        let batch = LedgerBatch {
            match_record: Some(NewMatchRecord {
                match_id,
                definition_id: definition.definition_id,
                session_id: request.session_id,
                format: resolved.format.id.to_string(),
                team1: request.team1.clone(),
                team2: request.team2.clone(),
                score: request.score.clone(),
                winner: resolved.winner,
                stats_snapshot: resolved.snapshot,
                recorded_by: request.recorded_by,
                note: request.note.clone(),
                correction_of_match_id: None,
            }),
            entries,
        };

        let committed = self.store.commit(batch).await.inspect_err(|e| {
            if e.is_conflict() {
                warn!(%definition_id, session_id = ?request.session_id, "Match rejected: {}", e);
            }
        })?;
        let match_record = committed.match_record.ok_or(RankingError::NotFound)?;

        info!(
            %definition_id,
            match_id = %match_record.match_id,
            winner = %match_record.winner,
            players = committed.entries.len(),
            "Recorded match"
        );

        Ok(RecordedMatch {
            match_record,
            entries: committed.entries,
        })
    }

    /// Replaces a recorded match with corrected values.
    ///
    /// Reverses every entry the original produced and applies the corrected
    /// result in the same commit. The original record and entries stay as they
    /// are; a match can be corrected once.
    pub async fn correct_match(
        &self,
        definition_id: Uuid,
        match_id: Uuid,
        request: &CorrectMatchRequest,
    ) -> Result<MatchCorrection> {
        let (definition, descriptor) = self.load_definition(definition_id).await?;
        let original = self.get_match(definition_id, match_id).await?;

        let resolved = resolve_match(
            descriptor,
            request.format.as_deref(),
            &request.team1,
            &request.team2,
            &request.score,
        )?;

        let original_entries: Vec<RankStatEntry> = self
            .store
            .entries_for_match(original.match_id)
            .await?
            .into_iter()
            .filter(|entry| entry.kind != EntryKind::Reversal)
            .collect();

        let correction_id = Uuid::new_v4();
        let mut entries: Vec<NewRankStatEntry> = original_entries
            .iter()
            .map(|entry| NewRankStatEntry {
                entry_id: Uuid::new_v4(),
                definition_id: definition.definition_id,
                user_id: entry.user_id,
                session_id: entry.session_id,
                match_id: Some(correction_id),
                kind: EntryKind::Reversal,
                deltas: negate(&entry.deltas),
                recorded_by: request.recorded_by,
                note: request.note.clone(),
                correction_of_entry_id: Some(entry.entry_id),
            })
            .collect();
        let reversal_count = entries.len();

        entries.extend(participant_entries(
            definition.definition_id,
            correction_id,
            original.session_id,
            &resolved.snapshot,
            request.recorded_by,
            request.note.as_deref(),
            EntryKind::Reapply,
            |user_id| {
                original_entries
                    .iter()
                    .find(|entry| entry.user_id == user_id)
                    .map(|entry| entry.entry_id)
            },
        ));

        let batch = LedgerBatch {
            match_record: Some(NewMatchRecord {
                match_id: correction_id,
                definition_id: definition.definition_id,
                session_id: original.session_id,
                format: resolved.format.id.to_string(),
                team1: request.team1.clone(),
                team2: request.team2.clone(),
                score: request.score.clone(),
                winner: resolved.winner,
                stats_snapshot: resolved.snapshot,
                recorded_by: request.recorded_by,
                note: request.note.clone(),
                correction_of_match_id: Some(original.match_id),
            }),
            entries,
        };

        let committed = self.store.commit(batch).await.inspect_err(|e| {
            if e.is_conflict() {
                warn!(%definition_id, %match_id, "Match correction rejected: {}", e);
            }
        })?;
        let match_record = committed.match_record.ok_or(RankingError::NotFound)?;

        let mut reversals = committed.entries;
        let reapplications = reversals.split_off(reversal_count.min(reversals.len()));

        info!(
            %definition_id,
            original_match_id = %original.match_id,
            match_id = %match_record.match_id,
            winner = %match_record.winner,
            "Corrected match"
        );

        Ok(MatchCorrection {
            original_match_id: original.match_id,
            match_record,
            reversals,
            reapplications,
        })
    }

    /// Fails with `NotFound` when the match belongs to another definition.
    pub async fn get_match(&self, definition_id: Uuid, match_id: Uuid) -> Result<MatchRecord> {
        let record = self.store.find_match(match_id).await?;
        if record.definition_id != definition_id {
            return Err(RankingError::NotFound);
        }
        Ok(record)
    }

    /// Newest first, corrections included.
    pub async fn list_matches(&self, definition_id: Uuid) -> Result<Vec<MatchRecord>> {
        self.store.find_definition(definition_id).await?;
        self.store.list_matches(definition_id).await
    }
}

fn participant_entries(
    definition_id: Uuid,
    match_id: Uuid,
    session_id: Option<Uuid>,
    snapshot: &StatSnapshot,
    recorded_by: Uuid,
    note: Option<&str>,
    kind: EntryKind,
    corrects: impl Fn(Uuid) -> Option<Uuid>,
) -> Vec<NewRankStatEntry> {
    snapshot
        .iter()
        .map(|(user_id, deltas)| NewRankStatEntry {
            entry_id: Uuid::new_v4(),
            definition_id,
            user_id: *user_id,
            session_id,
            match_id: Some(match_id),
            kind,
            deltas: deltas.clone(),
            recorded_by,
            note: note.map(str::to_string),
            correction_of_entry_id: corrects(*user_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domains::{DomainRegistry, DRAWS, LOSSES, WINS};

    fn players(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_goal_match_resolves_snapshot() {
        let registry = DomainRegistry::new();
        let football = registry.get("football").unwrap();
        let (team1, team2) = (players(5), players(5));

        let resolved = resolve_match(
            football,
            None,
            &team1,
            &team2,
            &json!({"team1": 3, "team2": 1}),
        )
        .unwrap();

        assert_eq!(resolved.format.id, "5v5");
        assert_eq!(resolved.winner, Winner::Team1);
        assert_eq!(resolved.snapshot.len(), 10);
        let winner = &resolved.snapshot[&team1[0]];
        assert_eq!(winner[WINS], 1);
        assert_eq!(winner["goals_scored"], 3);
        let loser = &resolved.snapshot[&team2[4]];
        assert_eq!(loser[LOSSES], 1);
        assert_eq!(loser[DRAWS], 0);
        assert_eq!(loser.len(), football.stat_fields.len());
    }

    #[test]
    fn test_team_size_is_checked_per_team() {
        let registry = DomainRegistry::new();
        let padel = registry.get("padel").unwrap();
        let score = json!({"sets": [[6, 4], [6, 4]]});

        let err = resolve_match(padel, None, &players(3), &players(1), &score).unwrap_err();
        assert!(matches!(err, RankingError::TeamSize { size: 3, .. }));
    }

    #[test]
    fn test_shared_player_is_rejected() {
        let registry = DomainRegistry::new();
        let tennis = registry.get("tennis").unwrap();
        let shared = Uuid::new_v4();

        let err = resolve_match(
            tennis,
            Some("singles"),
            &[shared],
            &[shared],
            &json!({"sets": [[6, 4], [6, 4]]}),
        )
        .unwrap_err();
        assert!(matches!(err, RankingError::InvalidTeams(_)));
    }

    #[test]
    fn test_configuration_errors_precede_score_checks() {
        let registry = DomainRegistry::new();
        let running = registry.get("running").unwrap();
        let err = resolve_match(running, None, &players(1), &players(1), &json!({})).unwrap_err();
        assert!(matches!(err, RankingError::MatchModeDisabled(_)));

        let tennis = registry.get("tennis").unwrap();
        let err = resolve_match(tennis, Some("mixed"), &players(1), &players(1), &json!({}))
            .unwrap_err();
        assert!(matches!(err, RankingError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_invalid_score_is_a_validation_error() {
        let registry = DomainRegistry::new();
        let tennis = registry.get("tennis").unwrap();
        let err = resolve_match(
            tennis,
            None,
            &players(1),
            &players(1),
            &json!({"sets": [[6, 2], [7, 7]]}),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
