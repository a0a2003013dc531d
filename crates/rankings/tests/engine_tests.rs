use std::sync::Arc;

use rankings::dto::entry::{CorrectEntryRequest, StatEntryRequest};
use rankings::dto::matches::{CorrectMatchRequest, RecordMatchRequest};
use rankings::dto::ranking::CreateDefinitionRequest;
use rankings::models::{EntryKind, StatLine};
use rankings::{MemoryRankingStore, RankingEngine, RankingError};
use serde_json::{Value, json};
use uuid::Uuid;

fn engine() -> RankingEngine {
    RankingEngine::new(Arc::new(MemoryRankingStore::new()))
}

async fn definition(engine: &RankingEngine, domain: &str) -> Uuid {
    engine
        .create_definition(&CreateDefinitionRequest {
            organization_id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            domain_id: domain.to_string(),
            seed_default_levels: false,
        })
        .await
        .unwrap()
        .definition_id
}

fn players(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn match_request(
    session_id: Option<Uuid>,
    team1: &[Uuid],
    team2: &[Uuid],
    score: Value,
) -> RecordMatchRequest {
    RecordMatchRequest {
        session_id,
        format: None,
        team1: team1.to_vec(),
        team2: team2.to_vec(),
        score,
        recorded_by: Uuid::new_v4(),
        note: None,
    }
}

fn deltas(pairs: &[(&str, i64)]) -> StatLine {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

async fn stat(engine: &RankingEngine, definition_id: Uuid, user_id: Uuid, field: &str) -> i64 {
    engine
        .member_rank(definition_id, user_id)
        .await
        .unwrap()
        .stat(field)
}

#[tokio::test]
async fn test_goal_match_updates_both_teams() {
    let engine = engine();
    let definition_id = definition(&engine, "football").await;
    let (team1, team2) = (players(5), players(5));

    let recorded = engine
        .record_match(
            definition_id,
            &match_request(Some(Uuid::new_v4()), &team1, &team2, json!({"team1": 3, "team2": 1})),
        )
        .await
        .unwrap();

    assert_eq!(recorded.match_record.winner.as_str(), "team1");
    assert_eq!(recorded.match_record.format, "5v5");
    assert_eq!(recorded.entries.len(), 10);

    assert_eq!(stat(&engine, definition_id, team1[0], "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, team1[0], "goals_scored").await, 3);
    assert_eq!(stat(&engine, definition_id, team2[2], "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, team2[2], "goals_conceded").await, 3);

    let rank = engine.member_rank(definition_id, team1[0]).await.unwrap();
    assert!(rank.last_activity_at.is_some());
}

#[tokio::test]
async fn test_duplicate_session_is_a_conflict() {
    let engine = engine();
    let definition_id = definition(&engine, "football").await;
    let (team1, team2) = (players(5), players(5));
    let request = match_request(
        Some(Uuid::new_v4()),
        &team1,
        &team2,
        json!({"team1": 2, "team2": 2}),
    );

    engine.record_match(definition_id, &request).await.unwrap();
    let before = engine.leaderboard(definition_id).await.unwrap();

    let err = engine.record_match(definition_id, &request).await.unwrap_err();
    assert!(matches!(err, RankingError::AlreadyRecorded { .. }));
    assert!(err.is_conflict());
    assert!(!err.is_validation());

    let after = engine.leaderboard(definition_id).await.unwrap();
    let stats = |board: &rankings::services::Leaderboard| {
        board
            .rows
            .iter()
            .map(|row| (row.member.user_id, row.member.stats.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(stats(&before), stats(&after));

    assert_eq!(engine.list_matches(definition_id).await.unwrap().len(), 1);
    let history = engine.member_history(definition_id, team1[0]).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_submissions_apply_once() {
    let engine = engine();
    let definition_id = definition(&engine, "chess").await;
    let (white, black) = (Uuid::new_v4(), Uuid::new_v4());
    let request = match_request(
        Some(Uuid::new_v4()),
        &[white],
        &[black],
        json!({"result": "1-0"}),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let request = request.clone();
            tokio::spawn(async move { engine.record_match(definition_id, &request).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(stat(&engine, definition_id, white, "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, black, "matches_played").await, 1);
}

#[tokio::test]
async fn test_concurrent_matches_for_same_member_all_count() {
    let engine = engine();
    let definition_id = definition(&engine, "chess").await;
    let regular = Uuid::new_v4();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let engine = engine.clone();
            let request = match_request(
                Some(Uuid::new_v4()),
                &[regular],
                &[Uuid::new_v4()],
                json!({"result": "1/2-1/2"}),
            );
            tokio::spawn(async move { engine.record_match(definition_id, &request).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(stat(&engine, definition_id, regular, "matches_played").await, 20);
    assert_eq!(stat(&engine, definition_id, regular, "draws").await, 20);
}

#[tokio::test]
async fn test_invalid_score_persists_nothing() {
    let engine = engine();
    let definition_id = definition(&engine, "tennis").await;

    let err = engine
        .record_match(
            definition_id,
            &match_request(
                None,
                &players(1),
                &players(1),
                json!({"sets": [[6, 2], [7, 7]]}),
            ),
        )
        .await
        .unwrap_err();

    match &err {
        RankingError::InvalidScore { reason } => assert!(reason.contains("set 2")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(engine.list_matches(definition_id).await.unwrap().is_empty());
    assert!(engine.leaderboard(definition_id).await.unwrap().rows.is_empty());
}

#[tokio::test]
async fn test_configuration_errors() {
    let engine = engine();

    let err = engine
        .create_definition(&CreateDefinitionRequest {
            organization_id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            domain_id: "curling".to_string(),
            seed_default_levels: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::UnknownDomain(_)));

    let running = definition(&engine, "running").await;
    let err = engine
        .record_match(
            running,
            &match_request(None, &players(1), &players(1), json!({})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::MatchModeDisabled(_)));

    let padel = definition(&engine, "padel").await;
    let err = engine
        .record_match(
            padel,
            &match_request(None, &players(2), &players(3), json!({"sets": [[6, 0], [6, 0]]})),
        )
        .await
        .unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_correct_match_reverses_and_reapplies() {
    let engine = engine();
    let definition_id = definition(&engine, "football").await;
    let (team1, team2) = (players(5), players(5));

    let original = engine
        .record_match(
            definition_id,
            &match_request(Some(Uuid::new_v4()), &team1, &team2, json!({"team1": 3, "team2": 1})),
        )
        .await
        .unwrap();

    let correction = CorrectMatchRequest {
        format: None,
        team1: team1.clone(),
        team2: team2.clone(),
        score: json!({"team1": 1, "team2": 2}),
        recorded_by: Uuid::new_v4(),
        note: Some("score was swapped".to_string()),
    };
    let corrected = engine
        .correct_match(definition_id, original.match_record.match_id, &correction)
        .await
        .unwrap();

    assert_eq!(corrected.reversals.len(), 10);
    assert_eq!(corrected.reapplications.len(), 10);
    assert_eq!(
        corrected.match_record.correction_of_match_id,
        Some(original.match_record.match_id)
    );
    assert!(
        corrected
            .reversals
            .iter()
            .all(|entry| entry.kind == EntryKind::Reversal)
    );

    assert_eq!(stat(&engine, definition_id, team1[0], "wins").await, 0);
    assert_eq!(stat(&engine, definition_id, team1[0], "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, team1[0], "goals_scored").await, 1);
    assert_eq!(stat(&engine, definition_id, team2[0], "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, team2[0], "matches_played").await, 1);

    // History is kept: the original record still reads as it was.
    let kept = engine
        .get_match(definition_id, original.match_record.match_id)
        .await
        .unwrap();
    assert_eq!(kept, original.match_record);
    assert_eq!(engine.list_matches(definition_id).await.unwrap().len(), 2);
    assert_eq!(
        engine
            .member_history(definition_id, team1[0])
            .await
            .unwrap()
            .len(),
        3
    );

    let err = engine
        .correct_match(definition_id, original.match_record.match_id, &correction)
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::AlreadyCorrected(_)));
}

#[tokio::test]
async fn test_correction_can_change_roster() {
    let engine = engine();
    let definition_id = definition(&engine, "tennis").await;
    let (wrong, right, opponent) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let original = engine
        .record_match(
            definition_id,
            &match_request(None, &[wrong], &[opponent], json!({"sets": [[6, 4], [6, 4]]})),
        )
        .await
        .unwrap();

    engine
        .correct_match(
            definition_id,
            original.match_record.match_id,
            &CorrectMatchRequest {
                format: Some("singles".to_string()),
                team1: vec![right],
                team2: vec![opponent],
                score: json!({"sets": [[6, 4], [6, 4]]}),
                recorded_by: Uuid::new_v4(),
                note: None,
            },
        )
        .await
        .unwrap();

    let wrong_rank = engine.member_rank(definition_id, wrong).await.unwrap();
    assert!(wrong_rank.stats.values().all(|value| *value == 0));
    assert_eq!(stat(&engine, definition_id, right, "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, right, "games_won").await, 12);
    assert_eq!(stat(&engine, definition_id, opponent, "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, opponent, "matches_played").await, 1);
}

fn singles_correction(team1: Uuid, team2: Uuid, score: Value) -> CorrectMatchRequest {
    CorrectMatchRequest {
        format: Some("singles".to_string()),
        team1: vec![team1],
        team2: vec![team2],
        score,
        recorded_by: Uuid::new_v4(),
        note: None,
    }
}

#[tokio::test]
async fn test_session_correction_swaps_player_and_back() {
    let engine = engine();
    let definition_id = definition(&engine, "tennis").await;
    let session_id = Uuid::new_v4();
    let (first, second, opponent) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let score = json!({"sets": [[6, 4], [6, 4]]});

    let original = engine
        .record_match(
            definition_id,
            &match_request(Some(session_id), &[first], &[opponent], score.clone()),
        )
        .await
        .unwrap();

    let swapped = engine
        .correct_match(
            definition_id,
            original.match_record.match_id,
            &singles_correction(second, opponent, score.clone()),
        )
        .await
        .unwrap();
    assert_eq!(swapped.match_record.session_id, Some(session_id));
    assert!(
        swapped
            .reapplications
            .iter()
            .all(|entry| entry.kind == EntryKind::Reapply && entry.session_id == Some(session_id))
    );

    let first_rank = engine.member_rank(definition_id, first).await.unwrap();
    assert!(first_rank.stats.values().all(|value| *value == 0));
    assert_eq!(stat(&engine, definition_id, second, "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, opponent, "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, opponent, "matches_played").await, 1);

    // `first` already has a reversed entry in this session
    let restored = engine
        .correct_match(
            definition_id,
            swapped.match_record.match_id,
            &singles_correction(first, opponent, score.clone()),
        )
        .await
        .unwrap();
    assert_eq!(restored.reversals.len(), 2);
    assert_eq!(restored.reapplications.len(), 2);

    let second_rank = engine.member_rank(definition_id, second).await.unwrap();
    assert!(second_rank.stats.values().all(|value| *value == 0));
    assert_eq!(stat(&engine, definition_id, first, "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, opponent, "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, opponent, "matches_played").await, 1);

    // Equal to recording the final result once in a fresh ranking.
    let fresh = definition(&engine, "tennis").await;
    engine
        .record_match(fresh, &match_request(Some(session_id), &[first], &[opponent], score.clone()))
        .await
        .unwrap();
    for user_id in [first, opponent] {
        assert_eq!(
            engine.member_rank(definition_id, user_id).await.unwrap().stats,
            engine.member_rank(fresh, user_id).await.unwrap().stats
        );
    }

    // The session guard still holds for new submissions.
    let err = engine
        .record_match(
            definition_id,
            &match_request(Some(session_id), &[first], &[Uuid::new_v4()], score),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::AlreadyRecorded { .. }));
}

#[tokio::test]
async fn test_session_correction_can_flip_result_twice() {
    let engine = engine();
    let definition_id = definition(&engine, "padel").await;
    let session_id = Uuid::new_v4();
    let (team1, team2) = (players(2), players(2));

    let original = engine
        .record_match(
            definition_id,
            &match_request(Some(session_id), &team1, &team2, json!({"sets": [[6, 4], [6, 3]]})),
        )
        .await
        .unwrap();

    let mut correction = CorrectMatchRequest {
        format: None,
        team1: team1.clone(),
        team2: team2.clone(),
        score: json!({"sets": [[4, 6], [3, 6]]}),
        recorded_by: Uuid::new_v4(),
        note: None,
    };
    let flipped = engine
        .correct_match(definition_id, original.match_record.match_id, &correction)
        .await
        .unwrap();

    correction.score = json!({"sets": [[6, 4], [4, 6], [6, 2]]});
    engine
        .correct_match(definition_id, flipped.match_record.match_id, &correction)
        .await
        .unwrap();

    assert_eq!(stat(&engine, definition_id, team1[1], "wins").await, 1);
    assert_eq!(stat(&engine, definition_id, team1[1], "sets_won").await, 2);
    assert_eq!(stat(&engine, definition_id, team2[0], "losses").await, 1);
    assert_eq!(stat(&engine, definition_id, team2[0], "wins").await, 0);
    assert_eq!(stat(&engine, definition_id, team2[0], "games_won").await, 12);
    assert_eq!(stat(&engine, definition_id, team2[0], "matches_played").await, 1);
}

#[tokio::test]
async fn test_correcting_match_of_other_definition_is_not_found() {
    let engine = engine();
    let first = definition(&engine, "chess").await;
    let second = definition(&engine, "chess").await;

    let recorded = engine
        .record_match(
            first,
            &match_request(None, &players(1), &players(1), json!({"result": "0-1"})),
        )
        .await
        .unwrap();

    let err = engine
        .correct_match(
            second,
            recorded.match_record.match_id,
            &CorrectMatchRequest {
                format: None,
                team1: recorded.match_record.team1.clone(),
                team2: recorded.match_record.team2.clone(),
                score: json!({"result": "1-0"}),
                recorded_by: Uuid::new_v4(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = engine
        .correct_match(
            first,
            Uuid::new_v4(),
            &CorrectMatchRequest {
                format: None,
                team1: players(1),
                team2: players(1),
                score: json!({"result": "1-0"}),
                recorded_by: Uuid::new_v4(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_manual_entries_and_corrections() {
    let engine = engine();
    let definition_id = definition(&engine, "running").await;
    let runner = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    let entry_request = |session_id: Option<Uuid>, line: StatLine| StatEntryRequest {
        user_id: runner,
        session_id,
        deltas: line,
        recorded_by: Uuid::new_v4(),
        note: None,
    };

    let entry = engine
        .apply_manual_entry(
            definition_id,
            &entry_request(
                Some(session_id),
                deltas(&[("sessions_attended", 1), ("distance_m", 5000)]),
            ),
        )
        .await
        .unwrap();

    let err = engine
        .apply_manual_entry(
            definition_id,
            &entry_request(Some(session_id), deltas(&[("sessions_attended", 1)])),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::AlreadyRecorded { .. }));

    // Entries without a session are never deduplicated.
    for _ in 0..2 {
        engine
            .apply_manual_entry(definition_id, &entry_request(None, deltas(&[("elevation_m", 40)])))
            .await
            .unwrap();
    }
    assert_eq!(stat(&engine, definition_id, runner, "elevation_m").await, 80);

    let correction = engine
        .correct_entry(
            entry.entry_id,
            &CorrectEntryRequest {
                deltas: deltas(&[("sessions_attended", 1), ("distance_m", 10000)]),
                recorded_by: Uuid::new_v4(),
                note: Some("distance was halved".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(correction.reversal.correction_of_entry_id, Some(entry.entry_id));
    assert_eq!(correction.reapplication.session_id, Some(session_id));
    assert_eq!(stat(&engine, definition_id, runner, "distance_m").await, 10000);
    assert_eq!(stat(&engine, definition_id, runner, "sessions_attended").await, 1);

    let err = engine
        .correct_entry(
            entry.entry_id,
            &CorrectEntryRequest {
                deltas: deltas(&[("distance_m", 1)]),
                recorded_by: Uuid::new_v4(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::AlreadyCorrected(_)));
    assert_eq!(stat(&engine, definition_id, runner, "distance_m").await, 10000);
}

#[tokio::test]
async fn test_manual_entry_rejects_negative_totals_and_unknown_fields() {
    let engine = engine();
    let definition_id = definition(&engine, "running").await;
    let runner = Uuid::new_v4();

    let request = |line: StatLine| StatEntryRequest {
        user_id: runner,
        session_id: None,
        deltas: line,
        recorded_by: Uuid::new_v4(),
        note: None,
    };

    let err = engine
        .apply_manual_entry(definition_id, &request(deltas(&[("distance_m", -10)])))
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::NegativeStat { .. }));
    assert!(
        engine
            .member_history(definition_id, runner)
            .await
            .unwrap()
            .is_empty()
    );

    let err = engine
        .apply_manual_entry(definition_id, &request(deltas(&[("wins", 1)])))
        .await
        .unwrap_err();
    assert!(matches!(err, RankingError::UnknownStatField { .. }));
}

#[tokio::test]
async fn test_match_entries_cannot_be_corrected_individually() {
    let engine = engine();
    let definition_id = definition(&engine, "chess").await;

    let recorded = engine
        .record_match(
            definition_id,
            &match_request(None, &players(1), &players(1), json!({"result": "1-0"})),
        )
        .await
        .unwrap();

    let err = engine
        .correct_entry(
            recorded.entries[0].entry_id,
            &CorrectEntryRequest {
                deltas: deltas(&[("wins", 0)]),
                recorded_by: Uuid::new_v4(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_definitions_levels_and_leaderboard() {
    let engine = engine();
    let organization_id = Uuid::new_v4();
    let activity_id = Uuid::new_v4();
    let request = CreateDefinitionRequest {
        organization_id,
        activity_id,
        domain_id: "padel".to_string(),
        seed_default_levels: true,
    };

    let definition = engine.create_definition(&request).await.unwrap();
    let err = engine.create_definition(&request).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        engine.list_definitions(organization_id).await.unwrap(),
        vec![definition.clone()]
    );

    let levels = engine.list_levels(definition.definition_id).await.unwrap();
    let padel = engine.get_domain("padel").unwrap();
    assert_eq!(levels.len(), padel.default_levels.len());
    assert!(levels.windows(2).all(|w| w[0].level_order < w[1].level_order));

    let (a, b) = (players(2), players(2));
    engine
        .record_match(
            definition.definition_id,
            &match_request(None, &a, &b, json!({"sets": [[6, 3], [4, 6], [7, 6]]})),
        )
        .await
        .unwrap();

    let top = levels.last().unwrap();
    engine
        .assign_level(definition.definition_id, b[0], Some(top.level_id))
        .await
        .unwrap();

    let other = definition_in_other_org(&engine).await;
    let foreign_level = engine.list_levels(other).await.unwrap()[0].level_id;
    let err = engine
        .assign_level(definition.definition_id, b[0], Some(foreign_level))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let board = engine.leaderboard(definition.definition_id).await.unwrap();
    assert_eq!(board.rows.len(), 4);
    let positions: Vec<u32> = board.rows.iter().map(|row| row.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert!(board.rows[..2].iter().all(|row| a.contains(&row.member.user_id)));
    assert!(board.rows[0].member.user_id < board.rows[1].member.user_id);

    let leveled = board
        .rows
        .iter()
        .find(|row| row.member.user_id == b[0])
        .unwrap();
    assert_eq!(leveled.level.as_ref().map(|l| l.level_id), Some(top.level_id));
    assert_eq!(leveled.member.stat("wins"), 0);
}

async fn definition_in_other_org(engine: &RankingEngine) -> Uuid {
    engine
        .create_definition(&CreateDefinitionRequest {
            organization_id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            domain_id: "padel".to_string(),
            seed_default_levels: true,
        })
        .await
        .unwrap()
        .definition_id
}
