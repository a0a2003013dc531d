use proptest::prelude::*;
use rankings::DomainRegistry;
use rankings::domains::{DomainDescriptor, ScoreValidator, Winner};
use rankings::models::{MemberRank, StatLine};
use rankings::services::aggregator::{merge_checked, negate};
use rankings::services::leaderboard::{compare_members, sort_members};
use rankings::services::matches::resolve_match;
use serde_json::{Value, json};
use std::cmp::Ordering;
use uuid::Uuid;

fn domain(id: &str) -> &'static DomainDescriptor {
    DomainRegistry::new().get(id).unwrap()
}

fn bucket_count(line: &StatLine) -> i64 {
    ["wins", "losses", "draws"]
        .iter()
        .map(|field| line.get(*field).copied().unwrap_or(0))
        .sum()
}

/// Resolves through the engine path with one player per side.
fn resolve_singles(descriptor: &DomainDescriptor, format: &str, score: &Value) -> (Winner, StatLine, StatLine) {
    let (a, b) = (Uuid::from_u128(1), Uuid::from_u128(2));
    let resolved = resolve_match(descriptor, Some(format), &[a], &[b], score).unwrap();
    (
        resolved.winner,
        resolved.snapshot[&a].clone(),
        resolved.snapshot[&b].clone(),
    )
}

fn oriented(pair: (u32, u32), flip: bool) -> [u32; 2] {
    if flip { [pair.1, pair.0] } else { [pair.0, pair.1] }
}

fn tennis_set() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        (0u32..=4).prop_map(|loser| (6, loser)),
        Just((7, 5)),
        Just((7, 6)),
    ]
}

fn table_tennis_game() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        (0u32..=9).prop_map(|loser| (11, loser)),
        (10u32..30).prop_map(|loser| (loser + 2, loser)),
    ]
}

fn badminton_game() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        (0u32..=19).prop_map(|loser| (21, loser)),
        (20u32..=28).prop_map(|loser| (loser + 2, loser)),
        Just((30, 29)),
    ]
}

fn majority(parts: &[[u32; 2]]) -> (u32, u32) {
    parts.iter().fold((0, 0), |(t1, t2), part| {
        if part[0] > part[1] { (t1 + 1, t2) } else { (t1, t2 + 1) }
    })
}

/// Drops whatever was played after one side reached a majority of `max`.
fn until_decided(mut parts: Vec<[u32; 2]>, max: usize) -> Vec<[u32; 2]> {
    let needed = (max / 2 + 1) as u32;
    let mut won = (0, 0);
    let played = parts
        .iter()
        .take_while(|part| {
            let open = won.0 < needed && won.1 < needed;
            won = if part[0] > part[1] { (won.0 + 1, won.1) } else { (won.0, won.1 + 1) };
            open
        })
        .count();
    parts.truncate(played);
    parts
}

fn member(user: u128, stats: [i64; 5]) -> MemberRank {
    let mut rank = MemberRank::new(Uuid::nil(), Uuid::from_u128(user));
    rank.stats = ["wins", "draws", "goals_scored", "goals_conceded", "matches_played"]
        .iter()
        .zip(stats)
        .map(|(field, value)| (field.to_string(), value))
        .collect();
    rank
}

fn members() -> impl Strategy<Value = Vec<MemberRank>> {
    prop::collection::vec(prop::array::uniform5(0i64..4), 1..12).prop_map(|lines| {
        lines
            .into_iter()
            .enumerate()
            .map(|(idx, stats)| member(idx as u128, stats))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_goal_winner_follows_goals(team1 in 0u32..40, team2 in 0u32..40) {
        let football = domain("football");
        let score = json!({"team1": team1, "team2": team2});
        let a = (0..5).map(|i| Uuid::from_u128(i)).collect::<Vec<_>>();
        let b = (5..10).map(|i| Uuid::from_u128(i)).collect::<Vec<_>>();
        let resolved = resolve_match(football, None, &a, &b, &score).unwrap();

        let first = &resolved.snapshot[&a[0]];
        let second = &resolved.snapshot[&b[0]];
        let expected = match team1.cmp(&team2) {
            Ordering::Greater => Winner::Team1,
            Ordering::Less => Winner::Team2,
            Ordering::Equal => Winner::Draw,
        };
        prop_assert_eq!(resolved.winner, expected);
        prop_assert_eq!(first["goals_scored"], i64::from(team1));
        prop_assert_eq!(second["goals_scored"], i64::from(team2));
        prop_assert_eq!(bucket_count(first), 1);
        prop_assert_eq!(bucket_count(second), 1);
    }

    #[test]
    fn prop_tennis_winner_takes_most_sets(
        sets in prop::collection::vec((tennis_set(), any::<bool>()), 1..=5)
    ) {
        let parts = until_decided(
            sets.iter().map(|(set, flip)| oriented(*set, *flip)).collect(),
            5,
        );
        let (won1, won2) = majority(&parts);
        prop_assume!(won1 != won2);

        let tennis = domain("tennis");
        let (winner, first, second) = resolve_singles(tennis, "singles", &json!({"sets": parts}));

        prop_assert_eq!(winner, if won1 > won2 { Winner::Team1 } else { Winner::Team2 });
        prop_assert_eq!(first["sets_won"], i64::from(won1));
        prop_assert_eq!(second["sets_won"], i64::from(won2));
        prop_assert_eq!(bucket_count(&first), 1);
        prop_assert_eq!(bucket_count(&second), 1);
    }

    #[test]
    fn prop_table_tennis_winner_takes_most_games(
        games in prop::collection::vec((table_tennis_game(), any::<bool>()), 1..=7)
    ) {
        let parts = until_decided(
            games.iter().map(|(game, flip)| oriented(*game, *flip)).collect(),
            7,
        );
        let (won1, won2) = majority(&parts);
        prop_assume!(won1 != won2);

        let (winner, first, second) =
            resolve_singles(domain("table_tennis"), "singles", &json!({"games": parts}));

        prop_assert_eq!(winner, if won1 > won2 { Winner::Team1 } else { Winner::Team2 });
        prop_assert_eq!(first["games_won"], i64::from(won1));
        prop_assert_eq!(bucket_count(&first), 1);
        prop_assert_eq!(bucket_count(&second), 1);
    }

    #[test]
    fn prop_badminton_games_are_accepted(
        games in prop::collection::vec((badminton_game(), any::<bool>()), 1..=3)
    ) {
        let parts = until_decided(
            games.iter().map(|(game, flip)| oriented(*game, *flip)).collect(),
            3,
        );
        let (won1, won2) = majority(&parts);
        prop_assume!(won1 != won2);

        let (winner, first, second) =
            resolve_singles(domain("badminton"), "singles", &json!({"games": parts}));

        prop_assert_eq!(winner, if won1 > won2 { Winner::Team1 } else { Winner::Team2 });
        prop_assert_eq!(first["points_won"], second["points_lost"]);
    }

    #[test]
    fn prop_extra_set_after_decided_match_is_rejected(
        sets in prop::collection::vec((tennis_set(), any::<bool>()), 3..=5),
        extra in tennis_set(),
    ) {
        let mut parts = until_decided(
            sets.iter().map(|(set, flip)| oriented(*set, *flip)).collect(),
            5,
        );
        let (won1, won2) = majority(&parts);
        prop_assume!(won1 == 3 || won2 == 3);

        parts.push(oriented(extra, false));
        let scorer = domain("tennis").match_config.unwrap().scorer;
        let score = json!({"sets": parts});
        prop_assert!(scorer.validate(&score).is_err());
    }

    #[test]
    fn prop_validation_is_repeatable(a in 0u32..10, b in 0u32..10, c in 0u32..10, d in 0u32..10) {
        let scorer = domain("tennis").match_config.unwrap().scorer;
        let score = json!({"sets": [[a, b], [c, d]]});
        prop_assert_eq!(scorer.validate(&score), scorer.validate(&score));
    }

    #[test]
    fn prop_apply_then_reverse_is_identity(
        stats in prop::array::uniform6(0i64..1_000),
        deltas in prop::array::uniform6(0i64..100),
    ) {
        let fields = ["matches_played", "wins", "draws", "losses", "goals_scored", "goals_conceded"];
        let line = |values: [i64; 6]| -> StatLine {
            fields.iter().zip(values).map(|(f, v)| (f.to_string(), v)).collect()
        };
        let (stats, deltas) = (line(stats), line(deltas));
        let user_id = Uuid::new_v4();

        let applied = merge_checked(user_id, &stats, &deltas).unwrap();
        let reverted = merge_checked(user_id, &applied, &negate(&deltas)).unwrap();
        prop_assert_eq!(reverted, stats);
    }

    #[test]
    fn prop_comparator_is_a_total_order(members in members()) {
        let rules = domain("football").tie_break;
        for a in &members {
            prop_assert_eq!(compare_members(rules, a, a), Ordering::Equal);
            for b in &members {
                prop_assert_eq!(
                    compare_members(rules, a, b),
                    compare_members(rules, b, a).reverse()
                );
                for c in &members {
                    if compare_members(rules, a, b).is_le() && compare_members(rules, b, c).is_le() {
                        prop_assert!(compare_members(rules, a, c).is_le());
                    }
                }
            }
        }
    }

    #[test]
    fn prop_sort_ignores_input_order(members in members(), rotation in 0usize..12) {
        let rules = domain("football").tie_break;

        let mut sorted = members.clone();
        sort_members(rules, &mut sorted);

        let mut reversed: Vec<_> = members.iter().rev().cloned().collect();
        sort_members(rules, &mut reversed);

        let mut rotated = members.clone();
        let len = rotated.len();
        rotated.rotate_left(rotation % len);
        sort_members(rules, &mut rotated);

        prop_assert_eq!(&sorted, &reversed);
        prop_assert_eq!(&sorted, &rotated);
    }
}
