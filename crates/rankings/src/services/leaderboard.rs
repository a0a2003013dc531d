use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use super::RankingEngine;
use crate::domains::TieBreakRule;
use crate::error::Result;
use crate::models::{MemberRank, RankingDefinition, RankingLevel};

/// Orders `a` before `b` when `a` ranks higher.
///
/// Rules apply in order and the first one that tells the two apart wins.
/// Members equal under every rule fall back to user id, so the result is a
/// total order that ignores input order.
pub fn compare_members(tie_break: &[TieBreakRule], a: &MemberRank, b: &MemberRank) -> Ordering {
    tie_break
        .iter()
        .map(|rule| rule.compare(&a.stats, &b.stats))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.user_id.cmp(&b.user_id))
}

pub fn sort_members(tie_break: &[TieBreakRule], members: &mut [MemberRank]) {
    members.sort_by(|a, b| compare_members(tie_break, a, b));
}

#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    /// 1-based.
    pub position: u32,
    pub member: MemberRank,
    pub level: Option<RankingLevel>,
}

#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub definition: RankingDefinition,
    pub rows: Vec<LeaderboardRow>,
}

impl RankingEngine {
    pub async fn leaderboard(&self, definition_id: Uuid) -> Result<Leaderboard> {
        let (definition, descriptor) = self.load_definition(definition_id).await?;
        let mut members = self.store.list_member_ranks(definition_id).await?;
        let levels: HashMap<Uuid, RankingLevel> = self
            .store
            .list_levels(definition_id)
            .await?
            .into_iter()
            .map(|level| (level.level_id, level))
            .collect();

        sort_members(descriptor.tie_break, &mut members);

        let rows = members
            .into_iter()
            .zip(1..)
            .map(|(mut member, position)| {
                let mut stats = descriptor.empty_stats();
                stats.append(&mut member.stats);
                member.stats = stats;
                let level = member
                    .current_level_id
                    .and_then(|level_id| levels.get(&level_id).cloned());
                LeaderboardRow {
                    position,
                    member,
                    level,
                }
            })
            .collect();

        Ok(Leaderboard { definition, rows })
    }

    /// A member's current rank; members never seen before read as all zeros.
    pub async fn member_rank(&self, definition_id: Uuid, user_id: Uuid) -> Result<MemberRank> {
        let (_, descriptor) = self.load_definition(definition_id).await?;
        let mut rank = self
            .store
            .find_member_rank(definition_id, user_id)
            .await?
            .unwrap_or_else(|| MemberRank::new(definition_id, user_id));

        let mut stats = descriptor.empty_stats();
        stats.append(&mut rank.stats);
        rank.stats = stats;
        Ok(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainRegistry;
    use crate::models::StatLine;

    fn member(user: u128, pairs: &[(&str, i64)]) -> MemberRank {
        let mut rank = MemberRank::new(Uuid::nil(), Uuid::from_u128(user));
        rank.stats = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect::<StatLine>();
        rank
    }

    #[test]
    fn test_football_goal_difference_breaks_ties() {
        let registry = DomainRegistry::new();
        let football = registry.get("football").unwrap();

        let mut members = vec![
            member(1, &[("wins", 3), ("goals_scored", 5), ("goals_conceded", 4)]),
            member(2, &[("wins", 3), ("goals_scored", 9), ("goals_conceded", 2)]),
            member(3, &[("wins", 4)]),
        ];
        sort_members(football.tie_break, &mut members);

        let order: Vec<u128> = members.iter().map(|m| m.user_id.as_u128()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_user_id_is_final_fallback() {
        let registry = DomainRegistry::new();
        let chess = registry.get("chess").unwrap();

        let mut members = vec![member(9, &[("wins", 1)]), member(4, &[("wins", 1)])];
        sort_members(chess.tie_break, &mut members);
        assert_eq!(members[0].user_id, Uuid::from_u128(4));
    }

    #[test]
    fn test_fewer_matches_played_ranks_higher_on_tie() {
        let registry = DomainRegistry::new();
        let padel = registry.get("padel").unwrap();

        let a = member(1, &[("wins", 2), ("matches_played", 5)]);
        let b = member(2, &[("wins", 2), ("matches_played", 3)]);
        assert_eq!(compare_members(padel.tie_break, &a, &b), Ordering::Greater);
    }
}
