use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{RankingError, Result};
use crate::models::{MemberRank, StatLine};

#[derive(FromRow)]
struct MemberRankRow {
    definition_id: Uuid,
    user_id: Uuid,
    stats: Json<StatLine>,
    current_level_id: Option<Uuid>,
    last_activity_at: Option<NaiveDateTime>,
}

impl From<MemberRankRow> for MemberRank {
    fn from(row: MemberRankRow) -> Self {
        Self {
            definition_id: row.definition_id,
            user_id: row.user_id,
            stats: row.stats.0,
            current_level_id: row.current_level_id,
            last_activity_at: row.last_activity_at,
        }
    }
}

pub struct MemberRankRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRankRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, definition_id: Uuid, user_id: Uuid) -> Result<Option<MemberRank>> {
        let row = sqlx::query_as::<_, MemberRankRow>(
            r#"
            SELECT definition_id, user_id, stats, current_level_id, last_activity_at
            FROM member_ranks
            WHERE definition_id = $1 AND user_id = $2
            "#,
        )
        .bind(definition_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(MemberRank::from))
    }

    pub async fn list_for_definition(&self, definition_id: Uuid) -> Result<Vec<MemberRank>> {
        let rows = sqlx::query_as::<_, MemberRankRow>(
            r#"
            SELECT definition_id, user_id, stats, current_level_id, last_activity_at
            FROM member_ranks
            WHERE definition_id = $1
            "#,
        )
        .bind(definition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MemberRank::from).collect())
    }

    /// Stats are left alone; only the level reference changes.
    pub async fn set_level(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
        level_id: Option<Uuid>,
    ) -> Result<MemberRank> {
        let row = sqlx::query_as::<_, MemberRankRow>(
            r#"
            INSERT INTO member_ranks (definition_id, user_id, current_level_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (definition_id, user_id)
            DO UPDATE SET current_level_id = EXCLUDED.current_level_id
            RETURNING definition_id, user_id, stats, current_level_id, last_activity_at
            "#,
        )
        .bind(definition_id)
        .bind(user_id)
        .bind(level_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23503")
            {
                return RankingError::NotFound;
            }
            RankingError::from(e)
        })?;

        Ok(row.into())
    }
}

/// Adds `deltas` into a member's stats in place and refreshes
/// `last_activity_at`, creating the member rank first if needed.
///
/// The addition happens inside the UPDATE, so concurrent merges on the same
/// row serialize on its lock instead of overwriting each other. A result with
/// a negative field is an error; the caller's transaction then rolls back.
pub(crate) async fn merge_stats(
    tx: &mut Transaction<'_, Postgres>,
    definition_id: Uuid,
    user_id: Uuid,
    deltas: &StatLine,
) -> Result<MemberRank> {
    sqlx::query(
        r#"
        INSERT INTO member_ranks (definition_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (definition_id, user_id) DO NOTHING
        "#,
    )
    .bind(definition_id)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    let row = sqlx::query_as::<_, MemberRankRow>(
        r#"
        UPDATE member_ranks m
        SET stats = (
                SELECT COALESCE(
                    jsonb_object_agg(
                        k,
                        COALESCE((m.stats ->> k)::bigint, 0) + COALESCE(($3::jsonb ->> k)::bigint, 0)
                    ),
                    '{}'::jsonb
                )
                FROM (
                    SELECT jsonb_object_keys(m.stats)
                    UNION
                    SELECT jsonb_object_keys($3::jsonb)
                ) AS keys (k)
            ),
            last_activity_at = NOW()
        WHERE m.definition_id = $1 AND m.user_id = $2
        RETURNING m.definition_id, m.user_id, m.stats, m.current_level_id, m.last_activity_at
        "#,
    )
    .bind(definition_id)
    .bind(user_id)
    .bind(Json(deltas))
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        // numeric_value_out_of_range from the bigint addition
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().as_deref() == Some("22003")
        {
            return RankingError::StatOverflow { user_id };
        }
        RankingError::from(e)
    })?;

    let rank = MemberRank::from(row);
    if let Some((field, _)) = rank.stats.iter().find(|(_, value)| **value < 0) {
        return Err(RankingError::NegativeStat {
            user_id,
            field: field.clone(),
        });
    }

    Ok(rank)
}
