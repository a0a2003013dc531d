use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{RankingError, Result};
use crate::models::{NewRankingLevel, RankingLevel};

pub struct LevelRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LevelRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, level: &NewRankingLevel) -> Result<RankingLevel> {
        let mut tx = self.pool.begin().await?;
        let created = insert_level(&mut tx, level).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Lowest level first.
    pub async fn list_for_definition(&self, definition_id: Uuid) -> Result<Vec<RankingLevel>> {
        let levels = sqlx::query_as::<_, RankingLevel>(
            r#"
            SELECT level_id, definition_id, name, color, level_order, created_at
            FROM ranking_levels
            WHERE definition_id = $1
            ORDER BY level_order
            "#,
        )
        .bind(definition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(levels)
    }
}

pub(crate) async fn insert_level(
    tx: &mut Transaction<'_, Postgres>,
    level: &NewRankingLevel,
) -> Result<RankingLevel> {
    sqlx::query_as::<_, RankingLevel>(
        r#"
        INSERT INTO ranking_levels (level_id, definition_id, name, color, level_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING level_id, definition_id, name, color, level_order, created_at
        "#,
    )
    .bind(level.level_id)
    .bind(level.definition_id)
    .bind(&level.name)
    .bind(&level.color)
    .bind(level.level_order)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return RankingError::ConstraintViolation(format!(
                        "Level order {} already exists",
                        level.level_order
                    ));
                }
                Some("23503") => return RankingError::NotFound,
                _ => {}
            }
        }
        RankingError::from(e)
    })
}
