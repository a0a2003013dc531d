use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{RankingError, Result};
use crate::models::{NewRankingDefinition, NewRankingLevel, RankingDefinition};

use super::level::insert_level;

pub struct DefinitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DefinitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Creates the definition and its initial levels together.
    pub async fn create(
        &self,
        definition: &NewRankingDefinition,
        levels: &[NewRankingLevel],
    ) -> Result<RankingDefinition> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, RankingDefinition>(
            r#"
            INSERT INTO ranking_definitions (definition_id, organization_id, activity_id, domain_id)
            VALUES ($1, $2, $3, $4)
            RETURNING definition_id, organization_id, activity_id, domain_id, created_at
            "#,
        )
        .bind(definition.definition_id)
        .bind(definition.organization_id)
        .bind(definition.activity_id)
        .bind(&definition.domain_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23505")
            {
                return RankingError::ConstraintViolation(
                    "Activity already has a ranking definition".to_string(),
                );
            }
            RankingError::from(e)
        })?;

        for level in levels {
            insert_level(&mut tx, level).await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, definition_id: Uuid) -> Result<RankingDefinition> {
        sqlx::query_as::<_, RankingDefinition>(
            r#"
            SELECT definition_id, organization_id, activity_id, domain_id, created_at
            FROM ranking_definitions
            WHERE definition_id = $1
            "#,
        )
        .bind(definition_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RankingError::NotFound)
    }

    pub async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<RankingDefinition>> {
        let definitions = sqlx::query_as::<_, RankingDefinition>(
            r#"
            SELECT definition_id, organization_id, activity_id, domain_id, created_at
            FROM ranking_definitions
            WHERE organization_id = $1
            ORDER BY created_at, definition_id
            "#,
        )
        .bind(organization_id)
        .fetch_all(self.pool)
        .await?;

        Ok(definitions)
    }
}
