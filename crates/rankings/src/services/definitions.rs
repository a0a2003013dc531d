use tracing::info;
use uuid::Uuid;

use super::RankingEngine;
use crate::dto::ranking::{CreateDefinitionRequest, CreateLevelRequest};
use crate::error::{RankingError, Result};
use crate::models::{
    MemberRank, NewRankingDefinition, NewRankingLevel, RankingDefinition, RankingLevel,
};

impl RankingEngine {
    /// Enables a ranking for one activity of an organization.
    ///
    /// The domain id is checked here, so a definition can never point at a
    /// domain this build does not know.
    pub async fn create_definition(
        &self,
        request: &CreateDefinitionRequest,
    ) -> Result<RankingDefinition> {
        let descriptor = self.get_domain(&request.domain_id)?;
        let definition_id = Uuid::new_v4();

        let levels = if request.seed_default_levels {
            descriptor
                .default_levels
                .iter()
                .zip(1..)
                .map(|(template, order)| NewRankingLevel {
                    level_id: Uuid::new_v4(),
                    definition_id,
                    name: template.name.to_string(),
                    color: Some(template.color.to_string()),
                    level_order: order,
                })
                .collect()
        } else {
            Vec::new()
        };
        let level_count = levels.len();

        let definition = self
            .store
            .insert_definition(
                NewRankingDefinition {
                    definition_id,
                    organization_id: request.organization_id,
                    activity_id: request.activity_id,
                    domain_id: descriptor.id.to_string(),
                },
                levels,
            )
            .await?;

        info!(
            %definition_id,
            organization_id = %definition.organization_id,
            domain = descriptor.id,
            levels = level_count,
            "Created ranking definition"
        );

        Ok(definition)
    }

    pub async fn get_definition(&self, definition_id: Uuid) -> Result<RankingDefinition> {
        self.store.find_definition(definition_id).await
    }

    pub async fn list_definitions(&self, organization_id: Uuid) -> Result<Vec<RankingDefinition>> {
        self.store.list_definitions(organization_id).await
    }

    pub async fn add_level(
        &self,
        definition_id: Uuid,
        request: &CreateLevelRequest,
    ) -> Result<RankingLevel> {
        self.store.find_definition(definition_id).await?;

        let level = self
            .store
            .insert_level(NewRankingLevel {
                level_id: Uuid::new_v4(),
                definition_id,
                name: request.name.clone(),
                color: request.color.clone(),
                level_order: request.level_order,
            })
            .await?;

        info!(%definition_id, level_id = %level.level_id, "Added ranking level");
        Ok(level)
    }

    pub async fn list_levels(&self, definition_id: Uuid) -> Result<Vec<RankingLevel>> {
        self.store.find_definition(definition_id).await?;
        self.store.list_levels(definition_id).await
    }

    /// Manually sets or clears a member's level. Stats are never consulted.
    pub async fn assign_level(
        &self,
        definition_id: Uuid,
        user_id: Uuid,
        level_id: Option<Uuid>,
    ) -> Result<MemberRank> {
        self.store.find_definition(definition_id).await?;

        if let Some(level_id) = level_id {
            let levels = self.store.list_levels(definition_id).await?;
            if !levels.iter().any(|level| level.level_id == level_id) {
                return Err(RankingError::NotFound);
            }
        }

        let rank = self
            .store
            .set_member_level(definition_id, user_id, level_id)
            .await?;

        info!(%definition_id, %user_id, level_id = ?level_id, "Assigned member level");
        Ok(rank)
    }
}
