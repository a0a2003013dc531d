//! The ranking engine.
//!
//! [`RankingEngine`] ties the static [`DomainRegistry`] to a [`RankingStore`].
//! It validates and resolves input in memory, then hands the storage layer a
//! single [`LedgerBatch`](crate::repository::LedgerBatch) per operation.

pub mod aggregator;
pub mod definitions;
pub mod leaderboard;
pub mod matches;

use std::sync::Arc;

use uuid::Uuid;

use crate::domains::{DomainDescriptor, DomainRegistry};
use crate::error::{RankingError, Result};
use crate::models::RankingDefinition;
use crate::repository::RankingStore;

pub use aggregator::EntryCorrection;
pub use leaderboard::{Leaderboard, LeaderboardRow};
pub use matches::{MatchCorrection, RecordedMatch};

#[derive(Clone)]
pub struct RankingEngine {
    store: Arc<dyn RankingStore>,
    registry: Arc<DomainRegistry>,
}

impl RankingEngine {
    pub fn new(store: Arc<dyn RankingStore>) -> Self {
        Self::with_registry(store, Arc::new(DomainRegistry::new()))
    }

    pub fn with_registry(store: Arc<dyn RankingStore>, registry: Arc<DomainRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn RankingStore {
        self.store.as_ref()
    }

    pub fn list_domains(&self) -> Vec<&'static DomainDescriptor> {
        self.registry.list()
    }

    pub fn get_domain(&self, domain_id: &str) -> Result<&'static DomainDescriptor> {
        self.registry
            .get(domain_id)
            .ok_or_else(|| RankingError::UnknownDomain(domain_id.to_string()))
    }

    /// Loads a definition together with its domain descriptor.
    pub(crate) async fn load_definition(
        &self,
        definition_id: Uuid,
    ) -> Result<(RankingDefinition, &'static DomainDescriptor)> {
        let definition = self.store.find_definition(definition_id).await?;
        let descriptor = self.get_domain(&definition.domain_id)?;
        Ok((definition, descriptor))
    }
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
