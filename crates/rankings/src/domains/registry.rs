use std::collections::HashMap;

use super::badminton::BADMINTON;
use super::chess::CHESS;
use super::football::FOOTBALL;
use super::padel::PADEL;
use super::running::RUNNING;
use super::table_tennis::TABLE_TENNIS;
use super::tennis::TENNIS;
use super::{DomainDescriptor, MatchFormat};

/// Formats a match-mode domain accepts.
#[derive(Debug, Clone, Copy)]
pub struct FormatSummary {
    pub formats: &'static [MatchFormat],
    pub default_format: &'static str,
}

/// Registry of compiled-in activity domains.
/// Built once and only read afterwards, so it can be shared freely.
#[derive(Debug)]
pub struct DomainRegistry {
    domains: HashMap<&'static str, &'static DomainDescriptor>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            domains: HashMap::new(),
        };

        registry.register(&PADEL);
        registry.register(&TENNIS);
        registry.register(&FOOTBALL);
        registry.register(&TABLE_TENNIS);
        registry.register(&BADMINTON);
        registry.register(&CHESS);
        registry.register(&RUNNING);

        registry
    }

    fn register(&mut self, descriptor: &'static DomainDescriptor) {
        self.domains.insert(descriptor.id, descriptor);
    }

    pub fn get(&self, domain_id: &str) -> Option<&'static DomainDescriptor> {
        self.domains.get(domain_id).copied()
    }

    /// All descriptors, ordered by id.
    pub fn list(&self) -> Vec<&'static DomainDescriptor> {
        let mut domains: Vec<_> = self.domains.values().copied().collect();
        domains.sort_by_key(|descriptor| descriptor.id);
        domains
    }

    pub fn is_match_mode(&self, domain_id: &str) -> bool {
        self.get(domain_id)
            .is_some_and(DomainDescriptor::is_match_mode)
    }

    pub fn match_formats(&self, domain_id: &str) -> Option<FormatSummary> {
        let config = self.get(domain_id)?.match_config?;
        Some(FormatSummary {
            formats: config.formats,
            default_format: config.default_format,
        })
    }

    /// Reverse lookup from the number of players on both teams together.
    /// Exact-size formats are preferred over ranges.
    pub fn format_from_team_size(
        &self,
        domain_id: &str,
        total_players: usize,
    ) -> Option<&'static MatchFormat> {
        let formats = self.match_formats(domain_id)?.formats;
        let fits = |format: &&'static MatchFormat| format.fits_total(total_players);

        formats
            .iter()
            .filter(|format| matches!(format.team_size, super::TeamSize::Exact { .. }))
            .find(fits)
            .or_else(|| formats.iter().find(fits))
    }
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
