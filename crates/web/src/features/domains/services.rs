use rankings::{
    RankingEngine,
    dto::domain::{DomainResponse, MatchFormatInfo, MatchFormatsResponse},
    error::{RankingError, Result},
};

/// List every compiled-in domain
pub fn list_domains(engine: &RankingEngine) -> Vec<DomainResponse> {
    engine
        .list_domains()
        .into_iter()
        .map(DomainResponse::from)
        .collect()
}

/// Get one domain by id
pub fn get_domain(engine: &RankingEngine, domain_id: &str) -> Result<DomainResponse> {
    engine.get_domain(domain_id).map(DomainResponse::from)
}

/// Formats of a match-mode domain
pub fn get_match_formats(engine: &RankingEngine, domain_id: &str) -> Result<MatchFormatsResponse> {
    let descriptor = engine.get_domain(domain_id)?;
    engine
        .registry()
        .match_formats(descriptor.id)
        .map(MatchFormatsResponse::from)
        .ok_or_else(|| RankingError::MatchModeDisabled(descriptor.id.to_string()))
}

/// Format implied by the number of players on both teams
pub fn get_format_for_team_size(
    engine: &RankingEngine,
    domain_id: &str,
    total_players: usize,
) -> Result<MatchFormatInfo> {
    get_match_formats(engine, domain_id)?;
    engine
        .registry()
        .format_from_team_size(domain_id, total_players)
        .map(MatchFormatInfo::from)
        .ok_or(RankingError::NotFound)
}
