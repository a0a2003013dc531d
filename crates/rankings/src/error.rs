use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid score: {reason}")]
    InvalidScore { reason: String },

    #[error("Unknown domain '{0}'")]
    UnknownDomain(String),

    #[error("Domain '{0}' does not record matches")]
    MatchModeDisabled(String),

    #[error("Format '{format}' is not supported by domain '{domain}'")]
    UnsupportedFormat { domain: String, format: String },

    #[error("Team size {size} is not allowed for format '{format}'")]
    TeamSize { format: String, size: usize },

    #[error("Invalid teams: {0}")]
    InvalidTeams(String),

    #[error("Unknown stat field '{field}' for domain '{domain}'")]
    UnknownStatField { domain: String, field: String },

    #[error("Stats already recorded for user {user_id} in session {session_id}")]
    AlreadyRecorded { user_id: Uuid, session_id: Uuid },

    #[error("Entry or match {0} has already been corrected")]
    AlreadyCorrected(Uuid),

    #[error("Stat '{field}' for user {user_id} would become negative")]
    NegativeStat { user_id: Uuid, field: String },

    #[error("A stat for user {user_id} would overflow")]
    StatOverflow { user_id: Uuid },
}

pub type Result<T> = std::result::Result<T, RankingError>;

impl RankingError {
    pub fn invalid_score(reason: impl Into<String>) -> Self {
        Self::InvalidScore {
            reason: reason.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            RankingError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            RankingError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Bad input the caller should re-prompt for.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidScore { .. } | Self::NegativeStat { .. } | Self::StatOverflow { .. }
        )
    }

    /// Setup problems detected before anything is persisted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownDomain(_)
                | Self::MatchModeDisabled(_)
                | Self::UnsupportedFormat { .. }
                | Self::TeamSize { .. }
                | Self::InvalidTeams(_)
                | Self::UnknownStatField { .. }
        )
    }

    /// "Already recorded" style failures; retrying will not help.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRecorded { .. } | Self::AlreadyCorrected(_) | Self::ConstraintViolation(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_distinct_from_validation() {
        let conflict = RankingError::AlreadyRecorded {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_validation());

        let invalid = RankingError::invalid_score("set 1: 7-7 is not a valid set score");
        assert!(invalid.is_validation());
        assert!(!invalid.is_conflict());
        assert!(!invalid.is_configuration());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(RankingError::UnknownDomain("curling".into()).is_configuration());
        assert!(
            RankingError::TeamSize {
                format: "doubles".into(),
                size: 3
            }
            .is_configuration()
        );
        assert!(RankingError::NotFound.is_not_found());
    }

    #[test]
    fn test_overflow_is_not_a_conflict() {
        let overflow = RankingError::StatOverflow {
            user_id: Uuid::new_v4(),
        };
        assert!(overflow.is_validation());
        assert!(!overflow.is_conflict());
    }
}
