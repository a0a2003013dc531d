use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rankings::RankingError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Ranking(RankingError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranking(e) => write!(f, "Ranking error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Ranking(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Ranking(e) if e.is_conflict() => StatusCode::CONFLICT,
            Self::Ranking(e) if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Ranking(e) if e.is_configuration() => StatusCode::BAD_REQUEST,
            Self::Ranking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Ranking(RankingError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Ranking(e) if status_code == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Ranking error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Ranking(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<RankingError> for WebError {
    fn from(error: RankingError) -> Self {
        Self::Ranking(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let conflict = WebError::from(RankingError::AlreadyRecorded {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        });
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let invalid = WebError::from(RankingError::invalid_score("set 1: 7-7"));
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let overflow = WebError::from(RankingError::StatOverflow {
            user_id: Uuid::new_v4(),
        });
        assert_eq!(overflow.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let config = WebError::from(RankingError::UnknownDomain("curling".to_string()));
        assert_eq!(config.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(
            WebError::from(RankingError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::from(RankingError::Serialization(broken_json())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    fn broken_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }
}
