use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the listing pipeline (query decoding, pagination, fetching).
///
/// Reaching the end of a listing is not an error: it is signalled by a page
/// without a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// Malformed or unsupported filter encoding, bad cursor syntax or page size.
    #[error("Invalid listing request: {0}")]
    Validation(String),

    /// The cursor does not name any known record.
    #[error("Unknown cursor")]
    UnknownCursor,

    /// Storage unreachable or timed out. Retrying is the caller's decision.
    #[error("Listing data unavailable: {0}")]
    DataUnavailable(String),
}

impl ListingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_))
    }
}

impl From<DbErr> for ListingError {
    fn from(err: DbErr) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

impl ResponseError for ListingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnknownCursor => StatusCode::BAD_REQUEST,
            Self::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
