use http::StatusCode;

use crate::problem::Problem;

/// Errors raised while projecting or encoding a record.
#[derive(thiserror::Error, Debug)]
pub enum ScopeError {
    /// The input could not be introspected: an absent record, or a descriptor
    /// table that points at a field the record does not expose.
    #[error("invalid record '{record}': {reason}")]
    InvalidRecord { record: &'static str, reason: String },

    /// serde could not represent a field value (or the document) as JSON.
    #[error("failed to encode projected record: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A scope was required but none was attached to the request.
    #[error("no scope attached to the request")]
    MissingScope,
}

impl ScopeError {
    /// The record behind a pointer or `Option` was absent.
    #[must_use]
    pub fn absent<T: ?Sized>() -> Self {
        Self::InvalidRecord {
            record: std::any::type_name::<T>(),
            reason: "record is absent".to_owned(),
        }
    }

    /// The descriptor table referenced a field index with no serializable value.
    #[must_use]
    pub fn no_field<T: ?Sized>(index: usize) -> Self {
        Self::InvalidRecord {
            record: std::any::type_name::<T>(),
            reason: format!("no serializable field at index {index}"),
        }
    }

    /// HTTP status the adapters answer with for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRecord { .. } | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingScope => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable code used in problem responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "SCOPED_INVALID_RECORD",
            Self::Encoding(_) => "SCOPED_ENCODING_ERROR",
            Self::MissingScope => "SCOPED_MISSING_SCOPE",
        }
    }

    /// Convert into an RFC 9457 problem. Internal details are kept out of the
    /// `detail` of server-side failures.
    pub fn to_problem(&self) -> Problem {
        let detail = match self {
            Self::MissingScope => self.to_string(),
            Self::InvalidRecord { .. } | Self::Encoding(_) => {
                "The response could not be projected".to_owned()
            }
        };
        let title = match self {
            Self::MissingScope => "Missing Scope",
            Self::InvalidRecord { .. } | Self::Encoding(_) => "Projection Failed",
        };
        Problem::new(self.status(), title, detail).with_code(self.code())
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ScopeError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            Self::MissingScope => tracing::warn!(error = %self, "rejecting request without scope"),
            Self::InvalidRecord { .. } | Self::Encoding(_) => {
                tracing::error!(error = %self, "scoped projection failed");
            }
        }
        self.to_problem().into_response()
    }
}
