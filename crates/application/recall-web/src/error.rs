//! HTTP error mapping
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! chosen by category.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or incomplete request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Nothing to work on yet (409)
    #[error("{0}")]
    NoVehicle(String),

    /// Too few records for the requested chart (422)
    #[error("{0}")]
    InsufficientData(String),

    /// A collaborating service failed (502)
    #[error("{message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A collaborating service did not answer in time (504)
    #[error("{message}")]
    UpstreamTimeout {
        service: &'static str,
        message: String,
    },

    /// Storage or internal failure (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NoVehicle(_) => StatusCode::CONFLICT,
            AppError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::BadRequest(msg) | AppError::NoVehicle(msg) => {
                tracing::debug!(status = status.as_u16(), error = %msg, "Rejected request")
            }
            AppError::InsufficientData(msg) => {
                tracing::info!(error = %msg, "Not enough data")
            }
            AppError::Upstream { service, message } | AppError::UpstreamTimeout { service, message } => {
                tracing::warn!(service, status = status.as_u16(), error = %message, "Upstream failure")
            }
            AppError::Internal(msg) => tracing::error!(error = %msg, "Internal error"),
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<recall_core::Error> for AppError {
    fn from(err: recall_core::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<recall_store::Error> for AppError {
    fn from(err: recall_store::Error) -> Self {
        match err {
            recall_store::Error::Invalid(e) => e.into(),
            recall_store::Error::NotSet => AppError::NoVehicle(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<recall_fetch::Error> for AppError {
    fn from(err: recall_fetch::Error) -> Self {
        use recall_fetch::Error as E;
        let service = recall_fetch::SERVICE_NAME;
        match err {
            E::Timeout(_) => AppError::UpstreamTimeout {
                service,
                message: err.to_string(),
            },
            E::Request(_) | E::Status(_) | E::Decode(_) => AppError::Upstream {
                service,
                message: err.to_string(),
            },
            E::Endpoint(_) | E::Client(_) | E::Fixture(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<recall_charts::Error> for AppError {
    fn from(err: recall_charts::Error) -> Self {
        match err {
            recall_charts::Error::UnknownChart(_) => AppError::BadRequest(err.to_string()),
            recall_charts::Error::InsufficientData { .. } => {
                AppError::InsufficientData(err.to_string())
            }
            recall_charts::Error::Render(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<recall_gemini::Error> for AppError {
    fn from(err: recall_gemini::Error) -> Self {
        use recall_gemini::Error as E;
        let service = recall_gemini::SERVICE_NAME;
        match err {
            E::Timeout(_) => AppError::UpstreamTimeout {
                service,
                message: err.to_string(),
            },
            E::Request(_) | E::Status { .. } | E::EmptyResponse | E::Decode(_) => {
                AppError::Upstream {
                    service,
                    message: err.to_string(),
                }
            }
            E::MissingApiKey | E::Client(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (recall_core::Error::NotAnObject.into(), StatusCode::BAD_REQUEST),
            (recall_store::Error::NotSet.into(), StatusCode::CONFLICT),
            (
                recall_store::Error::Corrupt("bad".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                recall_fetch::Error::Timeout(Duration::from_secs(10)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (recall_fetch::Error::Status(503).into(), StatusCode::BAD_GATEWAY),
            (
                recall_charts::Error::UnknownChart("foo".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                recall_charts::Error::InsufficientData {
                    chart: recall_charts::ChartKind::Severity,
                    reason: "no recall records".into(),
                }
                .into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (recall_gemini::Error::EmptyResponse.into(), StatusCode::BAD_GATEWAY),
            (
                recall_gemini::Error::Timeout(Duration::from_secs(60)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err}");
        }
    }

    #[test]
    fn test_upstream_message_names_service() {
        let err: AppError = recall_fetch::Error::Status(500).into();
        assert!(err.to_string().contains("NHTSA recall API"));

        let err: AppError = recall_gemini::Error::EmptyResponse.into();
        assert!(err.to_string().contains("Gemini"));
    }
}
