use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::client::TwilioError;
use crate::domain::ValidationError;
use crate::service::{BatchError, BroadcastError, ServiceError};

const PROVIDER_UNAVAILABLE: &str = "telephony provider is unavailable";
const INTERNAL: &str = "internal server error";

/// Machine-readable error classes exposed to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    ProviderError,
    ProviderUnavailable,
    BatchFailed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::NotFound => "not_found",
            Self::ProviderError => "provider_error",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::BatchFailed => "batch_failed",
            Self::Internal => "internal",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ProviderError | Self::ProviderUnavailable | Self::BatchFailed => {
                StatusCode::BAD_GATEWAY
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Public description of a failure. Never carries transport or parse internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    /// Provider error code, when the provider supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorBody>>,
}

impl ErrorBody {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            index: None,
            cause: None,
        }
    }
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) | ServiceError::Provider(TwilioError::Validation(err)) => {
                Self::new(ErrorKind::InvalidRequest, err.to_string())
            }
            ServiceError::Provider(TwilioError::Api { fault, .. }) => Self {
                code: fault.code,
                ..Self::new(ErrorKind::ProviderError, fault.message.clone())
            },
            ServiceError::Provider(
                TwilioError::Transport(_) | TwilioError::HttpStatus { .. } | TwilioError::Parse(_),
            ) => Self::new(ErrorKind::ProviderUnavailable, PROVIDER_UNAVAILABLE),
            ServiceError::Provider(TwilioError::InvalidEndpoint { .. }) => {
                Self::new(ErrorKind::Internal, INTERNAL)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Error returned by every handler; renders as `{"error": {...}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no route for {0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Batch(#[from] BatchError<ServiceError>),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

impl ApiError {
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::InvalidRequest(message) => ErrorBody::new(ErrorKind::InvalidRequest, message),
            Self::NotFound(path) => ErrorBody::new(ErrorKind::NotFound, format!("no route for {path}")),
            Self::Service(err) => ErrorBody::from(err),
            Self::Batch(err) | Self::Broadcast(BroadcastError::Dispatch(err)) => batch_failed(err),
            Self::Broadcast(BroadcastError::Invalid { index, source }) => ErrorBody {
                index: Some(*index),
                ..ErrorBody::new(ErrorKind::InvalidRequest, format!("people[{index}]: {source}"))
            },
        }
    }
}

fn batch_failed(err: &BatchError<ServiceError>) -> ErrorBody {
    let index = err.index;
    let cause = ErrorBody::from(&err.source);
    ErrorBody {
        index: Some(index),
        cause: Some(Box::new(cause.clone())),
        ..ErrorBody::new(
            ErrorKind::BatchFailed,
            format!("item {index} failed: {}", cause.message),
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        match body.kind {
            ErrorKind::Internal | ErrorKind::ProviderUnavailable => {
                tracing::error!(kind = body.kind.as_str(), error = %self, "request failed");
            }
            ErrorKind::ProviderError | ErrorKind::BatchFailed => {
                tracing::warn!(kind = body.kind.as_str(), error = %self, "request failed");
            }
            ErrorKind::InvalidRequest | ErrorKind::NotFound => {
                tracing::debug!(kind = body.kind.as_str(), error = %self, "request rejected");
            }
        }
        (body.kind.status(), Json(ErrorEnvelope { error: body })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::ApiFault;

    use super::*;

    fn rejected() -> ServiceError {
        ServiceError::Provider(TwilioError::Api {
            status: 400,
            fault: ApiFault {
                code: Some(21211),
                message: "The 'To' number is not valid.".to_owned(),
                more_info: None,
            },
        })
    }

    #[test]
    fn provider_rejection_keeps_public_code_and_message() {
        let body = ApiError::from(rejected()).body();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "kind": "provider_error",
                "message": "The 'To' number is not valid.",
                "code": 21211
            })
        );
    }

    #[test]
    fn transport_details_are_not_exposed() {
        let err = ApiError::from(ServiceError::Provider(TwilioError::HttpStatus {
            status: 503,
            body: Some("upstream stack trace".to_owned()),
        }));
        let body = err.body();
        assert_eq!(body.kind, ErrorKind::ProviderUnavailable);
        assert_eq!(body.message, PROVIDER_UNAVAILABLE);
        assert_eq!(body.kind.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn batch_failure_names_the_index_and_cause() {
        let err = ApiError::from(BatchError {
            index: 1,
            source: rejected(),
        });
        let body = err.body();
        assert_eq!(body.kind, ErrorKind::BatchFailed);
        assert_eq!(body.index, Some(1));
        assert_eq!(
            body.cause.as_deref().map(|cause| cause.kind),
            Some(ErrorKind::ProviderError)
        );
    }

    #[test]
    fn invalid_broadcast_text_is_a_bad_request_naming_the_person() {
        let err = ApiError::from(BroadcastError::Invalid {
            index: 2,
            source: ValidationError::Empty { field: "Body" },
        });
        let body = err.body();
        assert_eq!(body.kind.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body.index, Some(2));
        assert_eq!(body.message, "people[2]: Body must not be empty");
        assert!(body.cause.is_none());
    }

    #[test]
    fn invalid_endpoint_is_internal() {
        let err = ApiError::from(ServiceError::Provider(TwilioError::InvalidEndpoint {
            url: "mailto:x".to_owned(),
            reason: "URL cannot be a base".to_owned(),
        }));
        assert_eq!(err.body().kind.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message, INTERNAL);
    }
}
