use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use concierge_engine::traits::{ChatApiError, DirectoryApiError, LedgerApiError, NotificationApiError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An external provider failed. {0}")]
    ProviderError(String),
    #[error("An external provider is not available. {0}")]
    ProviderUnavailable(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::ProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ Request failed. {self}");
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
}

impl From<LedgerApiError> for ServerError {
    fn from(e: LedgerApiError) -> Self {
        match e {
            LedgerApiError::OrderNotFound(_) | LedgerApiError::PartnerNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            LedgerApiError::QueryError(s) => Self::InvalidRequestBody(s),
            LedgerApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<ChatApiError> for ServerError {
    fn from(e: ChatApiError) -> Self {
        match e {
            // Deliberately 404 rather than 403: access denial must not confirm that the booking
            // exists.
            ChatApiError::BookingNotFound => Self::NoRecordFound(e.to_string()),
            ChatApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<DirectoryApiError> for ServerError {
    fn from(e: DirectoryApiError) -> Self {
        match e {
            DirectoryApiError::ServiceNotFound(_) | DirectoryApiError::PropertyNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            DirectoryApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<NotificationApiError> for ServerError {
    fn from(e: NotificationApiError) -> Self {
        match e {
            NotificationApiError::NotFound(_) => Self::NoRecordFound(e.to_string()),
            NotificationApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<crate::integrations::AssistantApiError> for ServerError {
    fn from(e: crate::integrations::AssistantApiError) -> Self {
        use crate::integrations::AssistantApiError::*;
        match e {
            NotConfigured => Self::ProviderUnavailable(e.to_string()),
            Initialization(_) | RequestError(_) | QueryError { .. } | JsonError(_) | EmptyResponse => {
                Self::ProviderError(e.to_string())
            },
        }
    }
}

impl From<crate::integrations::WeatherApiError> for ServerError {
    fn from(e: crate::integrations::WeatherApiError) -> Self {
        Self::ProviderError(e.to_string())
    }
}
