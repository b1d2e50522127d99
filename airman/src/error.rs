use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

use api::response::{ApiError, ApiResponse};

#[derive(Debug)]
pub enum AppError {
    NoScheduledContent,
    NoActiveSession,
    ChannelNotFound,
    AccessDenied,
    ProgramNotFound,
    /// Message from the transcoding provider, kept verbatim
    ExternalProviderError(String),
    /// Local write failed after the provider accepted the command
    PersistenceInconsistency(String),
    BadRequest(String),
    DatabaseError(String),
    InternalServerError(anyhow::Error),
}

impl AppError {
    pub fn provider<T>(t: T) -> Self
    where
        T: ToString,
    {
        AppError::ExternalProviderError(t.to_string())
    }

    pub fn bad_request<T>(t: T) -> Self
    where
        T: ToString,
    {
        AppError::BadRequest(t.to_string())
    }

    pub fn database<T>(t: T) -> Self
    where
        T: ToString,
    {
        AppError::DatabaseError(t.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NoScheduledContent => "NoScheduledContent",
            AppError::NoActiveSession => "NoActiveSession",
            AppError::ChannelNotFound => "ChannelNotFound",
            AppError::AccessDenied => "AccessDenied",
            AppError::ProgramNotFound => "ProgramNotFound",
            AppError::ExternalProviderError(_) => "ExternalProviderError",
            AppError::PersistenceInconsistency(_) => "PersistenceInconsistency",
            AppError::BadRequest(_) => "BadRequest",
            AppError::DatabaseError(_) => "DatabaseError",
            AppError::InternalServerError(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoScheduledContent => StatusCode::CONFLICT,
            AppError::NoActiveSession => StatusCode::CONFLICT,
            AppError::ChannelNotFound => StatusCode::NOT_FOUND,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::ProgramNotFound => StatusCode::NOT_FOUND,
            AppError::ExternalProviderError(_) => StatusCode::BAD_GATEWAY,
            AppError::PersistenceInconsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::NoScheduledContent => "no scheduled content for this channel".to_string(),
            AppError::NoActiveSession => "channel has no active session".to_string(),
            AppError::ChannelNotFound => "channel not found".to_string(),
            AppError::AccessDenied => "access denied".to_string(),
            AppError::ProgramNotFound => "program not found".to_string(),
            AppError::ExternalProviderError(msg) => msg.clone(),
            AppError::PersistenceInconsistency(msg) => {
                format!("provider accepted the command but local state was not saved: {msg}")
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::DatabaseError(msg) => format!("database error: {msg}"),
            AppError::InternalServerError(err) => err.to_string(),
        }
    }

    /// Operator guidance for the error kind
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::NoScheduledContent => Some("Add programs to the schedule first"),
            AppError::NoActiveSession => Some("Start the stream first"),
            AppError::ChannelNotFound => Some("Check the channel id"),
            AppError::AccessDenied => Some("Only the channel owner can manage this channel"),
            AppError::ExternalProviderError(_) => {
                Some("The transcoding provider rejected the request, retry or check its status")
            }
            AppError::PersistenceInconsistency(_) => {
                Some("Check the stream status, local state may differ from the provider")
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiResponse::err(ApiError {
            kind: self.kind().to_string(),
            message: self.message(),
            hint: self.hint().map(str::to_string),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::InternalServerError(err.into())
    }
}
