use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::access::AccessError;
use crate::domain::product::errors::ProductError;
use crate::domain::user::errors::UserError;

pub mod products;
pub mod users;

/// Successful handler outcome: a status code and a handler-specific body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// JSON body extractor whose rejection follows the error contract instead
/// of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// The closed failure taxonomy.
///
/// Every failure raised anywhere in the pipeline converts into one of
/// these, and `into_response` below is the single place failure bodies are
/// rendered. Handlers return the tags; nothing else shapes an error reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No usable bearer credentials on a protected route.
    MissingCredentials,
    /// Credentials were presented and rejected: bad login, bad or expired
    /// token, caller row gone. Deliberately one tag so the response cannot
    /// say which.
    InvalidCredentials,
    Forbidden(String),
    NotFound(String),
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    MalformedBody,
    Conflict(String),
    MethodNotAllowed,
    RouteNotFound,
    /// Anything unclassified. The detail is logged, never sent.
    Internal(String),
}

impl ApiError {
    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            fields,
        }
    }

    pub fn validation_message(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// Failure body wire shape: `{"status":"error","message":...,"fields":{..}?}`.
#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            fields: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Authentication required. Please log in."),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Invalid authentication credentials."),
            ),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, ErrorBody::new(message)),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::new(message)),
            ApiError::Validation { message, fields } => {
                let mut body = ErrorBody::new(message);
                if !fields.is_empty() {
                    body.fields = Some(fields);
                }
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Malformed or missing request body"),
            ),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, ErrorBody::new(message)),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::new("HTTP method not allowed for this endpoint."),
            ),
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("The requested route does not exist."),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(
                        "We're experiencing technical difficulties. Please try again later.",
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::MalformedBody
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => ApiError::InvalidCredentials,
            AccessError::Forbidden => {
                ApiError::Forbidden("You do not have permission to perform this action.".to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(message) => ApiError::NotFound(message),
            UserError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            UserError::EmailChangeNotAllowed
            | UserError::RoleChangeNotAllowed
            | UserError::NothingToUpdate => ApiError::validation_message(err.to_string()),
            UserError::Access(access) => ApiError::from(access),
            UserError::Hashing(detail) | UserError::StoreFailure(detail) => {
                ApiError::Internal(detail)
            }
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(message) => ApiError::NotFound(message),
            ProductError::Duplicate => ApiError::Conflict(err.to_string()),
            ProductError::NothingToUpdate => ApiError::validation_message(err.to_string()),
            ProductError::PermissionDenied(message) => ApiError::Forbidden(message),
            ProductError::Access(access) => ApiError::from(access),
            ProductError::StoreFailure(detail) => ApiError::Internal(detail),
        }
    }
}
