//! Actix-web extractor for admin key authentication.
//!
//! The header value is wrapped in `SecretString` as soon as it is read and is
//! never logged.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use secrecy::{ExposeSecret, SecretString};
use std::future::{Ready, ready};

use super::AdminKey;
use crate::config::ADMIN_KEY_HEADER;
use crate::error::AppError;

fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        AppError::Unauthorized(self.message.clone()).error_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.message)
    }
}

/// Extractor that requires a valid `X-Admin-Key` header.
///
/// ```ignore
/// async fn admin_only(_auth: AdminAuth) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl AdminAuth {
    /// Check a request against the configured admin key.
    pub fn authenticate(req: &HttpRequest) -> Result<Self, AuthError> {
        let Some(stored) = req.app_data::<web::Data<AdminKey>>() else {
            return Err(AuthError {
                message: "Internal configuration error".to_string(),
            });
        };

        let Some(provided) = extract_secret_header(req, ADMIN_KEY_HEADER) else {
            return Err(AuthError {
                message: format!("Missing admin key. Provide {} header.", ADMIN_KEY_HEADER),
            });
        };

        if stored.verify(provided.expose_secret()) {
            Ok(AdminAuth)
        } else {
            Err(AuthError {
                message: "Invalid admin key".to_string(),
            })
        }
    }
}

impl FromRequest for AdminAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::authenticate(req))
    }
}
