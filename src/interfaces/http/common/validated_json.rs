//! JSON body extractor that runs `validator` rules after deserializing.
//!
//! Bodies that are not JSON at all are a 400. Anything that parses but does
//! not describe a valid plan (missing field, wrong type, failed rule) is a
//! validation error and goes through the domain error mapping (422).

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::{domain_error_response, ApiResponse};
use crate::domain::DomainError;

/// `Json<T>` plus `Validate`; handlers only ever see checked payloads.
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    /// Wrong content type or unparseable bytes
    Malformed(JsonRejection),
    /// Well-formed JSON that does not satisfy the payload's shape or rules
    Invalid(String),
}

impl From<JsonRejection> for ValidatedJsonRejection {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::Invalid(e.body_text()),
            other => Self::Malformed(other),
        }
    }
}

impl From<ValidationErrors> for ValidatedJsonRejection {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(describe(&errors))
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                let body = ApiResponse::<()>::error(rejection.body_text());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(message) => {
                domain_error_response(DomainError::Validation(message)).into_response()
            }
        }
    }
}

/// `field: message` pairs sorted by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                };
                (field.clone(), message)
            })
        })
        .collect();
    fields.sort();

    if fields.is_empty() {
        return "Validation failed".to_string();
    }
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
