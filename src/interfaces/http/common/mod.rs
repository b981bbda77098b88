//! Shared HTTP building blocks: response envelopes, error mapping, extractors

mod error;
mod response;
mod validated_json;

pub use error::{auth_error_response, domain_error_response, ApiError};
pub use response::{ApiResponse, PaginatedResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
