//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the current state of the resource.
    #[schema(rename = "conflict")]
    Conflict,
    /// The application store is temporarily unavailable; retry later.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "application 65f1c0ffee not found")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ApplicationStatus`].
#[derive(ToSchema)]
#[schema(as = ApplicationStatus)]
pub enum ApplicationStatusSchema {
    /// Awaiting a decision.
    #[schema(rename = "Under Scrutiny")]
    UnderScrutiny,
    /// Terminal.
    #[schema(rename = "Approved")]
    Approved,
    /// Terminal.
    #[schema(rename = "Rejected")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::ApplicationSummary`].
#[derive(ToSchema)]
#[schema(as = ApplicationSummary, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApplicationSummarySchema {
    #[schema(example = 10)]
    total: usize,
    #[schema(example = 5)]
    approved: usize,
    #[schema(example = 3)]
    under_scrutiny: usize,
    #[schema(example = 2)]
    rejected: usize,
    /// Mean credit score rounded to the nearest integer; 0 when empty.
    #[schema(example = 686)]
    average_credit_score: i64,
}
