//! Domain primitives, services and the review workflow.
//!
//! Purpose: Define strongly typed loan application entities and the
//! services that operate on them through the ports in [`ports`]. Adapters
//! live in `inbound` and `outbound`; nothing here knows about HTTP or files.
//!
//! Public surface:
//! - Application (alias to `application::Application`): a loan application.
//! - ApplicationSummary: dashboard counts and mean credit score.
//! - ApplicationService: driving port implementation over a store.
//! - StatusWorkflowController: optimistic status changes with revert.
//! - Error / ErrorCode: API error payload and stable identifiers.

pub mod application;
pub mod application_service;
pub mod application_summary;
pub mod error;
pub mod ports;
pub mod sample_applications;
pub mod status_workflow;
pub mod trace_id;

pub use self::application::{
    AUTO_APPROVE_SCORE, ApplicantDetails, Application, ApplicationDraft, ApplicationId,
    ApplicationStatus, ApplicationValidationError, CustomerId, DEFAULT_APPLICANT_NAME,
    DEFAULT_LOAN_TYPE, DEFAULT_REQUIRED_SCORE, ReviewMetadata, sort_by_applied_desc,
};
pub use self::application_service::{ApplicationService, TransitionPolicy};
pub use self::application_summary::ApplicationSummary;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::sample_applications::sample_application_drafts;
pub use self::status_workflow::{
    DEFAULT_NOTICE_WINDOW, Notice, ReviewerSession, STATUS_UPDATE_FAILED,
    StatusWorkflowController, WorkflowError,
};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use loan_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such application"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
