//! Loan application data model.
//!
//! An [`Application`] is created `Under Scrutiny` and moved at most once to a
//! terminal status. The store performs any status update it is handed; the
//! review workflow is the layer that refuses transitions out of a terminal
//! status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credit score threshold applied when a record carries none.
pub const DEFAULT_REQUIRED_SCORE: i32 = 650;
/// Score at or above which an unset status is derived as approved.
pub const AUTO_APPROVE_SCORE: i32 = 750;
/// Applicant name used when a record carries none.
pub const DEFAULT_APPLICANT_NAME: &str = "Unknown";
/// Loan type used when a record carries none.
pub const DEFAULT_LOAN_TYPE: &str = "Personal";

/// Validation errors raised by identifier and status constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    #[error("application id must not be empty")]
    EmptyId,
    #[error("application id must not contain surrounding whitespace")]
    PaddedId,
    #[error("customer id must not be empty")]
    EmptyCustomerId,
    #[error("unknown application status: {0:?}")]
    UnknownStatus(String),
}

/// Opaque application identifier.
///
/// Legacy records carry Mongo object ids; new records receive UUIDs. Both
/// are treated as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Validate and construct an [`ApplicationId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ApplicationValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ApplicationValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ApplicationValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier for a newly created application.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for ApplicationId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ApplicationId> for String {
    fn from(value: ApplicationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// External applicant identifier. Not unique across applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Validate and construct a [`CustomerId`]; surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ApplicationValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ApplicationValidationError::EmptyCustomerId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CustomerId> for String {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Review status of an application.
///
/// The wire names are the literal strings `"Under Scrutiny"`, `"Approved"`
/// and `"Rejected"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ApplicationStatus {
    /// Awaiting a decision; the only editable status.
    #[default]
    UnderScrutiny,
    /// Terminal.
    Approved,
    /// Terminal.
    Rejected,
}

impl ApplicationStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::UnderScrutiny, Self::Approved, Self::Rejected];

    /// Wire representation of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnderScrutiny => "Under Scrutiny",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether no further transition is offered from this status.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::UnderScrutiny)
    }

    /// Status assumed for records that were stored without one.
    ///
    /// # Examples
    /// ```
    /// use loan_desk::domain::ApplicationStatus;
    ///
    /// assert_eq!(ApplicationStatus::derived_from_score(Some(780)), ApplicationStatus::Approved);
    /// assert_eq!(ApplicationStatus::derived_from_score(Some(700)), ApplicationStatus::UnderScrutiny);
    /// assert_eq!(ApplicationStatus::derived_from_score(Some(500)), ApplicationStatus::Rejected);
    /// assert_eq!(ApplicationStatus::derived_from_score(None), ApplicationStatus::UnderScrutiny);
    /// ```
    pub fn derived_from_score(credit_score: Option<i32>) -> Self {
        match credit_score {
            None | Some(0) => Self::UnderScrutiny,
            Some(score) if score >= AUTO_APPROVE_SCORE => Self::Approved,
            Some(score) if score >= DEFAULT_REQUIRED_SCORE => Self::UnderScrutiny,
            Some(_) => Self::Rejected,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ApplicationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Under Scrutiny" => Ok(Self::UnderScrutiny),
            // One legacy schema used "Pending" for the same state.
            "Pending" => Ok(Self::UnderScrutiny),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ApplicationValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApplicationStatus> for &'static str {
    fn from(value: ApplicationStatus) -> Self {
        value.as_str()
    }
}

/// Free-form descriptive fields carried by an application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub occupation: Option<String>,
    pub annual_income: Option<String>,
    pub pan_card_number: Option<String>,
    pub loan_type: String,
    pub amount: Option<String>,
    pub credit_category: Option<String>,
    pub lending_outlook: Option<String>,
    pub positive_summary: Option<String>,
    pub negative_summary: Option<String>,
    pub recommendation_tips: Option<String>,
}

impl ApplicantDetails {
    /// Details with the documented defaults for name and loan type.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loan_type: DEFAULT_LOAN_TYPE.to_owned(),
            ..Self::default()
        }
    }
}

/// Input for creating an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub customer_id: CustomerId,
    pub credit_score: i32,
    pub required_score: i32,
    pub status: ApplicationStatus,
    pub details: ApplicantDetails,
}

impl ApplicationDraft {
    /// Draft with the default threshold and the initial status.
    pub fn new(customer_id: CustomerId, credit_score: i32, details: ApplicantDetails) -> Self {
        Self {
            customer_id,
            credit_score,
            required_score: DEFAULT_REQUIRED_SCORE,
            status: ApplicationStatus::UnderScrutiny,
            details,
        }
    }
}

/// Record-keeping fields attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewMetadata {
    pub applied_date: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub reviewed_date: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A loan application under review.
///
/// ## Invariants
/// - `id` is non-empty and immutable once assigned.
/// - `status` moves out of `UnderScrutiny` at most once when driven by the
///   review workflow; the store itself does not guard this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    id: ApplicationId,
    customer_id: CustomerId,
    credit_score: i32,
    required_score: i32,
    status: ApplicationStatus,
    details: ApplicantDetails,
    metadata: ReviewMetadata,
}

impl Application {
    /// Materialise a stored or freshly created record.
    pub fn new(id: ApplicationId, draft: ApplicationDraft, metadata: ReviewMetadata) -> Self {
        let ApplicationDraft {
            customer_id,
            credit_score,
            required_score,
            status,
            details,
        } = draft;
        Self {
            id,
            customer_id,
            credit_score,
            required_score,
            status,
            details,
            metadata,
        }
    }

    /// Build a newly submitted record. Every submission starts
    /// `Under Scrutiny` whatever the draft says.
    pub fn create(id: ApplicationId, draft: ApplicationDraft, now: DateTime<Utc>) -> Self {
        Self::import(
            id,
            ApplicationDraft {
                status: ApplicationStatus::UnderScrutiny,
                ..draft
            },
            now,
        )
    }

    /// Build a record for a bulk load, keeping the draft's status and
    /// stamping the applied date.
    pub fn import(id: ApplicationId, draft: ApplicationDraft, now: DateTime<Utc>) -> Self {
        Self::new(
            id,
            draft,
            ReviewMetadata {
                applied_date: Some(now),
                ..ReviewMetadata::default()
            },
        )
    }

    pub fn id(&self) -> &ApplicationId {
        &self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn credit_score(&self) -> i32 {
        self.credit_score
    }

    pub fn required_score(&self) -> i32 {
        self.required_score
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn details(&self) -> &ApplicantDetails {
        &self.details
    }

    pub fn metadata(&self) -> &ReviewMetadata {
        &self.metadata
    }

    /// Whether the applicant's score meets the loan threshold.
    pub fn meets_required_score(&self) -> bool {
        self.credit_score >= self.required_score
    }

    /// Overwrite the status without touching timestamps.
    ///
    /// Used by the review workflow for optimistic local edits and reverts.
    pub(crate) fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
    }

    /// Record a persisted status update.
    ///
    /// Always stamps `last_updated`. The reviewed date is stamped on the first
    /// move to a terminal status and left alone afterwards.
    pub fn record_status_change(&mut self, status: ApplicationStatus, at: DateTime<Utc>) {
        self.status = status;
        self.metadata.last_updated = Some(at);
        if status.is_terminal() && self.metadata.reviewed_date.is_none() {
            self.metadata.reviewed_date = Some(at);
        }
    }
}

/// Order applications newest first; records without an applied date sort last.
pub fn sort_by_applied_desc(applications: &mut [Application]) {
    applications.sort_by(|left, right| {
        right
            .metadata
            .applied_date
            .cmp(&left.metadata.applied_date)
    });
}
