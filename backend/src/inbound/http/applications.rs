//! Loan application API handlers.
//!
//! ```text
//! GET   /api/v1/applications
//! GET   /api/v1/applications/summary
//! GET   /api/v1/applications/{id}
//! PATCH /api/v1/applications/{id}/status {"status":"Approved"}
//! POST  /api/v1/applications
//! PUT   /api/v1/applications
//! POST  /api/v1/applications/samples
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApplicantDetails, Application, ApplicationDraft, ApplicationStatus, ApplicationSummary,
    DEFAULT_APPLICANT_NAME, DEFAULT_LOAN_TYPE, DEFAULT_REQUIRED_SCORE, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ApplicationStatusSchema, ApplicationSummarySchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    CUSTOMER_ID_FIELD, FieldName, ensure_initial_status, missing_field_error,
    parse_application_id, parse_customer_id, parse_status,
};

const CREDIT_SCORE_FIELD: FieldName = FieldName::new("creditScore");

/// Descriptive applicant fields, flattened into application bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetailsBody {
    /// Defaults to `Unknown` on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Ravi Kumar")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_card_number: Option<String>,
    /// Defaults to `Personal` on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Home")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lending_outlook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_tips: Option<String>,
}

impl From<&ApplicantDetails> for ApplicantDetailsBody {
    fn from(details: &ApplicantDetails) -> Self {
        Self {
            name: Some(details.name.clone()),
            email: details.email.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            occupation: details.occupation.clone(),
            annual_income: details.annual_income.clone(),
            pan_card_number: details.pan_card_number.clone(),
            loan_type: Some(details.loan_type.clone()),
            amount: details.amount.clone(),
            credit_category: details.credit_category.clone(),
            lending_outlook: details.lending_outlook.clone(),
            positive_summary: details.positive_summary.clone(),
            negative_summary: details.negative_summary.clone(),
            recommendation_tips: details.recommendation_tips.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl From<ApplicantDetailsBody> for ApplicantDetails {
    fn from(body: ApplicantDetailsBody) -> Self {
        Self {
            name: non_blank(body.name).unwrap_or_else(|| DEFAULT_APPLICANT_NAME.to_owned()),
            email: body.email,
            phone: body.phone,
            address: body.address,
            occupation: body.occupation,
            annual_income: body.annual_income,
            pan_card_number: body.pan_card_number,
            loan_type: non_blank(body.loan_type).unwrap_or_else(|| DEFAULT_LOAN_TYPE.to_owned()),
            amount: body.amount,
            credit_category: body.credit_category,
            lending_outlook: body.lending_outlook,
            positive_summary: body.positive_summary,
            negative_summary: body.negative_summary,
            recommendation_tips: body.recommendation_tips,
        }
    }
}

/// Application as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = Application)]
pub struct ApplicationBody {
    #[schema(example = "65f1c0ffee")]
    pub id: String,
    #[schema(example = "CUST001")]
    pub customer_id: String,
    #[schema(example = 720)]
    pub credit_score: i32,
    #[schema(example = 650)]
    pub required_score: i32,
    #[schema(value_type = ApplicationStatusSchema)]
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub details: ApplicantDetailsBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<&Application> for ApplicationBody {
    fn from(application: &Application) -> Self {
        let metadata = application.metadata();
        Self {
            id: application.id().to_string(),
            customer_id: application.customer_id().to_string(),
            credit_score: application.credit_score(),
            required_score: application.required_score(),
            status: application.status(),
            details: ApplicantDetailsBody::from(application.details()),
            applied_date: metadata.applied_date,
            reviewed_by: metadata.reviewed_by.clone(),
            reviewed_date: metadata.reviewed_date,
            last_updated: metadata.last_updated,
        }
    }
}

fn to_bodies(applications: &[Application]) -> Vec<ApplicationBody> {
    applications.iter().map(ApplicationBody::from).collect()
}

/// Request body for `PATCH /api/v1/applications/{id}/status`.
///
/// Example JSON: `{"status":"Approved"}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "Approved")]
    pub status: String,
}

/// Request body for creating an application; also the element type of
/// `PUT /api/v1/applications`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[serde(default)]
    #[schema(example = "CUST011")]
    pub customer_id: String,
    #[schema(example = 705)]
    pub credit_score: Option<i32>,
    /// Defaults to 650.
    #[serde(default)]
    pub required_score: Option<i32>,
    /// Defaults to `Under Scrutiny`, the only status a new submission may
    /// carry. Bulk replacement accepts any status.
    #[serde(default)]
    #[schema(example = "Under Scrutiny")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub details: ApplicantDetailsBody,
}

impl TryFrom<CreateApplicationRequest> for ApplicationDraft {
    type Error = Error;

    fn try_from(request: CreateApplicationRequest) -> Result<Self, Self::Error> {
        let customer_id = parse_customer_id(&request.customer_id, CUSTOMER_ID_FIELD)?;
        let credit_score = request
            .credit_score
            .ok_or_else(|| missing_field_error(CREDIT_SCORE_FIELD))?;
        let status = request
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            customer_id,
            credit_score,
            required_score: request.required_score.unwrap_or(DEFAULT_REQUIRED_SCORE),
            status,
            details: request.details.into(),
        })
    }
}

/// List applications, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use loan_desk::inbound::http::applications::list_applications;
///
/// let app = App::new().service(list_applications);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    responses(
        (status = 200, description = "Applications, newest first", body = [ApplicationBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ApplicationBody>>> {
    let applications = state.applications.list_applications().await?;
    Ok(web::Json(to_bodies(&applications)))
}

/// Status counts and average credit score.
#[utoipa::path(
    get,
    path = "/api/v1/applications/summary",
    responses(
        (status = 200, description = "Dashboard counters", body = ApplicationSummarySchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "applicationSummary"
)]
#[get("/applications/summary")]
pub async fn application_summary(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ApplicationSummary>> {
    let summary = state.applications.summary().await?;
    Ok(web::Json(summary))
}

/// Fetch one application.
#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    params(("id" = String, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application", body = ApplicationBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApplicationBody>> {
    let id = parse_application_id(&path.into_inner())?;
    let application = state.applications.get_application(&id).await?;
    Ok(web::Json(ApplicationBody::from(&application)))
}

/// Record a review decision.
///
/// Unless the server enforces transitions, any known status is persisted;
/// gating transitions out of a terminal status is left to the caller.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/status",
    params(("id" = String, Path, description = "Application identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated application", body = ApplicationBody),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Application already decided", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "updateApplicationStatus"
)]
#[patch("/applications/{id}/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<ApplicationBody>> {
    let id = parse_application_id(&path.into_inner())?;
    let status = parse_status(&payload.status)?;
    let updated = state.commands.update_status(&id, status).await?;
    Ok(web::Json(ApplicationBody::from(&updated)))
}

/// Submit a new application. It always starts `Under Scrutiny`.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Created application", body = ApplicationBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "createApplication"
)]
#[post("/applications")]
pub async fn create_application(
    state: web::Data<HttpState>,
    payload: web::Json<CreateApplicationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ApplicationDraft::try_from(payload.into_inner())?;
    ensure_initial_status(draft.status)?;
    let created = state.commands.create_application(draft).await?;
    Ok(HttpResponse::Created().json(ApplicationBody::from(&created)))
}

/// Replace the whole collection.
#[utoipa::path(
    put,
    path = "/api/v1/applications",
    request_body = [CreateApplicationRequest],
    responses(
        (status = 200, description = "Stored applications, newest first", body = [ApplicationBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "replaceApplications"
)]
#[put("/applications")]
pub async fn replace_applications(
    state: web::Data<HttpState>,
    payload: web::Json<Vec<CreateApplicationRequest>>,
) -> ApiResult<web::Json<Vec<ApplicationBody>>> {
    let drafts = payload
        .into_inner()
        .into_iter()
        .map(ApplicationDraft::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let stored = state.commands.replace_applications(drafts).await?;
    Ok(web::Json(to_bodies(&stored)))
}

/// Replace the collection with the built-in sample applications.
#[utoipa::path(
    post,
    path = "/api/v1/applications/samples",
    responses(
        (status = 201, description = "Seeded applications", body = [ApplicationBody]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "seedSampleApplications"
)]
#[post("/applications/samples")]
pub async fn seed_samples(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let seeded = state.commands.seed_samples().await?;
    Ok(HttpResponse::Created().json(to_bodies(&seeded)))
}

/// Register the application routes; `summary` and `samples` precede the
/// `{id}` matchers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(application_summary)
        .service(seed_samples)
        .service(list_applications)
        .service(get_application)
        .service(update_status)
        .service(create_application)
        .service(replace_applications);
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
