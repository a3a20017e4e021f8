//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (applications,
//!   users, health)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`ApplicationStatusSchema`], [`ApplicationSummarySchema`]) that provide
//!   OpenAPI definitions without coupling domain types to utoipa
//!
//! The generated specification is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::applications::{
    ApplicantDetailsBody, ApplicationBody, CreateApplicationRequest, UpdateStatusRequest,
};
use crate::inbound::http::health::ProbeBody;
use crate::inbound::http::schemas::{
    ApplicationStatusSchema, ApplicationSummarySchema, ErrorCodeSchema, ErrorSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Loan desk API",
        description = "Review loan applications and record approval decisions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::application_summary,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::applications::update_status,
        crate::inbound::http::applications::create_application,
        crate::inbound::http::applications::replace_applications,
        crate::inbound::http::applications::seed_samples,
        crate::inbound::http::users::get_customer_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApplicationBody,
        ApplicantDetailsBody,
        CreateApplicationRequest,
        UpdateStatusRequest,
        ProbeBody,
        ApplicationStatusSchema,
        ApplicationSummarySchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "applications", description = "Loan applications and review decisions"),
        (name = "users", description = "Lookups by customer"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
