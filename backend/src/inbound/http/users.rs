//! Customer lookup handler.
//!
//! ```text
//! GET /api/v1/users/{customerId}
//! ```

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::applications::ApplicationBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CUSTOMER_ID_FIELD, parse_customer_id};

/// Fetch the application filed by a customer.
///
/// When a customer has several applications the most recently applied one
/// is returned.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use loan_desk::inbound::http::users::get_customer_application;
///
/// let app = App::new().service(get_customer_application);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users/{customerId}",
    params(("customerId" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Application", body = ApplicationBody),
        (status = 400, description = "Invalid customer identifier", body = ErrorSchema),
        (status = 404, description = "No application for customer", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getCustomerApplication"
)]
#[get("/users/{customer_id}")]
pub async fn get_customer_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApplicationBody>> {
    let customer_id = parse_customer_id(&path.into_inner(), CUSTOMER_ID_FIELD)?;
    let application = state.applications.find_by_customer(&customer_id).await?;
    Ok(web::Json(ApplicationBody::from(&application)))
}
