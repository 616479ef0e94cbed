use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::staff::{NewStaffMember, StaffFilter, StaffMember, StaffPatch};
use crate::errors::AppError;
use crate::AppState;

use super::{clamp_page, default_limit, double_option, parse_decimal};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListStaffParams {
    pub search: Option<String>,
    pub active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    /// Decimal rate as a string to avoid floating-point issues, e.g. "0.05"
    pub commission_rate: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StaffMember> for StaffResponse {
    fn from(s: StaffMember) -> Self {
        StaffResponse {
            id: s.id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            hire_date: s.hire_date.map(|d| d.to_string()),
            commission_rate: s.commission_rate.to_string(),
            active: s.active,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListStaffResponse {
    pub staff: Vec<StaffResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    pub commission_rate: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub hire_date: Option<Option<String>>,
    pub commission_rate: Option<String>,
    pub active: Option<bool>,
}

fn parse_hire_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid hire_date: {value}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /staff
#[utoipa::path(
    get,
    path = "/staff",
    params(
        ("search" = Option<String>, Query, description = "Free-text search over name/email"),
        ("active" = Option<bool>, Query, description = "Active flag filter"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "Filtered staff list", body = ListStaffResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "staff"
)]
pub async fn list_staff(
    state: web::Data<AppState>,
    query: web::Query<ListStaffParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = StaffFilter {
        search: params.search,
        active: params.active,
        limit,
        offset,
    };

    let page = web::block(move || state.catalog.list_staff(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListStaffResponse {
        staff: page.staff.into_iter().map(Into::into).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// GET /staff/{id}
#[utoipa::path(
    get,
    path = "/staff/{id}",
    params(("id" = i32, Path, description = "Staff member id")),
    responses(
        (status = 200, description = "Staff member found", body = StaffResponse),
        (status = 404, description = "Staff member not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "staff"
)]
pub async fn get_staff(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let member = web::block(move || state.catalog.staff_by_id(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match member {
        Some(m) => Ok(HttpResponse::Ok().json(StaffResponse::from(m))),
        None => Err(AppError::NotFound(format!(
            "Sales representative not found: {id}"
        ))),
    }
}

/// POST /staff
#[utoipa::path(
    post,
    path = "/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = StaffResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Duplicate email"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "staff"
)]
pub async fn create_staff(
    state: web::Data<AppState>,
    body: web::Json<CreateStaffRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let (Some(name), Some(email)) = (body.name, body.email) else {
        return Err(AppError::BadRequest(
            "Missing required fields: name, email".to_string(),
        ));
    };
    let hire_date = body.hire_date.as_deref().map(parse_hire_date).transpose()?;
    let commission_rate = match body.commission_rate.as_deref() {
        Some(rate) => parse_decimal("commission_rate", rate)?,
        None => bigdecimal::BigDecimal::from(0),
    };

    let input = NewStaffMember {
        name,
        email,
        phone: body.phone,
        hire_date,
        commission_rate,
    };

    let member = web::block(move || state.catalog.create_staff(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(StaffResponse::from(member)))
}

/// PUT /staff/{id}
#[utoipa::path(
    put,
    path = "/staff/{id}",
    params(("id" = i32, Path, description = "Staff member id")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = StaffResponse),
        (status = 400, description = "Empty or invalid patch"),
        (status = 404, description = "Staff member not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "staff"
)]
pub async fn update_staff(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateStaffRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let hire_date = match body.hire_date {
        Some(Some(value)) => Some(Some(parse_hire_date(&value)?)),
        Some(None) => Some(None),
        None => None,
    };
    let patch = StaffPatch {
        name: body.name,
        email: body.email,
        phone: body.phone,
        hire_date,
        commission_rate: body
            .commission_rate
            .map(|r| parse_decimal("commission_rate", &r))
            .transpose()?,
        active: body.active,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let member = web::block(move || state.catalog.update_staff(id, patch))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(StaffResponse::from(member)))
}

/// DELETE /staff/{id}
///
/// Refused while sales rows still reference the member.
#[utoipa::path(
    delete,
    path = "/staff/{id}",
    params(("id" = i32, Path, description = "Staff member id")),
    responses(
        (status = 200, description = "Staff member deleted"),
        (status = 404, description = "Staff member not found"),
        (status = 409, description = "Staff member has recorded sales"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "staff"
)]
pub async fn delete_staff(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.catalog.delete_staff(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Sales representative deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::test_support::test_state;

    #[actix_web::test]
    async fn create_requires_name_and_email() {
        let (state, _) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/staff")
            .set_json(serde_json::json!({ "name": "Sam Smith" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required fields: name, email");
    }

    #[actix_web::test]
    async fn garbage_hire_date_is_rejected() {
        let (state, _) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/staff")
            .set_json(serde_json::json!({
                "name": "Sam Smith",
                "email": "sam@example.com",
                "hire_date": "01/02/2024"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid hire_date: 01/02/2024");
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_409() {
        let (state, fakes) = test_state();
        fakes.catalog.seed_staff(1, "Sam Smith", "sam@example.com");
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/staff")
            .set_json(serde_json::json!({
                "name": "Other Sam",
                "email": "sam@example.com"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Sales representative with this email already exists"
        );
    }

    #[actix_web::test]
    async fn active_filter_narrows_the_list() {
        let (state, fakes) = test_state();
        fakes.catalog.seed_staff(1, "Sam Smith", "sam@example.com");
        fakes.catalog.seed_staff(2, "Ana Ray", "ana@example.com");
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/staff/2")
            .set_json(serde_json::json!({ "active": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/staff?active=true").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["staff"][0]["name"], "Sam Smith");
    }
}
