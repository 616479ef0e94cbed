use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::customer::{Customer, CustomerFilter, CustomerPatch, NewCustomer};
use crate::errors::AppError;
use crate::AppState;

use super::{clamp_page, default_limit, double_option};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersParams {
    /// Free-text search over name, email and company.
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "salesRep")]
    pub sales_rep: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub company: String,
    pub notes: String,
    pub status: String,
    pub assigned_sales_rep_id: Option<i32>,
    pub total_orders: i32,
    /// Decimal value as a string to avoid floating-point issues, e.g. "9.99"
    pub total_value: String,
    pub last_order_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            customer_id: c.customer_id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            company: c.company,
            notes: c.notes,
            status: c.status,
            assigned_sales_rep_id: c.assigned_sales_rep_id,
            total_orders: c.total_orders,
            total_value: c.total_value.to_string(),
            last_order_date: c.last_order_date.map(|d| d.to_rfc3339()),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListCustomersResponse {
    pub customers: Vec<CustomerResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub assigned_sales_rep_id: Option<i32>,
}

/// The aggregate fields (`totalOrders`, `totalValue`, `lastOrderDate`) are
/// owned by the order workflow and deliberately absent here.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub assigned_sales_rep_id: Option<Option<i32>>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    params(
        ("search" = Option<String>, Query, description = "Free-text search over name/email/company"),
        ("status" = Option<String>, Query, description = "Customer status filter"),
        ("salesRep" = Option<i32>, Query, description = "Assigned sales rep filter"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "Filtered customer list", body = ListCustomersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    state: web::Data<AppState>,
    query: web::Query<ListCustomersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = CustomerFilter {
        search: params.search,
        status: params.status,
        sales_rep_id: params.sales_rep,
        limit,
        offset,
    };

    let page = web::block(move || state.customers.list(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListCustomersResponse {
        customers: page.customers.into_iter().map(Into::into).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// GET /customers/{id}
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let lookup_id = customer_id.clone();

    let customer = web::block(move || state.customers.get(&lookup_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match customer {
        Some(c) => Ok(HttpResponse::Ok().json(CustomerResponse::from(c))),
        None => Err(AppError::NotFound(format!(
            "Customer not found: {customer_id}"
        ))),
    }
}

/// POST /customers
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Missing required fields"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return Err(AppError::BadRequest(
            "Missing required fields: name".to_string(),
        ));
    };

    let input = NewCustomer {
        name,
        email: body.email.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        address: body.address.unwrap_or_default(),
        company: body.company.unwrap_or_default(),
        notes: body.notes.unwrap_or_default(),
        status: body.status.unwrap_or_else(|| "active".to_string()),
        assigned_sales_rep_id: body.assigned_sales_rep_id,
    };

    let customer = web::block(move || state.customers.create(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Empty patch"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let body = body.into_inner();

    let patch = CustomerPatch {
        name: body.name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        company: body.company,
        notes: body.notes,
        status: body.status,
        assigned_sales_rep_id: body.assigned_sales_rep_id,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let customer = web::block(move || state.customers.update(&customer_id, patch))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// DELETE /customers/{id}
///
/// Refused while the customer still has order documents, to preserve
/// referential integrity across the two stores.
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer has existing orders"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    web::block(move || {
        let order_count = state.orders.count_for_customer(&customer_id)?;
        if order_count > 0 {
            return Err(crate::domain::errors::DomainError::Conflict(
                "Customer has existing orders and cannot be deleted".to_string(),
            ));
        }
        state.customers.delete(&customer_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Customer deleted successfully" })))
}
