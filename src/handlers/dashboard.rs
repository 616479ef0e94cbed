use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::dashboard::DateRange;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardParams {
    /// ISO date, e.g. "2025-03-01". Defaults to the start of the wide window.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DashboardParams {
    fn range(&self) -> Result<DateRange, AppError> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(AppError::BadRequest)
    }
}

/// GET /dashboard
///
/// Combined sales/product/customer/staff totals plus the ten most recent
/// sales rows.
#[utoipa::path(
    get,
    path = "/dashboard",
    params(
        ("start_date" = Option<String>, Query, description = "ISO start date (default 2024-01-01)"),
        ("end_date" = Option<String>, Query, description = "ISO end date (default 2025-12-31)"),
    ),
    responses(
        (status = 200, description = "Combined dashboard summary"),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_summary(
    state: web::Data<AppState>,
    query: web::Query<DashboardParams>,
) -> Result<HttpResponse, AppError> {
    let range = query.range()?;

    let summary = web::block(move || state.dashboard.summary(range))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /dashboard/{metric}
#[utoipa::path(
    get,
    path = "/dashboard/{metric}",
    params(
        ("metric" = String, Path, description = "One of: sales-summary, top-products, \
          sales-rep-performance, customer-insights, inventory-status, sales-trends"),
        ("start_date" = Option<String>, Query, description = "ISO start date (default 2024-01-01)"),
        ("end_date" = Option<String>, Query, description = "ISO end date (default 2025-12-31)"),
    ),
    responses(
        (status = 200, description = "Requested aggregate"),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Unknown metric"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_metric(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DashboardParams>,
) -> Result<HttpResponse, AppError> {
    let metric = path.into_inner();
    let range = query.range()?;

    let response = web::block(move || {
        let dashboard = &state.dashboard;
        let body = match metric.as_str() {
            "sales-summary" => serde_json::to_value(dashboard.sales_summary(range)?),
            "top-products" => serde_json::to_value(dashboard.top_products(range)?),
            "sales-rep-performance" => serde_json::to_value(dashboard.rep_performance(range)?),
            "customer-insights" => serde_json::to_value(dashboard.customer_insights(range)?),
            "inventory-status" => serde_json::to_value(dashboard.inventory_status()?),
            "sales-trends" => serde_json::to_value(dashboard.sales_trends(range)?),
            _ => {
                return Err(crate::domain::errors::DomainError::NotFound(format!(
                    "Unknown dashboard metric: {metric}"
                )))
            }
        };
        body.map_err(|e| crate::domain::errors::DomainError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(response))
}
