use std::str::FromStr;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::order::{
    CreateOrderInput, LineRequest, Order, OrderFilter, OrderItem, OrderStatus,
};
use crate::errors::AppError;
use crate::AppState;

use super::{clamp_page, default_limit};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Option<String>,
    pub sales_rep_id: Option<i32>,
    pub items: Option<Vec<OrderItemRequest>>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub total_price: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            total_price: item.total_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    pub customer_id: String,
    pub sales_rep_id: i32,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: String,
    pub status: String,
    pub shipping_address: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            order_id: order.order_id,
            customer_id: order.customer_id,
            sales_rep_id: order.sales_rep_id,
            items: order.items.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount.to_string(),
            status: order.status.as_str().to_string(),
            shipping_address: order.shipping_address,
            notes: order.notes,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

fn parse_status(value: &str) -> Result<OrderStatus, AppError> {
    OrderStatus::from_str(value).map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid status. Valid options: {}",
            OrderStatus::valid_options()
        ))
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Runs the order-fulfillment workflow: the stock reservation commits (or
/// fully aborts) against the catalog store before the order document and the
/// customer aggregates are written.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Customer or product not found"),
        (status = 409, description = "Insufficient stock"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let missing = body.customer_id.as_deref().is_none_or(str::is_empty)
        || body.sales_rep_id.is_none()
        || body.items.as_deref().is_none_or(<[_]>::is_empty);
    if missing {
        return Err(AppError::BadRequest(
            "Missing required fields: customerId, salesRepId, items (array)".to_string(),
        ));
    }
    let items = body
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| match (item.product_id, item.quantity) {
            (Some(product_id), Some(quantity)) if quantity > 0 => Ok(LineRequest {
                product_id,
                quantity,
            }),
            _ => Err(AppError::BadRequest(
                "Invalid item: productId and positive quantity required".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let input = CreateOrderInput {
        customer_id: body.customer_id.unwrap_or_default(),
        sales_rep_id: body.sales_rep_id.unwrap_or_default(),
        items,
        shipping_address: body.shipping_address,
        notes: body.notes,
    };

    let created = web::block(move || state.workflow().create(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(json!({
        "orderId": created.order_id,
        "totalAmount": created.total_amount.to_string(),
        "message": "Order created successfully"
    })))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let lookup_id = order_id.clone();

    let order = web::block(move || state.orders.get(&lookup_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound(format!("Order not found: {order_id}"))),
    }
}

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("status" = Option<String>, Query, description = "Order status filter"),
        ("customerId" = Option<String>, Query, description = "Customer filter"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "Filtered order list", body = ListOrdersResponse),
        (status = 400, description = "Invalid status filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let filter = OrderFilter {
        status,
        customer_id: params.customer_id,
        limit,
        offset,
    };

    let page = web::block(move || state.orders.list(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        orders: page.orders.into_iter().map(Into::into).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// PUT /orders/{id}
///
/// Status transitions never touch stock or customer aggregates.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Missing or invalid status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();

    let Some(status) = body.status.as_deref() else {
        return Err(AppError::BadRequest(
            "Missing required fields: status".to_string(),
        ));
    };
    let status = parse_status(status)?;

    let order = web::block(move || {
        state
            .workflow()
            .update_status(&order_id, status, body.notes.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}
///
/// Cancels a pending order: restores stock, marks the flattened sales rows
/// cancelled, then flips the order document and customer aggregates.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order cancelled successfully"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || state.workflow().cancel(&order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Order cancelled successfully" })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::test_support::test_state;

    macro_rules! post_order {
        ($app:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri("/orders")
                .set_json($body)
                .to_request();
            test::call_service($app, req).await
        }};
    }

    #[actix_web::test]
    async fn create_without_required_fields_is_rejected() {
        let (state, _) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let resp = post_order!(&app, serde_json::json!({ "customerId": "C1" }));

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Missing required fields: customerId, salesRepId, items (array)"
        );
    }

    #[actix_web::test]
    async fn create_then_fetch_round_trips() {
        let (state, fakes) = test_state();
        fakes.catalog.seed_product(1, "P1", "10.00", 5);
        fakes.customers.seed_customer("C1", "Jane Doe");
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let resp = post_order!(
            &app,
            serde_json::json!({
                "customerId": "C1",
                "salesRepId": 7,
                "items": [{ "productId": 1, "quantity": 3 }]
            })
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["totalAmount"], "30.00");
        assert_eq!(body["message"], "Order created successfully");
        let order_id = body["orderId"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["items"][0]["productName"], "P1");
        assert_eq!(body["items"][0]["unitPrice"], "10.00");
        assert_eq!(fakes.catalog.stock_of(1), 2);
    }

    #[actix_web::test]
    async fn insufficient_stock_is_a_409() {
        let (state, fakes) = test_state();
        fakes.catalog.seed_product(1, "P1", "10.00", 2);
        fakes.customers.seed_customer("C1", "Jane Doe");
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let resp = post_order!(
            &app,
            serde_json::json!({
                "customerId": "C1",
                "salesRepId": 7,
                "items": [{ "productId": 1, "quantity": 3 }]
            })
        );

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Insufficient stock for product P1. Available: 2, Requested: 3"
        );
        assert_eq!(fakes.catalog.stock_of(1), 2);
    }

    #[actix_web::test]
    async fn invalid_status_filter_lists_valid_options() {
        let (state, _) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/orders?status=completed")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Invalid status. Valid options: pending, confirmed, processing, shipped, delivered, cancelled"
        );
    }

    #[actix_web::test]
    async fn cancelling_unknown_order_is_404() {
        let (state, _) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/orders/nope")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn cancelling_delivered_order_is_a_409() {
        let (state, fakes) = test_state();
        fakes.catalog.seed_product(1, "P1", "10.00", 5);
        fakes.customers.seed_customer("C1", "Jane Doe");
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let resp = post_order!(
            &app,
            serde_json::json!({
                "customerId": "C1",
                "salesRepId": 7,
                "items": [{ "productId": 1, "quantity": 1 }]
            })
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        let order_id = body["orderId"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/orders/{order_id}"))
            .set_json(serde_json::json!({ "status": "delivered" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/orders/{order_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Only pending orders can be cancelled");
        assert_eq!(fakes.catalog.stock_of(1), 4);
    }
}
