use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::product::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::errors::AppError;
use crate::AppState;

use super::{clamp_page, default_limit, parse_decimal};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    pub category: Option<String>,
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Keep only products with stock at or below this threshold.
    #[serde(rename = "lowStock")]
    pub low_stock: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub category: String,
    pub stock_quantity: i32,
    pub specifications: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            category: p.category,
            stock_quantity: p.stock_quantity,
            specifications: p.specifications,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub products: Vec<ProductResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub specifications: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i32>,
    pub specifications: Option<serde_json::Value>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("search" = Option<String>, Query, description = "Free-text search over name/description"),
        ("lowStock" = Option<i32>, Query, description = "Keep products with stock <= threshold"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "Filtered product list", body = ListProductsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = ProductFilter {
        category: params.category,
        search: params.search,
        low_stock: params.low_stock,
        limit,
        offset,
    };

    let page = web::block(move || state.catalog.list_products(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        products: page.products.into_iter().map(Into::into).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || state.catalog.product_by_id(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match product {
        Some(p) => Ok(HttpResponse::Ok().json(ProductResponse::from(p))),
        None => Err(AppError::NotFound(format!("Product not found: {id}"))),
    }
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let (Some(name), Some(price), Some(category)) = (body.name, body.price, body.category)
    else {
        return Err(AppError::BadRequest(
            "Missing required fields: name, price, category".to_string(),
        ));
    };
    let price = parse_decimal("price", &price)?;
    if price < bigdecimal::BigDecimal::from(0) {
        return Err(AppError::BadRequest(format!("Invalid price: {price}")));
    }
    let stock_quantity = body.stock_quantity.unwrap_or(0);
    if stock_quantity < 0 {
        return Err(AppError::BadRequest(format!(
            "Invalid stock_quantity: {stock_quantity}"
        )));
    }

    let input = NewProduct {
        name,
        description: body.description.unwrap_or_default(),
        price,
        category,
        stock_quantity,
        specifications: body.specifications.unwrap_or_else(|| json!({})),
    };

    let product = web::block(move || state.catalog.create_product(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Empty or invalid patch"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let price = body
        .price
        .map(|p| parse_decimal("price", &p))
        .transpose()?;
    if let Some(p) = &price {
        if *p < bigdecimal::BigDecimal::from(0) {
            return Err(AppError::BadRequest(format!("Invalid price: {p}")));
        }
    }
    if let Some(q) = body.stock_quantity {
        if q < 0 {
            return Err(AppError::BadRequest(format!("Invalid stock_quantity: {q}")));
        }
    }

    let patch = ProductPatch {
        name: body.name,
        description: body.description,
        price,
        category: body.category,
        stock_quantity: body.stock_quantity,
        specifications: body.specifications,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let product = web::block(move || state.catalog.update_product(id, patch))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /products/{id}
///
/// Products are deleted unconditionally; historical sales rows cascade away
/// with them.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.catalog.delete_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
