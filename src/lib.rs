pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_workflow::OrderWorkflow;
use domain::ports::{CatalogStore, CustomerStore, DashboardQueries, OrderStore};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// The stores every handler works against. The catalog side is relational and
/// transactional; the order/customer documents are single-item-atomic.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub dashboard: Arc<dyn DashboardQueries>,
}

impl AppState {
    pub fn workflow(&self) -> OrderWorkflow {
        OrderWorkflow::new(
            self.catalog.clone(),
            self.orders.clone(),
            self.customers.clone(),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::staff::list_staff,
        handlers::staff::get_staff,
        handlers::staff::create_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order_status,
        handlers::orders::cancel_order,
        handlers::dashboard::dashboard_summary,
        handlers::dashboard::dashboard_metric,
    ),
    components(schemas(
        handlers::products::ProductResponse,
        handlers::products::ListProductsResponse,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::customers::CustomerResponse,
        handlers::customers::ListCustomersResponse,
        handlers::customers::CreateCustomerRequest,
        handlers::customers::UpdateCustomerRequest,
        handlers::staff::StaffResponse,
        handlers::staff::ListStaffResponse,
        handlers::staff::CreateStaffRequest,
        handlers::staff::UpdateStaffRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersResponse,
        domain::dashboard::DashboardSummary,
        domain::dashboard::SalesSummaryRow,
        domain::dashboard::TopProductRow,
        domain::dashboard::RepPerformanceRow,
        domain::dashboard::CustomerInsightRow,
        domain::dashboard::InventoryStatusRow,
        domain::dashboard::SalesTrends,
    )),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "customers", description = "Customer documents"),
        (name = "staff", description = "Sales representatives"),
        (name = "orders", description = "Order-fulfillment workflow"),
        (name = "dashboard", description = "Read-only analytics"),
    )
)]
pub struct ApiDoc;

/// Route table, shared between the real server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(handlers::products::list_products))
            .route("", web::post().to(handlers::products::create_product))
            .route("/{id}", web::get().to(handlers::products::get_product))
            .route("/{id}", web::put().to(handlers::products::update_product))
            .route("/{id}", web::delete().to(handlers::products::delete_product)),
    )
    .service(
        web::scope("/customers")
            .route("", web::get().to(handlers::customers::list_customers))
            .route("", web::post().to(handlers::customers::create_customer))
            .route("/{id}", web::get().to(handlers::customers::get_customer))
            .route("/{id}", web::put().to(handlers::customers::update_customer))
            .route("/{id}", web::delete().to(handlers::customers::delete_customer)),
    )
    .service(
        web::scope("/staff")
            .route("", web::get().to(handlers::staff::list_staff))
            .route("", web::post().to(handlers::staff::create_staff))
            .route("/{id}", web::get().to(handlers::staff::get_staff))
            .route("/{id}", web::put().to(handlers::staff::update_staff))
            .route("/{id}", web::delete().to(handlers::staff::delete_staff)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("", web::post().to(handlers::orders::create_order))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}", web::put().to(handlers::orders::update_order_status))
            .route("/{id}", web::delete().to(handlers::orders::cancel_order)),
    )
    .service(
        web::scope("/dashboard")
            .route("", web::get().to(handlers::dashboard::dashboard_summary))
            .route("/{metric}", web::get().to(handlers::dashboard::dashboard_metric)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server. CORS is fully permissive, which also answers `OPTIONS`
/// preflights on every route.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
