use std::sync::Arc;

use dotenvy::dotenv;
use salepoint::config::Config;
use salepoint::infrastructure::catalog_repo::DieselCatalogStore;
use salepoint::infrastructure::dashboard_repo::DieselDashboard;
use salepoint::infrastructure::document_repo::{DieselCustomerStore, DieselOrderStore};
use salepoint::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url);
    run_migrations(&pool);

    let state = AppState {
        catalog: Arc::new(DieselCatalogStore::new(pool.clone())),
        orders: Arc::new(DieselOrderStore::new(pool.clone())),
        customers: Arc::new(DieselCustomerStore::new(pool.clone())),
        dashboard: Arc::new(DieselDashboard::new(pool)),
    };

    log::info!(
        "Starting server at http://{}:{}",
        config.host,
        config.port
    );

    build_server(state, &config.host, config.port)?.await
}
