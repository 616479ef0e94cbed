use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// r2d2 pool over blocking Postgres connections. Handlers check a connection
/// out per unit of work, inside `web::block`.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build the shared connection pool. Panics if the pool cannot be
/// constructed; called once at startup, before the server binds.
pub fn create_pool(database_url: &str) -> DbPool {
    Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .expect("Failed to create database connection pool")
}
