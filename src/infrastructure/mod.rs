pub mod catalog_repo;
pub mod dashboard_repo;
pub mod document_repo;
pub mod models;

#[cfg(test)]
pub mod test_db;
