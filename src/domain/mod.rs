pub mod customer;
pub mod dashboard;
pub mod errors;
pub mod order;
pub mod ports;
pub mod product;
pub mod staff;
