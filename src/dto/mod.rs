pub mod auth;
pub mod functions;
pub mod orders;
pub mod products;
