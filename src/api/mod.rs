// HTTP surface - router, handlers, error mapping, request limiting

pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod server;

pub use rate_limit::RateLimiter;
pub use server::{build_router, AppState};
