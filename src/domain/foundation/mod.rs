//! Foundation module - shared value objects for the domain layer.

mod errors;
mod ids;
mod route;

pub use errors::ValidationError;
pub use ids::UserId;
pub use route::Route;
