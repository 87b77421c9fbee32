use axum::Router;

pub mod properties;
pub mod system;

/// Router for every API endpoint.
pub fn router() -> Router {
    Router::new().nest("/api/properties", properties::router())
}
