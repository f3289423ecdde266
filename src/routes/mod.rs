use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod areas;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", auth::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/areas", areas::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}
