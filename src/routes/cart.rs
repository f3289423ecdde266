use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartValidation, CartView, UpdateCartQuantityRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/validate", get(validate_cart))
        .route("/{product_id}", put(set_quantity).delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines with totals", body = ApiResponse<CartView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Customers only")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Add to cart, incrementing an existing line", body = ApiResponse<CartItem>),
        (status = 400, description = "Unknown product or not enough stock")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateCartQuantityRequest,
    responses(
        (status = 200, description = "Set quantity; zero or less removes the line", body = ApiResponse<CartItem>),
        (status = 400, description = "Not enough stock"),
        (status = 404, description = "Product not in cart")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn set_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateCartQuantityRequest>,
) -> AppResult<Json<ApiResponse<Option<CartItem>>>> {
    let resp = cart_service::set_quantity(&state, &user, product_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Remove from cart"),
        (status = 404, description = "Product not in cart")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Empty the cart")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cart/validate",
    responses(
        (status = 200, description = "Lines whose quantity exceeds current stock", body = ApiResponse<CartValidation>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn validate_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartValidation>>> {
    let resp = cart_service::validate_cart(&state, &user).await?;
    Ok(Json(resp))
}
