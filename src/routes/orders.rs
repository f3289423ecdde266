use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CheckoutRequest, CheckoutResult, OrderList, OrderWithItems, PayOrderRequest,
        UpdateOrderStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/pay", post(pay_order))
        .route("/{id}/cancel", post(cancel_order))
        .route("/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders visible to the caller", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "One order per seller", body = ApiResponse<CheckoutResult>),
        (status = 400, description = "Empty cart or insufficient stock"),
        (status = 404, description = "Area not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CheckoutResult>>)> {
    let resp = order_service::checkout(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Record payment", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Already paid or not payable"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<PayOrderRequest>>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let resp = order_service::pay_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Cancel and restock", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::cancel_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Advance fulfilment (seller or admin)", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
