use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateProductImageRequest, CreateProductRequest, ProductImageList, ProductList,
        StockAdjustRequest, UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Product, ProductImage},
    response::ApiResponse,
    routes::params::{LowStockQuery, ProductQuery},
    services::{product_image_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/low-stock", get(list_low_stock))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", patch(adjust_stock))
        .route("/{id}/images", get(list_images).post(add_image))
        .route("/{id}/images/{image_id}", delete(delete_image))
        .route("/{id}/images/{image_id}/primary", put(set_primary_image))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product (seller only)", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed or category unavailable"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 403, description = "Not the owning seller"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Delete product"),
        (status = 403, description = "Not the owning seller"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Adjust stock by a signed delta", body = ApiResponse<Product>),
        (status = 400, description = "Zero delta or stock would go negative"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::adjust_stock(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Products at or below the threshold", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Images, primary first", body = ApiResponse<ProductImageList>),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductImageList>>> {
    let resp = product_image_service::list_images(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = CreateProductImageRequest,
    responses(
        (status = 201, description = "Add an image", body = ApiResponse<ProductImage>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owning seller"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateProductImageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductImage>>)> {
    let resp = product_image_service::add_image(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/images/{image_id}/primary",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Make this the primary image", body = ApiResponse<ProductImage>),
        (status = 403, description = "Not the owning seller"),
        (status = 404, description = "Product or image not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn set_primary_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    let resp = product_image_service::set_primary(&state, &user, id, image_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/images/{image_id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Delete an image"),
        (status = 403, description = "Not the owning seller"),
        (status = 404, description = "Product or image not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_image_service::delete_image(&state, &user, id, image_id).await?;
    Ok(Json(resp))
}
