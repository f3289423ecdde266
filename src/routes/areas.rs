use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::areas::{AreaList, CreateAreaRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Area,
    response::ApiResponse,
    services::area_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_areas).post(create_area))
        .route("/{id}", delete(delete_area))
}

#[utoipa::path(
    get,
    path = "/api/areas",
    responses(
        (status = 200, description = "Saved delivery areas, newest first", body = ApiResponse<AreaList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Areas"
)]
pub async fn list_areas(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AreaList>>> {
    let resp = area_service::list_areas(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/areas",
    request_body = CreateAreaRequest,
    responses(
        (status = 201, description = "Save a delivery area", body = ApiResponse<Area>),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Areas"
)]
pub async fn create_area(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAreaRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Area>>)> {
    let resp = area_service::create_area(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/areas/{id}",
    params(
        ("id" = Uuid, Path, description = "Area ID")
    ),
    responses(
        (status = 200, description = "Delete area"),
        (status = 404, description = "Area not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Areas"
)]
pub async fn delete_area(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = area_service::delete_area(&state, &user, id).await?;
    Ok(Json(resp))
}
