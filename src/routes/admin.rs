use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::admin::{AuditList, StoreSummary, UserList, UserListQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/summary", get(summary))
        .route("/audit-logs", get(list_audit_logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses(
    (status = 200, description = "List users (admin only)", body = ApiResponse<UserList>),
    (status = 403, description = "Forbidden"),
    (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/summary",
    responses(
    (status = 200, description = "Store counts and revenue (admin only)", body = ApiResponse<StoreSummary>),
    (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StoreSummary>>> {
    let resp = admin_service::summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(Pagination),
    responses(
    (status = 200, description = "Audit trail, newest first (admin only)", body = ApiResponse<AuditList>),
    (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<AuditList>>> {
    let resp = admin_service::list_audit_logs(&state, &user, pagination).await?;
    Ok(Json(resp))
}
