use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::admin::{AuditEntry, AuditList, StoreSummary, UserList, UserListQuery},
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs, Model as AuditModel},
        orders::Entity as Orders,
        products::Entity as Products,
        users::{Column as UserCol, Entity as Users},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, Role, User},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(role) = query.role {
        condition = condition.add(UserCol::Role.eq(role.as_str()));
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

/// Head counts plus revenue over paid, shipped and delivered orders.
pub async fn summary(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StoreSummary>> {
    ensure_admin(user)?;

    let customers = count_role(state, Role::Customer).await?;
    let sellers = count_role(state, Role::Seller).await?;
    let products = Products::find().count(&state.orm).await? as i64;
    let orders = Orders::find().count(&state.orm).await? as i64;

    let settled: Vec<&str> = OrderStatus::SETTLED.iter().map(OrderStatus::as_str).collect();

    let revenue: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)::BIGINT
        FROM orders
        WHERE status = ANY($1)
        "#,
    )
    .bind(&settled)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::ok(
        "Summary",
        StoreSummary {
            customers,
            sellers,
            products,
            orders,
            revenue,
        },
    ))
}

pub async fn list_audit_logs(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<AuditList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = AuditLogs::find().order_by_desc(AuditCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(audit_entry)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Audit logs", AuditList { items }, Some(meta)))
}

async fn count_role(state: &AppState, role: Role) -> AppResult<i64> {
    let count = Users::find()
        .filter(UserCol::Role.eq(role.as_str()))
        .count(&state.orm)
        .await?;
    Ok(count as i64)
}

fn audit_entry(model: AuditModel) -> AuditEntry {
    AuditEntry {
        id: model.id,
        user_id: model.user_id,
        action: model.action,
        resource: model.resource,
        metadata: model.metadata,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
