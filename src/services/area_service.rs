use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::areas::{AreaList, CreateAreaRequest},
    entity::areas::{ActiveModel, Column, Entity as Areas},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::Area,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_areas(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AreaList>> {
    ensure_customer(user)?;
    let items: Vec<Area> = Areas::find()
        .filter(Column::CustomerId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Area::from)
        .collect();

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success("Areas", AreaList { items }, Some(meta)))
}

pub async fn create_area(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAreaRequest,
) -> AppResult<ApiResponse<Area>> {
    ensure_customer(user)?;
    payload.validate()?;

    let area = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        area_name: Set(payload.area_name.trim().to_string()),
        city: Set(payload.city.trim().to_string()),
        state: Set(payload.state.trim().to_string()),
        pincode: Set(payload.pincode),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "area_create",
        "areas",
        serde_json::json!({ "area_id": area.id }),
    )
    .await;

    Ok(ApiResponse::ok("Area saved", Area::from(area)))
}

/// Only the owning customer can delete; anyone else sees a 404.
pub async fn delete_area(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_customer(user)?;
    let result = Areas::delete_many()
        .filter(
            Condition::all()
                .add(Column::Id.eq(id))
                .add(Column::CustomerId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "area_delete",
        "areas",
        serde_json::json!({ "area_id": id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}
