use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::categories::{CategoryList, CategoryQuery, CreateCategoryRequest, UpdateCategoryRequest},
    entity::{
        categories::{ActiveModel, Column, Entity as Categories},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
    routes::params::contains_pattern,
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    query: CategoryQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let mut condition = Condition::all();
    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Name).ilike(contains_pattern(search)));
    }
    if let Some(active) = query.active {
        condition = condition.add(Column::Active.eq(active));
    }

    let items: Vec<Category> = Categories::find()
        .filter(condition)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", Category::from(category), None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_name_free(state, &name, None).await?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        active: Set(payload.active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Category created", Category::from(category)))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_name_free(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Category updated", Category::from(category)))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(format!(
            "Category is used by {in_use} product(s)"
        )));
    }

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}

async fn ensure_name_free(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut condition =
        Condition::all().add(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_lowercase()));
    if let Some(id) = except {
        condition = condition.add(Column::Id.ne(id));
    }
    let taken = Categories::find().filter(condition).count(&state.orm).await?;
    if taken > 0 {
        return Err(AppError::BadRequest("Category name already exists".into()));
    }
    Ok(())
}
