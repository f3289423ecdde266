use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, StockAdjustRequest, UpdateProductRequest},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        categories::Entity as Categories,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin, ensure_seller},
    models::{Product, Role},
    response::{ApiResponse, Meta},
    routes::params::{LowStockQuery, ProductQuery, ProductSortBy, SortOrder, contains_pattern},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    if let Some(seller_id) = query.seller_id {
        condition = condition.add(Column::SellerId.eq(seller_id));
    }

    match query.in_stock {
        Some(true) => condition = condition.add(Column::Stock.gt(0)),
        Some(false) => condition = condition.add(Column::Stock.eq(0)),
        None => {}
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_product(state, id).await?;
    Ok(ApiResponse::success("Product", Product::from(product), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_seller(user)?;
    payload.validate()?;
    ensure_active_category(state, payload.category_id).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        seller_id: Set(user.user_id),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        unit: Set(payload.unit),
        stock: Set(payload.stock),
        image_url: Set(payload.image_url),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let existing = find_product(state, id).await?;
    ensure_owner_or_admin(user, existing.seller_id)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category_id) = payload.category_id {
        ensure_active_category(state, category_id).await?;
        active.category_id = Set(category_id);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // Checkout locks products before writing order lines, so holding this
    // lock keeps the ordered check and the delete consistent.
    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, existing.seller_id)?;

    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&txn)
        .await?;
    if ordered > 0 {
        return Err(AppError::BadRequest(
            "Product has been ordered and cannot be deleted; set its stock to 0 instead".into(),
        ));
    }

    CartItems::delete_many()
        .filter(CartCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    Products::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}

pub async fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    ensure_owner_or_admin(user, product.seller_id)?;

    let new_stock = product
        .stock
        .checked_add(payload.delta)
        .filter(|stock| *stock >= 0)
        .ok_or_else(|| AppError::BadRequest("stock cannot be negative".into()))?;

    let mut active: ActiveModel = product.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "inventory_adjust",
        "products",
        serde_json::json!({ "product_id": updated.id, "delta": payload.delta }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inventory updated",
        Product::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();
    match user.role {
        Role::Admin => {}
        Role::Seller => condition = condition.add(Column::SellerId.eq(user.user_id)),
        Role::Customer => return Err(AppError::Forbidden),
    }

    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    let (page, limit, offset) = query.pagination().normalize();
    condition = condition.add(Column::Stock.lte(threshold));

    let finder = Products::find()
        .filter(condition)
        .order_by_asc(Column::Stock)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Low stock", ProductList { items }, Some(meta)))
}

async fn find_product(state: &AppState, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_active_category(state: &AppState, category_id: Uuid) -> AppResult<()> {
    let category = Categories::find_by_id(category_id).one(&state.orm).await?;
    match category {
        Some(c) if c.active => Ok(()),
        Some(_) => Err(AppError::BadRequest("Category is inactive".into())),
        None => Err(AppError::BadRequest("Category not found".into())),
    }
}
