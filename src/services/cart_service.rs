use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType, OnConflict};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    billing::{self, PricedLine},
    dto::cart::{
        AddToCartRequest, CartLine, CartValidation, CartView, StockIssue, UpdateCartQuantityRequest,
    },
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems, Model as CartModel},
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    ensure_customer(user)?;
    let rows = cart_rows(&state.orm, user.user_id).await?;

    let priced: Vec<PricedLine> = rows.iter().map(|(cart, product)| priced_line(cart, product)).collect();
    let total = billing::cart_total(&priced)?;
    let item_count = billing::item_count(&priced);

    let items = rows
        .into_iter()
        .map(|(cart, product)| {
            Ok(CartLine {
                id: cart.id,
                line_total: billing::line_total(product.price, cart.quantity)?,
                quantity: cart.quantity,
                product: Product::from(product),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "OK",
        CartView {
            items,
            item_count,
            total,
        },
        Some(meta),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    ensure_customer(user)?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(payload.product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;

    ensure_in_stock(&product, payload.quantity)?;

    // One statement, so concurrent adds of the same product sum up.
    let line = CartActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        product_id: Set(payload.product_id),
        quantity: Set(payload.quantity),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let cart_item = CartItems::insert(line)
        .on_conflict(
            OnConflict::columns([CartCol::CustomerId, CartCol::ProductId])
                .value(
                    CartCol::Quantity,
                    Expr::col((CartItems, CartCol::Quantity)).add(payload.quantity),
                )
                .value(CartCol::UpdatedAt, Expr::current_timestamp())
                .to_owned(),
        )
        .exec_with_returning(&txn)
        .await?;
    // Dropping the transaction on error rolls the increment back.
    ensure_in_stock(&product, cart_item.quantity)?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_update",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id, "quantity": cart_item.quantity }),
    )
    .await;

    Ok(ApiResponse::success("OK", CartItem::from(cart_item), None))
}

/// Set a line's quantity; zero or less removes it and returns `None`.
pub async fn set_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateCartQuantityRequest,
) -> AppResult<ApiResponse<Option<CartItem>>> {
    ensure_customer(user)?;

    let txn = state.orm.begin().await?;
    let item = find_line(&txn, user.user_id, product_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if payload.quantity <= 0 {
        CartItems::delete_by_id(item.id).exec(&txn).await?;
        txn.commit().await?;
        audit::record(
            &state.pool,
            user.user_id,
            "cart_remove",
            "cart_items",
            serde_json::json!({ "product_id": product_id }),
        )
        .await;
        return Ok(ApiResponse::ok("Removed from cart", None));
    }

    let product = Products::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_in_stock(&product, payload.quantity)?;

    let mut active: CartActive = item.into();
    active.quantity = Set(payload.quantity);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_update",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "quantity": updated.quantity }),
    )
    .await;

    Ok(ApiResponse::ok("Quantity updated", Some(CartItem::from(updated))))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_customer(user)?;
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::CustomerId.eq(user.user_id))
                .add(CartCol::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "cart_remove",
        "cart_items",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::done("Removed from cart"))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_customer(user)?;
    let result = CartItems::delete_many()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_clear",
        "cart_items",
        serde_json::json!({ "removed": result.rows_affected }),
    )
    .await;

    Ok(ApiResponse::done("Cart cleared"))
}

pub async fn validate_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CartValidation>> {
    ensure_customer(user)?;
    let rows = cart_rows(&state.orm, user.user_id).await?;
    let issues = stock_issues(&rows);
    let valid = issues.is_empty();
    let message = if valid {
        "Cart items are valid"
    } else {
        "Some items in cart have insufficient stock"
    };
    Ok(ApiResponse::ok(message, CartValidation { valid, issues }))
}

/// Cart lines joined with their products, oldest first.
async fn cart_rows<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<Vec<(CartModel, ProductModel)>> {
    let rows = CartItems::find()
        .filter(CartCol::CustomerId.eq(customer_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(conn)
        .await?;

    // Products cascade to cart lines, so a missing product is only a
    // concurrent delete; such lines are skipped.
    Ok(rows
        .into_iter()
        .filter_map(|(cart, product)| product.map(|p| (cart, p)))
        .collect())
}

fn priced_line(cart: &CartModel, product: &ProductModel) -> PricedLine {
    PricedLine {
        product_id: product.id,
        seller_id: product.seller_id,
        unit_price: product.price,
        quantity: cart.quantity,
    }
}

fn stock_issues(rows: &[(CartModel, ProductModel)]) -> Vec<StockIssue> {
    rows.iter()
        .filter(|(cart, product)| cart.quantity > product.stock)
        .map(|(cart, product)| StockIssue {
            product_id: product.id,
            name: product.name.clone(),
            requested: cart.quantity,
            available: product.stock,
        })
        .collect()
}

async fn find_line<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    product_id: Uuid,
) -> AppResult<Option<CartModel>> {
    let line = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::CustomerId.eq(customer_id))
                .add(CartCol::ProductId.eq(product_id)),
        )
        .lock(LockType::Update)
        .one(conn)
        .await?;
    Ok(line)
}

fn ensure_in_stock(product: &ProductModel, requested: i32) -> AppResult<()> {
    if requested > product.stock {
        return Err(AppError::BadRequest(format!(
            "Only {} unit(s) of {} in stock",
            product.stock, product.name
        )));
    }
    Ok(())
}
