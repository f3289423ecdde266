use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    billing::{self, PricedLine},
    dto::orders::{
        CheckoutRequest, CheckoutResult, OrderList, OrderWithItems, PayOrderRequest,
        UpdateOrderStatusRequest,
    },
    entity::{
        areas::Entity as Areas,
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::{Area, Order, OrderItem, OrderStatus, PaymentStatus, Role},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Turn the caller's cart into one order per seller.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResult>> {
    ensure_customer(user)?;
    payload.validate()?;

    let area = Areas::find_by_id(payload.area_id)
        .one(&state.orm)
        .await?
        .filter(|area| area.customer_id == user.user_id)
        .map(Area::from)
        .ok_or(AppError::NotFound)?;
    let delivery_address = billing::format_delivery_address(&area);

    let txn = state.orm.begin().await?;

    let cart = CartItems::find()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    // Lock products in id order so concurrent checkouts queue up instead of deadlocking.
    let product_ids: Vec<Uuid> = cart.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .order_by_asc(ProdCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut lines: Vec<PricedLine> = Vec::with_capacity(cart.len());
    for row in &cart {
        let product = products.get(&row.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("Product {} is no longer available", row.product_id))
        })?;
        if row.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if product.stock < row.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product.name
            )));
        }
        lines.push(PricedLine {
            product_id: product.id,
            seller_id: product.seller_id,
            unit_price: product.price,
            quantity: row.quantity,
        });
    }

    let payment_method = payload.payment_method;
    let today = Utc::now().date_naive();
    let mut placed: Vec<OrderWithItems> = Vec::new();

    for batch in billing::split_by_seller(&lines)? {
        let order_id = Uuid::new_v4();
        let order = OrderActive {
            id: Set(order_id),
            customer_id: Set(user.user_id),
            seller_id: Set(batch.seller_id),
            area_id: Set(Some(area.id)),
            delivery_address: Set(delivery_address.clone()),
            total_amount: Set(batch.total),
            status: Set(OrderStatus::Pending.as_str().into()),
            payment_status: Set(PaymentStatus::Unpaid.as_str().into()),
            payment_method: Set(payment_method.clone()),
            invoice_number: Set(billing::build_invoice_number(order_id, today)),
            paid_at: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        let mut items: Vec<OrderItem> = Vec::with_capacity(batch.lines.len());
        for line in &batch.lines {
            let item = OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                price_per_unit: Set(line.unit_price),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
            items.push(OrderItem::from(item));

            Products::update_many()
                .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(line.quantity))
                .col_expr(ProdCol::UpdatedAt, Expr::current_timestamp().into())
                .filter(ProdCol::Id.eq(line.product_id))
                .exec(&txn)
                .await?;
        }

        placed.push(OrderWithItems {
            order: Order::from(order),
            items,
        });
    }

    CartItems::delete_many()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let grand_total = billing::cart_total(&lines)?;
    let order_ids: Vec<Uuid> = placed.iter().map(|placed| placed.order.id).collect();
    tracing::info!(
        customer_id = %user.user_id,
        orders = order_ids.len(),
        grand_total,
        "checkout completed"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_ids": order_ids, "grand_total": grand_total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResult {
            orders: placed,
            grand_total,
        },
        Some(Meta::total(order_ids.len() as i64)),
    ))
}

pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_customer(user)?;
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.payment() == PaymentStatus::Paid {
        return Err(AppError::BadRequest("Order already paid".into()));
    }
    ensure_transition(order.order_status(), OrderStatus::Paid)?;

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.payment_status = Set(PaymentStatus::Paid.as_str().into());
    active.status = Set(OrderStatus::Paid.as_str().into());
    if let Some(method) = payload.payment_method {
        active.payment_method = Set(Some(method));
    }
    active.paid_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    let items = load_items(&txn, order.id).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_paid",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment recorded",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Cancel an open order and put its units back on the shelf.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = lock_visible_order(&txn, user, id).await?;
    let (order, items) = apply_cancel(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": order.id, "payment_status": order.payment_status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order cancelled",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if user.role == Role::Customer {
        return Err(AppError::Forbidden);
    }
    let next = payload.status;
    if next == OrderStatus::Paid {
        return Err(AppError::BadRequest(
            "Orders become paid through payment only".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    let order = lock_visible_order(&txn, user, id).await?;

    let (order, items) = if next == OrderStatus::Cancelled {
        apply_cancel(&txn, order).await?
    } else {
        ensure_transition(order.order_status(), next)?;
        let mut active: OrderActive = order.into();
        active.status = Set(next.as_str().into());
        active.updated_at = Set(Utc::now().into());
        let order = active.update(&txn).await?;
        let items = load_items(&txn, order.id).await?;
        (order, items)
    };
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = visible_to(user);
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(visible_to(user).add(OrderCol::Id.eq(id)))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Orders a user may see: their purchases, their sales, or everything for admins.
fn visible_to(user: &AuthUser) -> Condition {
    match user.role {
        Role::Admin => Condition::all(),
        Role::Seller => Condition::all().add(OrderCol::SellerId.eq(user.user_id)),
        Role::Customer => Condition::all().add(OrderCol::CustomerId.eq(user.user_id)),
    }
}

fn ensure_transition(from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Cannot move order from {from} to {to}"
        )))
    }
}

async fn lock_visible_order(
    txn: &DatabaseTransaction,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<OrderModel> {
    Orders::find()
        .filter(visible_to(user).add(OrderCol::Id.eq(id)))
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn load_items(txn: &DatabaseTransaction, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    Ok(OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(txn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect())
}

async fn apply_cancel(
    txn: &DatabaseTransaction,
    order: OrderModel,
) -> AppResult<(OrderModel, Vec<OrderItem>)> {
    ensure_transition(order.order_status(), OrderStatus::Cancelled)?;
    let refund = order.payment() == PaymentStatus::Paid;

    let items = load_items(txn, order.id).await?;
    for item in &items {
        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).add(item.quantity))
            .col_expr(ProdCol::UpdatedAt, Expr::current_timestamp().into())
            .filter(ProdCol::Id.eq(item.product_id))
            .exec(txn)
            .await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled.as_str().into());
    if refund {
        active.payment_status = Set(PaymentStatus::Refunded.as_str().into());
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(txn).await?;

    Ok((order, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_errors_name_both_states() {
        let err = ensure_transition(OrderStatus::Delivered, OrderStatus::Cancelled).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad Request Cannot move order from delivered to cancelled"
        );
        assert!(ensure_transition(OrderStatus::Paid, OrderStatus::Shipped).is_ok());
    }
}
