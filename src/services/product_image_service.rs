use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::products::{CreateProductImageRequest, ProductImageList},
    entity::{
        product_images::{ActiveModel, Column, Entity as ProductImages, Model as ImageModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::ProductImage,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Primary image first, then by `sort_order`.
pub async fn list_images(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<ProductImageList>> {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items: Vec<ProductImage> = ordered_images(&state.orm, product_id)
        .await?
        .into_iter()
        .map(ProductImage::from)
        .collect();

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success("Images", ProductImageList { items }, Some(meta)))
}

pub async fn add_image(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: CreateProductImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    payload.validate()?;

    let txn = lock_owned_product(state, user, product_id).await?;
    let has_images = ProductImages::find()
        .filter(Column::ProductId.eq(product_id))
        .one(&txn)
        .await?
        .is_some();
    let primary = payload.is_primary || !has_images;
    if primary {
        clear_primary(&txn, product_id).await?;
    }

    let image = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        image_url: Set(payload.image_url.trim().to_string()),
        alt_text: Set(payload.alt_text),
        is_primary: Set(primary),
        sort_order: Set(payload.sort_order),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    if primary {
        sync_cover(&txn, product_id, Some(image.image_url.clone())).await?;
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_image_add",
        "product_images",
        serde_json::json!({ "product_id": product_id, "image_id": image.id }),
    )
    .await;

    Ok(ApiResponse::ok("Image added", ProductImage::from(image)))
}

pub async fn set_primary(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    image_id: Uuid,
) -> AppResult<ApiResponse<ProductImage>> {
    let txn = lock_owned_product(state, user, product_id).await?;
    let image = find_image(&txn, product_id, image_id).await?;

    clear_primary(&txn, product_id).await?;
    let mut active: ActiveModel = image.into();
    active.is_primary = Set(true);
    let image = active.update(&txn).await?;
    sync_cover(&txn, product_id, Some(image.image_url.clone())).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_image_primary",
        "product_images",
        serde_json::json!({ "product_id": product_id, "image_id": image_id }),
    )
    .await;

    Ok(ApiResponse::ok("Primary image set", ProductImage::from(image)))
}

/// Deleting the primary image promotes the next one in order.
pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    image_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = lock_owned_product(state, user, product_id).await?;
    let image = find_image(&txn, product_id, image_id).await?;
    ProductImages::delete_by_id(image.id).exec(&txn).await?;

    if image.is_primary {
        let next = ordered_images(&txn, product_id).await?.into_iter().next();
        let cover = match next {
            Some(next) => {
                let url = next.image_url.clone();
                let mut active: ActiveModel = next.into();
                active.is_primary = Set(true);
                active.update(&txn).await?;
                Some(url)
            }
            None => None,
        };
        sync_cover(&txn, product_id, cover).await?;
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_image_delete",
        "product_images",
        serde_json::json!({ "product_id": product_id, "image_id": image_id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}

/// Opens a transaction holding the product row lock; image edits on one
/// product run one at a time.
async fn lock_owned_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<DatabaseTransaction> {
    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, product.seller_id)?;
    Ok(txn)
}

async fn find_image<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    image_id: Uuid,
) -> AppResult<ImageModel> {
    ProductImages::find()
        .filter(
            Condition::all()
                .add(Column::Id.eq(image_id))
                .add(Column::ProductId.eq(product_id)),
        )
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ordered_images<C: ConnectionTrait>(conn: &C, product_id: Uuid) -> AppResult<Vec<ImageModel>> {
    let images = ProductImages::find()
        .filter(Column::ProductId.eq(product_id))
        .order_by_desc(Column::IsPrimary)
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::CreatedAt)
        .all(conn)
        .await?;
    Ok(images)
}

async fn clear_primary<C: ConnectionTrait>(conn: &C, product_id: Uuid) -> AppResult<()> {
    ProductImages::update_many()
        .col_expr(Column::IsPrimary, Expr::value(false))
        .filter(
            Condition::all()
                .add(Column::ProductId.eq(product_id))
                .add(Column::IsPrimary.eq(true)),
        )
        .exec(conn)
        .await?;
    Ok(())
}

/// `products.image_url` mirrors the primary image.
async fn sync_cover<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    url: Option<String>,
) -> AppResult<()> {
    Products::update_many()
        .col_expr(ProdCol::ImageUrl, Expr::value(url))
        .col_expr(ProdCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(ProdCol::Id.eq(product_id))
        .exec(conn)
        .await?;
    Ok(())
}
