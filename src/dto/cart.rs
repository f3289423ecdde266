use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 10_000, message = "quantity must be between 1 and 10000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartQuantityRequest {
    /// Zero or less removes the line.
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub item_count: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct StockIssue {
    pub product_id: Uuid,
    pub name: String,
    pub requested: i32,
    pub available: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartValidation {
    pub valid: bool,
    pub issues: Vec<StockIssue>,
}
