use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Order, OrderItem, OrderStatus};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CheckoutRequest {
    /// Delivery address chosen from the customer's saved areas.
    pub area_id: Uuid,
    #[validate(length(min = 1, max = 30))]
    pub payment_method: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct PayOrderRequest {
    #[validate(length(min = 1, max = 30))]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResult {
    pub orders: Vec<OrderWithItems>,
    pub grand_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
