use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::models::{Order, OrderStatus, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub seller_id: Uuid,
    pub area_id: Option<Uuid>,
    pub delivery_address: String,
    pub total_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn order_status(&self) -> OrderStatus {
        OrderStatus::parse(&self.status).unwrap_or(OrderStatus::Pending)
    }

    pub fn payment(&self) -> PaymentStatus {
        PaymentStatus::parse(&self.payment_status).unwrap_or(PaymentStatus::Unpaid)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id"
    )]
    Seller,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        let status = model.order_status();
        let payment_status = model.payment();
        Order {
            id: model.id,
            customer_id: model.customer_id,
            seller_id: model.seller_id,
            area_id: model.area_id,
            delivery_address: model.delivery_address,
            total_amount: model.total_amount,
            status,
            payment_status,
            payment_method: model.payment_method,
            invoice_number: model.invoice_number,
            paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
