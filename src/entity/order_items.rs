use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::models::OrderItem;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_per_unit: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderItem {
    fn from(model: Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price_per_unit: model.price_per_unit,
            // Stored lines were bounded by checkout's checked totals.
            line_total: model.price_per_unit.saturating_mul(i64::from(model.quantity)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
