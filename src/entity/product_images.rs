use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::models::ProductImage;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductImage {
    fn from(model: Model) -> Self {
        ProductImage {
            id: model.id,
            product_id: model.product_id,
            image_url: model.image_url,
            alt_text: model.alt_text,
            is_primary: model.is_primary,
            sort_order: model.sort_order,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
