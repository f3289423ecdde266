use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::models::Area;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "areas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub area_name: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Area {
    fn from(model: Model) -> Self {
        Area {
            id: model.id,
            customer_id: model.customer_id,
            area_name: model.area_name,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
