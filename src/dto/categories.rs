use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Category;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct CategoryQuery {
    pub q: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
