use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Product, ProductImage};

/// 10 crore rupees in paise.
pub const MAX_PRICE: i64 = 10_000_000_000;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    #[validate(range(min = 1, max = MAX_PRICE, message = "must be between 1 and 10000000000"))]
    pub price: i64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub stock: i32,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 1, max = MAX_PRICE, message = "must be between 1 and 10000000000"))]
    pub price: Option<i64>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductImageRequest {
    #[validate(url(message = "must be a valid URL"), length(max = 2048))]
    pub image_url: String,
    #[validate(length(max = 255))]
    pub alt_text: Option<String>,
    /// The first image of a product is primary regardless.
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub sort_order: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductImageList {
    #[schema(value_type = Vec<ProductImage>)]
    pub items: Vec<ProductImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_price_and_negative_stock() {
        let req = CreateProductRequest {
            name: "Basmati Rice".into(),
            description: None,
            category_id: Uuid::new_v4(),
            price: 0,
            unit: "kg".into(),
            stock: -1,
            image_url: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        assert!(errors.field_errors().contains_key("stock"));
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = UpdateProductRequest {
            price: Some(2_500),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn price_is_capped() {
        let patch = UpdateProductRequest {
            price: Some(MAX_PRICE + 1),
            ..Default::default()
        };
        assert!(patch.validate().unwrap_err().field_errors().contains_key("price"));

        let patch = UpdateProductRequest {
            price: Some(i64::MAX),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UpdateProductRequest {
            price: Some(MAX_PRICE),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn image_needs_a_url_and_defaults_flags() {
        let req: CreateProductImageRequest =
            serde_json::from_str(r#"{"image_url":"https://cdn.example.com/rice.jpg"}"#).unwrap();
        assert!(!req.is_primary);
        assert_eq!(req.sort_order, 0);
        assert!(req.validate().is_ok());

        let req: CreateProductImageRequest =
            serde_json::from_str(r#"{"image_url":"rice.jpg","sort_order":-1}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("image_url"));
        assert!(errors.field_errors().contains_key("sort_order"));
    }
}
