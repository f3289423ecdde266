use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    /// `(page, per_page, offset)` with page >= 1 and per_page in 1..=100.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

/// `%term%` for ILIKE, with `\`, `%` and `_` in the term matched literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// Query strings stay flat: serde_urlencoded cannot parse numbers through
// `#[serde(flatten)]`, so pagination fields are repeated per query type.

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub category_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct LowStockQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub threshold: Option<i32>,
}

impl LowStockQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        assert_eq!(Pagination::new(Some(3), Some(10)).normalize(), (3, 10, 20));
        assert_eq!(Pagination::new(Some(0), Some(500)).normalize(), (1, 100, 0));
        assert_eq!(Pagination::new(Some(-4), Some(0)).normalize(), (1, 1, 0));
    }

    #[test]
    fn huge_page_saturates_offset() {
        assert_eq!(
            Pagination::new(Some(i64::MAX), Some(100)).normalize(),
            (i64::MAX, 100, i64::MAX)
        );
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rice"), "%rice%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn query_strings_parse_numbers_and_enums() {
        let query: ProductQuery = parse_query(
            "page=2&per_page=5&min_price=100&sort_by=price&sort_order=asc&in_stock=true",
        );
        assert_eq!(query.pagination().normalize(), (2, 5, 5));
        assert_eq!(query.min_price, Some(100));
        assert!(matches!(query.sort_by, Some(ProductSortBy::Price)));
        assert_eq!(query.in_stock, Some(true));

        let orders: OrderListQuery = parse_query("status=shipped");
        assert_eq!(orders.status, Some(OrderStatus::Shipped));
    }

    fn parse_query<T: serde::de::DeserializeOwned>(raw: &str) -> T {
        let uri: axum::http::Uri = format!("/?{raw}").parse().unwrap();
        axum::extract::Query::<T>::try_from_uri(&uri).unwrap().0
    }
}
