//! Pricing arithmetic shared by the cart view and checkout.
//!
//! Amounts are integer minor units. Nothing here touches the database, so
//! the totals a customer sees in the cart and the totals written to orders
//! come from the same functions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Area,
};

/// One priced cart line, detached from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub unit_price: i64,
    pub quantity: i32,
}

impl PricedLine {
    pub fn total(&self) -> AppResult<i64> {
        line_total(self.unit_price, self.quantity)
    }
}

/// Lines belonging to one seller, as they will become one order.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerBatch {
    pub seller_id: Uuid,
    pub lines: Vec<PricedLine>,
    pub total: i64,
}

fn amount_too_large() -> AppError {
    AppError::BadRequest("Order amount is too large".into())
}

/// `unit_price * quantity`, rejected instead of wrapping when it leaves i64.
pub fn line_total(unit_price: i64, quantity: i32) -> AppResult<i64> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(amount_too_large)
}

pub fn cart_total(lines: &[PricedLine]) -> AppResult<i64> {
    lines.iter().try_fold(0_i64, |sum, line| {
        sum.checked_add(line.total()?).ok_or_else(amount_too_large)
    })
}

/// Number of units across all lines.
pub fn item_count(lines: &[PricedLine]) -> i64 {
    lines.iter().map(|line| i64::from(line.quantity)).sum()
}

/// Group lines by seller, ordered by seller id so checkout is deterministic.
pub fn split_by_seller(lines: &[PricedLine]) -> AppResult<Vec<SellerBatch>> {
    let mut grouped: BTreeMap<Uuid, Vec<PricedLine>> = BTreeMap::new();
    for line in lines {
        grouped.entry(line.seller_id).or_default().push(line.clone());
    }

    grouped
        .into_iter()
        .map(|(seller_id, lines)| {
            let total = cart_total(&lines)?;
            Ok(SellerBatch {
                seller_id,
                lines,
                total,
            })
        })
        .collect()
}

pub fn build_invoice_number(order_id: Uuid, date: NaiveDate) -> String {
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date.format("%Y%m%d"), &suffix[..8])
}

pub fn format_delivery_address(area: &Area) -> String {
    format!(
        "{}, {}, {} - {}",
        area.area_name, area.city, area.state, area.pincode
    )
}
