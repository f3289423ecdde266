use std::sync::LazyLock;

use regex::Regex;

pub mod admin;
pub mod areas;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

/// Ten-digit phone number without country prefix.
pub(crate) static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Six-digit postal index number.
pub(crate) static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid pincode regex"));
