use serde::Serialize;

/// Request payload for creating or replacing a product. Built from form
/// fields at submit time and dropped once the response is rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub stock: i32,
    pub price: f64,
}

impl NewProduct {
    /// Returns `None` when any numeric field is empty or not a number; the
    /// submission is then dropped without a request.
    pub fn from_fields(
        name: &str,
        category: &str,
        quantity: &str,
        stock: &str,
        price: &str,
    ) -> Option<Self> {
        Some(Self {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            quantity: parse_int(quantity)?,
            stock: parse_int(stock)?,
            price: parse_price(price)?,
        })
    }
}

pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text that ends up as a single path segment. `.` and `..` are refused since
/// URL normalization would turn them into a different endpoint.
pub fn path_value(raw: &str) -> Option<String> {
    non_empty(raw).filter(|v| !is_dot_segment(v))
}

pub fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}

pub fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

// "NaN" and "inf" parse as f64 but are not prices.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
