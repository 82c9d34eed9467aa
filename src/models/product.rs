use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog list filters. All optional and AND-composed; `category=all` is a
/// sentinel for "no category filter".
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
}

/// Raw multipart fields for product create/update. Price stays a string until
/// validation so a non-numeric value surfaces as a field error rather than a
/// deserialization failure.
#[derive(Debug, Default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Validated product fields, price parsed.
#[derive(Debug)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
}
