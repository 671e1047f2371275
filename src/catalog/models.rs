use serde::{Deserialize, Serialize};
use sqlx::types::chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::Id;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct ProductType {
    pub id: Id,
    pub name: String,
}

/// A size name is only meaningful within its product type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: Id,
    pub product_type_id: Id,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: Id,
    pub name: String,
    pub hex_code: String,
}

/// One logical item; its color variants are the products referencing it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct ProductGroup {
    pub id: Id,
    pub slug: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ProductTypeWithSizes {
    pub id: Id,
    pub name: String,
    pub sizes: Vec<Size>,
}

/// A single purchasable variant with every attribute reference resolved.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: ProductType,
    pub size: Size,
    pub color: Color,
    pub product_group: ProductGroup,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailableColor {
    pub product_id: Id,
    pub name: String,
    pub hex_code: String,
}

/// Listing entry: the group's representative variant, flattened, plus the
/// color of every member. Derived per request, never persisted.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GroupedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub available_colors: Vec<AvailableColor>,
}

/// Create/update payload. Attributes arrive as human-entered names and are
/// resolved against the reference catalogs before anything is written.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct Dependencies {
    pub categories: Vec<Category>,
    pub types: Vec<ProductTypeWithSizes>,
    pub colors: Vec<Color>,
    pub groups: Vec<ProductGroup>,
}
