use mongodb::bson::{DateTime, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::category::CategorySummary;
use super::user::UserSummary;

/// Product document. References its category and creator by id; `label` is
/// the unique slug derived from `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: ObjectId,
    pub created_by_id: ObjectId,
    pub price: f64,
    pub quantity: i64,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        label: String,
        description: Option<String>,
        category_id: ObjectId,
        created_by_id: ObjectId,
        price: f64,
        quantity: i64,
        in_stock: bool,
        image: Option<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name,
            label,
            description,
            category_id,
            created_by_id,
            price,
            quantity,
            in_stock,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product together with its expanded category and creator summaries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummary>,
}

impl ProductView {
    /// A bare view with no relations resolved (optimized reads).
    pub fn plain(product: Product) -> Self {
        Self {
            product,
            category: None,
            created_by: None,
        }
    }
}

/// Projected view of a product used in category previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductSummary {
    pub fn fields() -> mongodb::bson::Document {
        doc! { "name": 1, "description": 1, "price": 1, "inStock": 1, "image": 1 }
    }
}
