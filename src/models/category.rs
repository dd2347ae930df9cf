use mongodb::bson::{DateTime, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::product::ProductSummary;
use super::user::UserSummary;

/// Product category document. `label` is the URL-safe slug derived from
/// `name`; it is unique across categories and recomputed only when the name
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Category {
    pub fn new(
        name: String,
        label: String,
        description: Option<String>,
        created_by_id: ObjectId,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name,
            label,
            description,
            is_active: true,
            created_by_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category together with its expanded relations: creator summary, a capped
/// preview of its products and the total product count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
}

impl CategoryView {
    /// A bare view with no relations resolved (optimized reads).
    pub fn plain(category: Category) -> Self {
        Self {
            category,
            created_by: None,
            products: None,
            product_count: None,
        }
    }
}

/// Projected view of a category used when expanding product references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategorySummary {
    pub fn fields() -> mongodb::bson::Document {
        doc! { "name": 1, "description": 1 }
    }
}
