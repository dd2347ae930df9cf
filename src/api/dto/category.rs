//! Category-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::format_datetime;
use super::product::ProductSummaryResponse;
use super::user::UserSummaryResponse;
use crate::models::{Category, CategorySummary, CategoryView};
use crate::services::UpsertCategoryData;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// Request body for updating a category; only supplied fields change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn into_data(self) -> UpsertCategoryData {
        UpsertCategoryData {
            name: self.name,
            description: self.description,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_hex(),
            name: category.name,
            label: category.label,
            description: category.description,
            is_active: category.is_active,
            created_by_id: category.created_by_id.to_hex(),
            created_at: format_datetime(category.created_at),
            updated_at: format_datetime(category.updated_at),
        }
    }
}

/// Category with its expanded relations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryViewResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummaryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummaryResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
}

impl From<CategoryView> for CategoryViewResponse {
    fn from(view: CategoryView) -> Self {
        Self {
            category: CategoryResponse::from(view.category),
            created_by: view.created_by.map(UserSummaryResponse::from),
            products: view
                .products
                .map(|products| products.into_iter().map(ProductSummaryResponse::from).collect()),
            product_count: view.product_count,
        }
    }
}

/// Category summary attached to expanded products.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<CategorySummary> for CategorySummaryResponse {
    fn from(summary: CategorySummary) -> Self {
        Self {
            id: summary.id.to_hex(),
            name: summary.name,
            description: summary.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_view_response_flattens_category_fields() {
        let category = Category::new(
            "Garden Tools".to_string(),
            "garden-tools".to_string(),
            None,
            ObjectId::new(),
        );
        let view = CategoryView {
            category,
            created_by: None,
            products: Some(Vec::new()),
            product_count: Some(0),
        };

        let json = serde_json::to_value(CategoryViewResponse::from(view)).unwrap();
        assert_eq!(json["name"], "Garden Tools");
        assert_eq!(json["label"], "garden-tools");
        assert_eq!(json["productCount"], 0);
        assert!(json["products"].as_array().unwrap().is_empty());
    }
}
