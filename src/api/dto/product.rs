//! Product-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::CategorySummaryResponse;
use super::user::UserSummaryResponse;
use super::{format_datetime, parse_object_id};
use crate::error::AppResult;
use crate::models::{Product, ProductSummary, ProductView};
use crate::services::{CreateProductData, UpdateProductData};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a product.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: i64,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category_id: String,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

impl CreateProductRequest {
    pub fn into_data(self) -> AppResult<CreateProductData> {
        Ok(CreateProductData {
            category_id: parse_object_id(&self.category_id, "categoryId")?,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            in_stock: self.in_stock.unwrap_or(true),
            image: self.image,
        })
    }
}

/// Request body for updating a product; only supplied fields change.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: Option<i64>,
    pub category_id: Option<String>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

impl UpdateProductRequest {
    pub fn into_data(self) -> AppResult<UpdateProductData> {
        let category_id = self
            .category_id
            .map(|id| parse_object_id(&id, "categoryId"))
            .transpose()?;

        Ok(UpdateProductData {
            category_id,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            in_stock: self.in_stock,
            image: self.image,
        })
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: String,
    pub created_by_id: String,
    pub price: f64,
    pub quantity: i64,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            label: product.label,
            description: product.description,
            category_id: product.category_id.to_hex(),
            created_by_id: product.created_by_id.to_hex(),
            price: product.price,
            quantity: product.quantity,
            in_stock: product.in_stock,
            image: product.image,
            created_at: format_datetime(product.created_at),
            updated_at: format_datetime(product.updated_at),
        }
    }
}

/// Product with its expanded relations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummaryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummaryResponse>,
}

impl From<ProductView> for ProductViewResponse {
    fn from(view: ProductView) -> Self {
        Self {
            product: ProductResponse::from(view.product),
            category: view.category.map(CategorySummaryResponse::from),
            created_by: view.created_by.map(UserSummaryResponse::from),
        }
    }
}

/// Product summary attached to expanded categories.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(summary: ProductSummary) -> Self {
        Self {
            id: summary.id.to_hex(),
            name: summary.name,
            description: summary.description,
            price: summary.price,
            in_stock: summary.in_stock,
            image: summary.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_create_request_rejects_negative_price() {
        let request = CreateProductRequest {
            name: "Trowel".to_string(),
            description: None,
            price: -1.0,
            quantity: 3,
            category_id: "652f1a2b3c4d5e6f70818283".to_string(),
            image: None,
            in_stock: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn test_create_request_invalid_category_id() {
        let request = CreateProductRequest {
            name: "Trowel".to_string(),
            description: None,
            price: 9.5,
            quantity: 3,
            category_id: "not-an-object-id".to_string(),
            image: None,
            in_stock: None,
        };
        assert!(matches!(
            request.into_data(),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_create_request_defaults_in_stock() {
        let request = CreateProductRequest {
            name: "Trowel".to_string(),
            description: None,
            price: 9.5,
            quantity: 3,
            category_id: "652f1a2b3c4d5e6f70818283".to_string(),
            image: None,
            in_stock: None,
        };
        let data = request.into_data().unwrap();
        assert!(data.in_stock);
    }
}
