//! List-query parameters shared by the collection endpoints.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::repositories::{PageOptions, SortOrder};
use crate::services::QueryOptions;

/// Default page size when none (or zero) is requested.
const DEFAULT_LIMIT: i64 = 10;

/// Raw query-string surface of every list endpoint:
/// `{limit, offset, search, category, inStock, role, sortBy, sortOrder,
/// isActive}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub is_active: Option<bool>,
}

impl ListQuery {
    /// Pagination inputs with defaults `limit=10`, `offset=0`.
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            limit: Some(self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)),
            offset: self.offset.unwrap_or(0),
        }
    }

    /// Filter and ordering inputs with defaults `sortBy=createdAt`,
    /// `sortOrder=desc`. Unparseable category ids and roles are ignored
    /// rather than rejected.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            search: self.search.clone(),
            category: self
                .category
                .as_deref()
                .and_then(|id| ObjectId::parse_str(id).ok()),
            in_stock: self.in_stock,
            role: self.role.as_deref().and_then(|role| role.parse().ok()),
            is_active: self.is_active,
            sort_by: Some(
                self.sort_by
                    .clone()
                    .unwrap_or_else(|| "createdAt".to_string()),
            ),
            sort_order: self
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_defaults() {
        let query = ListQuery::default();
        let page = query.page_options();
        assert_eq!(page.limit, Some(10));
        assert_eq!(page.offset, 0);

        let options = query.query_options();
        assert_eq!(options.sort_by.as_deref(), Some("createdAt"));
        assert_eq!(options.sort_order, SortOrder::Desc);
        assert!(options.search.is_none());
    }

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        let query = ListQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.page_options().limit, Some(10));
    }

    #[test]
    fn test_explicit_values() {
        let query = ListQuery {
            limit: Some(25),
            offset: Some(50),
            sort_by: Some("name".to_string()),
            sort_order: Some("asc".to_string()),
            role: Some("admin".to_string()),
            is_active: Some(true),
            ..Default::default()
        };

        let page = query.page_options();
        assert_eq!(page.limit, Some(25));
        assert_eq!(page.offset, 50);

        let options = query.query_options();
        assert_eq!(options.sort_by.as_deref(), Some("name"));
        assert_eq!(options.sort_order, SortOrder::Asc);
        assert_eq!(options.role, Some(Role::Admin));
        assert_eq!(options.is_active, Some(true));
    }

    #[test]
    fn test_invalid_category_and_role_are_ignored() {
        let query = ListQuery {
            category: Some("garbage".to_string()),
            role: Some("superuser".to_string()),
            ..Default::default()
        };
        let options = query.query_options();
        assert!(options.category.is_none());
        assert!(options.role.is_none());
    }

    #[test]
    fn test_valid_category_id_parses() {
        let query = ListQuery {
            category: Some("652f1a2b3c4d5e6f70818283".to_string()),
            ..Default::default()
        };
        assert!(query.query_options().category.is_some());
    }
}
