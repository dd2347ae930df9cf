//! Generic repository over one document collection.
//!
//! Centralizes the query shaping every entity service needs: filtering,
//! projection, sorting, pagination arithmetic, slug-uniqueness guards and
//! session-aware single-document operations. Relation expansion is performed
//! by the entity services as an explicit fetch step after the primary query,
//! driven by the [`Relation`] descriptors defined here.

use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{ClientSession, Collection};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::db::Store;
use crate::error::{AppError, AppResult};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }

    /// Anything that is not explicitly ascending sorts descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Pagination inputs. `limit == None` disables pagination entirely and the
/// query returns a plain ordered sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub limit: Option<i64>,
    pub offset: u64,
}

/// Pagination metadata attached to a paged listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub items_per_page: i64,
    pub current_page: u64,
    pub total_pages: u64,
}

/// Computes pagination metadata for a page of results.
///
/// `current_page = ceil(offset / limit) + 1`,
/// `total_pages = ceil(total_items / limit)`.
pub fn paginate(total_items: u64, offset: u64, limit: i64) -> Pagination {
    let per_page = limit.max(1) as u64;
    Pagination {
        total_items,
        items_per_page: limit,
        current_page: offset.div_ceil(per_page) + 1,
        total_pages: total_items.div_ceil(per_page),
    }
}

/// Result of a list query: a plain ordered sequence when no page limit was
/// requested, or one page of items plus pagination metadata.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paginated { items: Vec<T>, pagination: Pagination },
}

impl<T> Listing<T> {
    /// Applies `f` to every item, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Listing::Plain(items) => Listing::Plain(items.into_iter().map(f).collect()),
            Listing::Paginated { items, pagination } => Listing::Paginated {
                items: items.into_iter().map(f).collect(),
                pagination,
            },
        }
    }
}

/// Declarative relation-expansion descriptor: which reference path to
/// resolve, which fields of the referenced documents to project, an optional
/// match filter and a cap on the number of resolved documents.
#[derive(Debug, Clone)]
pub struct Relation {
    pub path: &'static str,
    pub fields: Option<Document>,
    pub filter: Option<Document>,
    pub limit: Option<i64>,
}

impl Relation {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            fields: None,
            filter: None,
            limit: None,
        }
    }

    pub fn fields(mut self, fields: Document) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn filter(mut self, filter: Document) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for find-style queries.
#[derive(Debug, Clone, Default)]
pub struct FindAllOptions {
    pub filter: Document,
    /// Field projection applied to the returned documents.
    pub fields: Option<Document>,
    pub page: PageOptions,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// Skip relation expansion and return plain records.
    pub optimized: bool,
}

impl FindAllOptions {
    pub fn with_filter(filter: Document) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Builds a case-insensitive pattern match for free-text search filters.
pub fn case_insensitive(term: &str) -> Bson {
    Bson::RegularExpression(mongodb::bson::Regex {
        pattern: term.to_string(),
        options: "i".to_string(),
    })
}

/// Uniform query/mutation surface over one entity collection.
///
/// Holds the entity display name for error messages and a [`Store`] handle
/// for session management. Cloning is cheap; both the collection handle and
/// the store are reference-counted internally.
#[derive(Clone)]
pub struct Repository<T: Send + Sync> {
    entity_name: &'static str,
    collection: Collection<T>,
    store: Store,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(store: &Store, entity_name: &'static str, collection_name: &str) -> Self {
        Self {
            entity_name,
            collection: store.collection(collection_name),
            store: store.clone(),
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    /// Raw collection handle, for callers that need driver-level access
    /// (aggregations, retyped projections).
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Counts documents matching the filter. No side effects.
    pub async fn count(&self, filter: Document) -> AppResult<u64> {
        self.collection
            .count_documents(filter)
            .await
            .map_err(|e| AppError::database(format!("count {}", self.entity_name), e))
    }

    /// Retrieves documents matching the options.
    ///
    /// Returns a plain sequence when no page limit is set; otherwise fetches
    /// one page plus the total matching count for pagination metadata.
    pub async fn find_all(&self, options: FindAllOptions) -> AppResult<Listing<T>> {
        let FindAllOptions {
            filter,
            fields,
            page,
            sort_by,
            sort_order,
            ..
        } = options;

        let sort = sort_by.map(|key| {
            let mut sort = Document::new();
            sort.insert(key, sort_order.as_i32());
            sort
        });
        let mut find_options = FindOptions::builder()
            .projection(fields)
            .sort(sort)
            .build();
        if let Some(limit) = page.limit {
            find_options.limit = Some(limit);
            find_options.skip = Some(page.offset);
        }

        let cursor = self
            .collection
            .find(filter.clone())
            .with_options(find_options)
            .await
            .map_err(|e| AppError::database(format!("find {}", self.entity_name), e))?;
        let items: Vec<T> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::database(format!("collect {}", self.entity_name), e))?;

        match page.limit {
            None => Ok(Listing::Plain(items)),
            Some(limit) => {
                let total_items = self.count(filter).await?;
                Ok(Listing::Paginated {
                    items,
                    pagination: paginate(total_items, page.offset, limit),
                })
            }
        }
    }

    /// Retrieves a single document; absence is not an error.
    pub async fn find_one(
        &self,
        options: FindAllOptions,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<T>> {
        let find_options = FindOneOptions::builder().projection(options.fields).build();
        let action = self.collection.find_one(options.filter).with_options(find_options);

        let result = match session {
            Some(session) => action.session(session).await,
            None => action.await,
        };

        result.map_err(|e| AppError::database(format!("find {}", self.entity_name), e))
    }

    /// Retrieves a single document or fails with `NotFound` naming the
    /// entity type.
    pub async fn find_one_or_error(
        &self,
        options: FindAllOptions,
        session: Option<&mut ClientSession>,
    ) -> AppResult<T> {
        self.find_one(options, session).await?.ok_or_else(|| {
            AppError::not_found(format!(
                "This {} record could not be found",
                self.entity_name.to_lowercase()
            ))
        })
    }

    /// Removes and returns the first document matching the filter; fails
    /// with `NotFound` when nothing matched.
    pub async fn delete_one(
        &self,
        filter: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<T> {
        let action = self.collection.find_one_and_delete(filter);

        let result = match session {
            Some(session) => action.session(session).await,
            None => action.await,
        };

        result
            .map_err(|e| AppError::database(format!("delete {}", self.entity_name), e))?
            .ok_or_else(|| AppError::not_found(format!("{} not found", self.entity_name)))
    }

    /// Duplicate-name guard: fails with `Conflict` when a document already
    /// carries the given slug. `exclude` skips one document, for updates
    /// that re-derive their own label.
    pub async fn check_label(&self, label: &str, exclude: Option<ObjectId>) -> AppResult<()> {
        let mut filter = doc! { "label": label };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }

        if self.count(filter).await? > 0 {
            return Err(AppError::conflict(format!(
                "{} with this name already exists",
                self.entity_name
            )));
        }

        Ok(())
    }

    /// Inserts a new document.
    pub async fn insert(&self, entity: &T) -> AppResult<()> {
        self.collection
            .insert_one(entity)
            .await
            .map(|_| ())
            .map_err(|e| AppError::database(format!("insert {}", self.entity_name), e))
    }

    /// Replaces the document matching the filter with `entity`, optionally
    /// inside a session.
    pub async fn replace(
        &self,
        filter: Document,
        entity: &T,
        session: Option<&mut ClientSession>,
    ) -> AppResult<()> {
        let action = self.collection.replace_one(filter, entity);

        let result = match session {
            Some(session) => action.session(session).await,
            None => action.await,
        };

        result
            .map(|_| ())
            .map_err(|e| AppError::database(format!("replace {}", self.entity_name), e))
    }

    /// Applies an update document to the first match.
    pub async fn update_one(&self, filter: Document, update: Document) -> AppResult<()> {
        self.collection
            .update_one(filter, update)
            .await
            .map(|_| ())
            .map_err(|e| AppError::database(format!("update {}", self.entity_name), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pagination_first_page() {
        let pagination = paginate(25, 0, 10);
        assert_eq!(pagination.total_items, 25);
        assert_eq!(pagination.items_per_page, 10);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_pagination_third_page() {
        let pagination = paginate(25, 20, 10);
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_pagination_exact_fit() {
        let pagination = paginate(20, 10, 10);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 2);
    }

    #[test]
    fn test_pagination_empty_result() {
        let pagination = paginate(0, 0, 10);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 0);
    }

    #[test]
    fn test_pagination_misaligned_offset() {
        // ceil(5 / 10) + 1 == 2
        let pagination = paginate(25, 5, 10);
        assert_eq!(pagination.current_page, 2);
    }

    proptest! {
        /// Page arithmetic never overflows or produces a page below 1, and
        /// every item fits inside the reported page count.
        #[test]
        fn prop_pagination_is_consistent(
            total in 0u64..100_000,
            offset in 0u64..100_000,
            limit in 1i64..1_000,
        ) {
            let pagination = paginate(total, offset, limit);
            prop_assert!(pagination.current_page >= 1);
            prop_assert_eq!(pagination.total_pages, total.div_ceil(limit as u64));
            prop_assert!(pagination.total_pages * (limit as u64) >= total);
        }
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("anything"), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.as_i32(), 1);
        assert_eq!(SortOrder::Desc.as_i32(), -1);
    }

    #[test]
    fn test_listing_map_keeps_pagination() {
        let listing = Listing::Paginated {
            items: vec![1, 2, 3],
            pagination: paginate(3, 0, 10),
        };
        let mapped = listing.map(|n| n * 2);
        match mapped {
            Listing::Paginated { items, pagination } => {
                assert_eq!(items, vec![2, 4, 6]);
                assert_eq!(pagination.total_items, 3);
            }
            Listing::Plain(_) => panic!("expected paginated listing"),
        }
    }

    #[test]
    fn test_listing_serializes_untagged() {
        let plain: Listing<i32> = Listing::Plain(vec![1, 2]);
        assert_eq!(serde_json::to_value(&plain).unwrap(), serde_json::json!([1, 2]));

        let paged: Listing<i32> = Listing::Paginated {
            items: vec![1],
            pagination: paginate(1, 0, 10),
        };
        let value = serde_json::to_value(&paged).unwrap();
        assert_eq!(value["pagination"]["totalItems"], 1);
        assert_eq!(value["pagination"]["currentPage"], 1);
    }

    #[test]
    fn test_relation_builder() {
        let relation = Relation::new("createdBy")
            .fields(doc! { "fullName": 1 })
            .limit(5);
        assert_eq!(relation.path, "createdBy");
        assert_eq!(relation.limit, Some(5));
        assert!(relation.filter.is_none());
    }

    #[test]
    fn test_case_insensitive_regex() {
        match case_insensitive("phone") {
            Bson::RegularExpression(regex) => {
                assert_eq!(regex.pattern, "phone");
                assert_eq!(regex.options, "i");
            }
            other => panic!("expected regex, got {other:?}"),
        }
    }
}
