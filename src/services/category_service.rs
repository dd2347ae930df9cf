//! Category catalog: listing with expanded relations, transactional
//! mutations and slug upkeep.

use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::ClientSession;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::options::FindOptions;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryView, Product, ProductSummary, User, UserSummary};
use crate::repositories::base::case_insensitive;
use crate::repositories::{FindAllOptions, Listing, PageOptions, Relation, Repository};
use crate::services::QueryOptions;
use crate::utils::slug;

/// How many products a category preview carries.
const PRODUCT_PREVIEW_LIMIT: i64 = 5;

/// Partial category payload; `name` is required on create, optional on
/// update.
#[derive(Debug, Clone, Default)]
pub struct UpsertCategoryData {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Category service.
#[derive(Clone)]
pub struct CategoryService {
    repo: Repository<Category>,
    users: Repository<User>,
    products: Repository<Product>,
}

impl CategoryService {
    pub fn new(
        repo: Repository<Category>,
        users: Repository<User>,
        products: Repository<Product>,
    ) -> Self {
        Self {
            repo,
            users,
            products,
        }
    }

    /// The relation set every category read expands: creator summary, a
    /// capped product preview and the total product count.
    fn default_relations() -> Vec<Relation> {
        vec![
            Relation::new("createdBy").fields(UserSummary::fields()),
            Relation::new("products")
                .fields(ProductSummary::fields())
                .limit(PRODUCT_PREVIEW_LIMIT),
            Relation::new("productCount"),
        ]
    }

    /// Lists categories. A search term matches name, label and description;
    /// otherwise the active flag filters directly.
    pub async fn get_all(
        &self,
        page: PageOptions,
        query: QueryOptions,
    ) -> AppResult<Listing<CategoryView>> {
        let mut filter = Document::new();
        if let Some(is_active) = query.is_active {
            filter.insert("isActive", is_active);
        }

        if let Some(search) = &query.search {
            filter = doc! {
                "$or": [
                    { "name": case_insensitive(search) },
                    { "label": case_insensitive(search) },
                    { "description": case_insensitive(search) },
                ]
            };
        }

        let options = FindAllOptions {
            filter,
            page,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            ..Default::default()
        };
        let optimized = options.optimized;
        let listing = self.repo.find_all(options).await?;

        let relations = if optimized {
            Vec::new()
        } else {
            Self::default_relations()
        };
        match listing {
            Listing::Plain(items) => Ok(Listing::Plain(self.expand(items, &relations).await?)),
            Listing::Paginated { items, pagination } => Ok(Listing::Paginated {
                items: self.expand(items, &relations).await?,
                pagination,
            }),
        }
    }

    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<CategoryView> {
        let category = self
            .repo
            .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": id }), None)
            .await?;

        let mut views = self
            .expand(vec![category], &Self::default_relations())
            .await?;
        views.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("relation expansion dropped the record"),
        })
    }

    /// Creates a category stamped with its creator. The derived slug must
    /// be unique, checked before the write.
    pub async fn create(
        &self,
        created_by: ObjectId,
        name: String,
        description: Option<String>,
    ) -> AppResult<Category> {
        let label = slug::get_label(&name);
        self.repo.check_label(&label, None).await?;

        let category = Category::new(name, label, description, created_by);
        self.repo.insert(&category).await?;

        Ok(category)
    }

    /// Updates a category inside a transaction when the deployment supports
    /// one; a failure aborts and re-raises.
    pub async fn update(&self, id: ObjectId, data: UpsertCategoryData) -> AppResult<Category> {
        if !self.repo.store().supports_transactions() {
            return self.apply_update(id, data, None).await;
        }

        let mut session = self.repo.store().start_session().await?;
        session.start_transaction().await?;

        match self.apply_update(id, data, Some(&mut session)).await {
            Ok(category) => {
                session.commit_transaction().await?;
                Ok(category)
            }
            Err(error) => {
                let _ = session.abort_transaction().await;
                Err(error)
            }
        }
    }

    async fn apply_update(
        &self,
        id: ObjectId,
        data: UpsertCategoryData,
        mut session: Option<&mut ClientSession>,
    ) -> AppResult<Category> {
        let mut category = self
            .repo
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "_id": id }),
                session.as_deref_mut(),
            )
            .await?;

        if let Some(name) = data.name {
            // The slug is recomputed only when the name actually changes.
            if name != category.name {
                let label = slug::get_label(&name);
                self.repo.check_label(&label, Some(id)).await?;
                category.label = label;
            }
            category.name = name;
        }
        if let Some(description) = data.description {
            category.description = Some(description);
        }
        category.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": id }, &category, session)
            .await?;

        Ok(category)
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<Category> {
        self.repo.delete_one(doc! { "_id": id }, None).await
    }

    /// Inverts the active flag exactly once, transactionally where
    /// supported.
    pub async fn toggle_status(&self, id: ObjectId) -> AppResult<Category> {
        if !self.repo.store().supports_transactions() {
            return self.apply_toggle(id, None).await;
        }

        let mut session = self.repo.store().start_session().await?;
        session.start_transaction().await?;

        match self.apply_toggle(id, Some(&mut session)).await {
            Ok(category) => {
                session.commit_transaction().await?;
                Ok(category)
            }
            Err(error) => {
                let _ = session.abort_transaction().await;
                Err(error)
            }
        }
    }

    async fn apply_toggle(
        &self,
        id: ObjectId,
        mut session: Option<&mut ClientSession>,
    ) -> AppResult<Category> {
        let mut category = self
            .repo
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "_id": id }),
                session.as_deref_mut(),
            )
            .await?;

        category.is_active = !category.is_active;
        category.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": id }, &category, session)
            .await?;

        Ok(category)
    }

    /// Resolves the requested relations with batched follow-up queries: one
    /// `$in` fetch for creators, one grouped aggregation for product
    /// previews and counts.
    async fn expand(
        &self,
        categories: Vec<Category>,
        relations: &[Relation],
    ) -> AppResult<Vec<CategoryView>> {
        let mut views: Vec<CategoryView> = categories.into_iter().map(CategoryView::plain).collect();
        if views.is_empty() || relations.is_empty() {
            return Ok(views);
        }

        if let Some(relation) = relations.iter().find(|r| r.path == "createdBy") {
            self.attach_creators(&mut views, relation).await?;
        }

        let preview = relations.iter().find(|r| r.path == "products");
        let wants_count = relations.iter().any(|r| r.path == "productCount");
        if preview.is_some() || wants_count {
            self.attach_products(&mut views, preview, wants_count).await?;
        }

        Ok(views)
    }

    async fn attach_creators(
        &self,
        views: &mut [CategoryView],
        relation: &Relation,
    ) -> AppResult<()> {
        let creator_ids: Vec<ObjectId> = views.iter().map(|v| v.category.created_by_id).collect();
        let mut filter = doc! { "_id": { "$in": creator_ids } };
        if let Some(extra) = &relation.filter {
            filter.extend(extra.clone());
        }

        let options = FindOptions::builder()
            .projection(relation.fields.clone())
            .build();
        let creators: Vec<UserSummary> = self
            .users
            .collection()
            .clone_with_type::<UserSummary>()
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::database("expand category creators", e))?
            .try_collect()
            .await
            .map_err(|e| AppError::database("expand category creators", e))?;

        let by_id: HashMap<ObjectId, UserSummary> =
            creators.into_iter().map(|u| (u.id, u)).collect();
        for view in views.iter_mut() {
            view.created_by = by_id.get(&view.category.created_by_id).cloned();
        }

        Ok(())
    }

    async fn attach_products(
        &self,
        views: &mut [CategoryView],
        preview: Option<&Relation>,
        wants_count: bool,
    ) -> AppResult<()> {
        #[derive(Debug, Deserialize)]
        struct GroupedProducts {
            #[serde(rename = "_id")]
            category_id: ObjectId,
            count: u64,
            products: Vec<ProductSummary>,
        }

        let ids: Vec<ObjectId> = views.iter().map(|v| v.category.id).collect();
        let limit = preview
            .and_then(|r| r.limit)
            .unwrap_or(PRODUCT_PREVIEW_LIMIT);

        // The preview's projection drives which fields the group stage
        // pushes.
        let mut push = doc! { "_id": "$_id" };
        if let Some(fields) = preview.and_then(|r| r.fields.as_ref()) {
            for key in fields.keys() {
                push.insert(key, format!("${key}"));
            }
        }

        let pipeline = vec![
            doc! { "$match": { "categoryId": { "$in": ids } } },
            doc! { "$sort": { "createdAt": -1 } },
            doc! { "$group": {
                "_id": "$categoryId",
                "count": { "$sum": 1 },
                "products": { "$push": push },
            } },
            doc! { "$project": { "count": 1, "products": { "$slice": ["$products", limit] } } },
        ];

        let groups: Vec<GroupedProducts> = self
            .products
            .collection()
            .aggregate(pipeline)
            .with_type::<GroupedProducts>()
            .await
            .map_err(|e| AppError::database("expand category products", e))?
            .try_collect()
            .await
            .map_err(|e| AppError::database("expand category products", e))?;

        let by_id: HashMap<ObjectId, GroupedProducts> =
            groups.into_iter().map(|g| (g.category_id, g)).collect();
        for view in views.iter_mut() {
            let group = by_id.get(&view.category.id);
            if preview.is_some() {
                view.products = Some(group.map(|g| g.products.clone()).unwrap_or_default());
            }
            if wants_count {
                view.product_count = Some(group.map(|g| g.count).unwrap_or(0));
            }
        }

        Ok(())
    }
}
