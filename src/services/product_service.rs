//! Product catalog: listing with expanded relations, creation against an
//! existing category and transactional mutations.

use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::ClientSession;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::error::{AppError, AppResult};
use crate::models::{Category, CategorySummary, Product, ProductView, User, UserSummary};
use crate::repositories::base::case_insensitive;
use crate::repositories::{FindAllOptions, Listing, PageOptions, Relation, Repository};
use crate::services::QueryOptions;
use crate::utils::slug;

#[derive(Debug, Clone)]
pub struct CreateProductData {
    pub name: String,
    pub description: Option<String>,
    pub category_id: ObjectId,
    pub price: f64,
    pub quantity: i64,
    pub in_stock: bool,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<ObjectId>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub in_stock: Option<bool>,
    pub image: Option<String>,
}

/// Product service.
#[derive(Clone)]
pub struct ProductService {
    repo: Repository<Product>,
    categories: Repository<Category>,
    users: Repository<User>,
}

impl ProductService {
    pub fn new(
        repo: Repository<Product>,
        categories: Repository<Category>,
        users: Repository<User>,
    ) -> Self {
        Self {
            repo,
            categories,
            users,
        }
    }

    /// The relation set every product read expands: its category and its
    /// creator, as projected summaries.
    fn default_relations() -> Vec<Relation> {
        vec![
            Relation::new("category").fields(CategorySummary::fields()),
            Relation::new("createdBy").fields(UserSummary::fields()),
        ]
    }

    /// Lists products. A search term matches name, label and description;
    /// otherwise stock and category filters apply directly.
    pub async fn get_all(
        &self,
        page: PageOptions,
        query: QueryOptions,
    ) -> AppResult<Listing<ProductView>> {
        let mut filter = Document::new();
        if let Some(in_stock) = query.in_stock {
            filter.insert("inStock", in_stock);
        }
        if let Some(category_id) = query.category {
            filter.insert("categoryId", category_id);
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

    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<ProductView> {
        let product = self
            .repo
            .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": id }), None)
            .await?;

        let mut views = self.expand(vec![product], &Self::default_relations()).await?;
        views.pop().ok_or_else(|| AppError::Internal {
            source: anyhow::anyhow!("relation expansion dropped the record"),
        })
    }

    /// Creates a product after verifying the referenced category exists,
    /// stamping the creator and conflict-checking the derived slug.
    pub async fn create(
        &self,
        created_by: ObjectId,
        data: CreateProductData,
    ) -> AppResult<Product> {
        let category = self
            .categories
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "_id": data.category_id }),
                None,
            )
            .await?;

        let label = slug::get_label(&data.name);
        self.repo.check_label(&label, None).await?;

        let product = Product::new(
            data.name,
            label,
            data.description,
            category.id,
            created_by,
            data.price,
            data.quantity,
            data.in_stock,
            data.image,
        );
        self.repo.insert(&product).await?;

        Ok(product)
    }

    /// Updates a product inside a transaction when the deployment supports
    /// one; a failure (including a nonexistent new category) aborts and
    /// re-raises, leaving the stored document unmodified.
    pub async fn update(&self, id: ObjectId, data: UpdateProductData) -> AppResult<Product> {
        if !self.repo.store().supports_transactions() {
            return self.apply_update(id, data, None).await;
        }

        let mut session = self.repo.store().start_session().await?;
        session.start_transaction().await?;

        match self.apply_update(id, data, Some(&mut session)).await {
            Ok(product) => {
                session.commit_transaction().await?;
                Ok(product)
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
        data: UpdateProductData,
        mut session: Option<&mut ClientSession>,
    ) -> AppResult<Product> {
        if let Some(category_id) = data.category_id {
            self.categories
                .find_one_or_error(FindAllOptions::with_filter(doc! { "_id": category_id }), None)
                .await?;
        }

        let mut product = self
            .repo
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "_id": id }),
                session.as_deref_mut(),
            )
            .await?;

        if let Some(name) = data.name {
            // The slug is recomputed only when the name actually changes.
            if name != product.name {
                let label = slug::get_label(&name);
                self.repo.check_label(&label, Some(id)).await?;
                product.label = label;
            }
            product.name = name;
        }
        if let Some(description) = data.description {
            product.description = Some(description);
        }
        if let Some(category_id) = data.category_id {
            product.category_id = category_id;
        }
        if let Some(price) = data.price {
            product.price = price;
        }
        if let Some(quantity) = data.quantity {
            product.quantity = quantity;
        }
        if let Some(in_stock) = data.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(image) = data.image {
            product.image = Some(image);
        }
        product.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": id }, &product, session)
            .await?;

        Ok(product)
    }

    /// Deletes a product, transactionally where supported.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        if !self.repo.store().supports_transactions() {
            self.repo.delete_one(doc! { "_id": id }, None).await?;
            return Ok(());
        }

        let mut session = self.repo.store().start_session().await?;
        session.start_transaction().await?;

        match self
            .repo
            .delete_one(doc! { "_id": id }, Some(&mut session))
            .await
        {
            Ok(_) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Err(error) => {
                let _ = session.abort_transaction().await;
                Err(error)
            }
        }
    }

    /// Inverts the stock flag exactly once, transactionally where
    /// supported.
    pub async fn toggle_stock(&self, id: ObjectId) -> AppResult<Product> {
        if !self.repo.store().supports_transactions() {
            return self.apply_toggle(id, None).await;
        }

        let mut session = self.repo.store().start_session().await?;
        session.start_transaction().await?;

        match self.apply_toggle(id, Some(&mut session)).await {
            Ok(product) => {
                session.commit_transaction().await?;
                Ok(product)
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
    ) -> AppResult<Product> {
        let mut product = self
            .repo
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "_id": id }),
                session.as_deref_mut(),
            )
            .await?;

        product.in_stock = !product.in_stock;
        product.updated_at = DateTime::now();

        self.repo
            .replace(doc! { "_id": id }, &product, session)
            .await?;

        Ok(product)
    }

    /// Resolves the requested relations with batched `$in` fetches against
    /// the category and user collections.
    async fn expand(
        &self,
        products: Vec<Product>,
        relations: &[Relation],
    ) -> AppResult<Vec<ProductView>> {
        let mut views: Vec<ProductView> = products.into_iter().map(ProductView::plain).collect();
        if views.is_empty() || relations.is_empty() {
            return Ok(views);
        }

        for relation in relations {
            match relation.path {
                "category" => {
                    let ids: Vec<ObjectId> =
                        views.iter().map(|v| v.product.category_id).collect();
                    let summaries = self
                        .fetch_summaries(
                            self.categories.collection().clone_with_type::<CategorySummary>(),
                            ids,
                            relation,
                        )
                        .await?;
                    let by_id: HashMap<ObjectId, CategorySummary> =
                        summaries.into_iter().map(|c| (c.id, c)).collect();
                    for view in views.iter_mut() {
                        view.category = by_id.get(&view.product.category_id).cloned();
                    }
                }
                "createdBy" => {
                    let ids: Vec<ObjectId> =
                        views.iter().map(|v| v.product.created_by_id).collect();
                    let summaries = self
                        .fetch_summaries(
                            self.users.collection().clone_with_type::<UserSummary>(),
                            ids,
                            relation,
                        )
                        .await?;
                    let by_id: HashMap<ObjectId, UserSummary> =
                        summaries.into_iter().map(|u| (u.id, u)).collect();
                    for view in views.iter_mut() {
                        view.created_by = by_id.get(&view.product.created_by_id).cloned();
                    }
                }
                _ => {}
            }
        }

        Ok(views)
    }

    async fn fetch_summaries<S>(
        &self,
        collection: mongodb::Collection<S>,
        ids: Vec<ObjectId>,
        relation: &Relation,
    ) -> AppResult<Vec<S>>
    where
        S: serde::de::DeserializeOwned + Send + Sync + Unpin,
    {
        let mut filter = doc! { "_id": { "$in": ids } };
        if let Some(extra) = &relation.filter {
            filter.extend(extra.clone());
        }

        let options = FindOptions::builder()
            .projection(relation.fields.clone())
            .build();
        collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::database(format!("expand product {}", relation.path), e))?
            .try_collect()
            .await
            .map_err(|e| AppError::database(format!("expand product {}", relation.path), e))
    }
}
