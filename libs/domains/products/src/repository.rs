//! Storage abstraction for products.
//!
//! The service layer only sees `ProductRepository`; the Postgres
//! implementation lives in [`crate::postgres`] and the in-memory one
//! here backs handler tests and local experiments.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductFilter, Sort, SortDirection, SortField};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products ordered by `created_at DESC`, newest first.
    /// `page` is 1-based.
    async fn paginate(&self, only_active: bool, page: u64, limit: u64)
        -> ProductResult<Vec<Product>>;

    /// All products matching the filter, in the given sort order.
    async fn find_by_criteria(&self, filter: &ProductFilter, sort: Sort)
        -> ProductResult<Vec<Product>>;

    /// Count under the same predicates `paginate` and `find_by_criteria`
    /// apply, so totals always agree with page contents.
    async fn count_all(&self, only_active: bool, filter: &ProductFilter) -> ProductResult<u64>;

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    async fn insert(&self, input: NewProduct) -> ProductResult<Product>;

    /// Persist the full state of an existing product.
    async fn save(&self, product: Product) -> ProductResult<Product>;

    /// Returns `false` when no row with that id existed.
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

/// HashMap-backed repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i32, Product>>>,
    next_id: AtomicI32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI32::new(1),
        }
    }

    fn matches(product: &Product, only_active: bool, filter: &ProductFilter) -> bool {
        if only_active && !product.is_active {
            return false;
        }
        if let Some(category) = &filter.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = filter.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = filter.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(is_active) = filter.is_active {
            if product.is_active != is_active {
                return false;
            }
        }
        true
    }

    fn compare(a: &Product, b: &Product, sort: Sort) -> Ordering {
        let ordering = match sort.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.cmp(&b.category),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn paginate(
        &self,
        only_active: bool,
        page: u64,
        limit: u64,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| Self::matches(p, only_active, &ProductFilter::default()))
            .cloned()
            .collect();
        matching.sort_by(|a, b| Self::compare(a, b, Sort::default()));

        let offset = (page.saturating_sub(1) * limit) as usize;
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_criteria(
        &self,
        filter: &ProductFilter,
        sort: Sort,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| Self::matches(p, false, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| Self::compare(a, b, sort));
        Ok(matching)
    }

    async fn count_all(&self, only_active: bool, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| Self::matches(p, only_active, filter))
            .count() as u64)
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let product = Product {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            created_at: input.created_at,
            updated_at: input.updated_at,
            is_active: input.is_active,
        };
        self.products.write().await.insert(id, product.clone());
        Ok(product)
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}
