//! Business rules for products.
//!
//! The service owns timestamps and defaults: `created_at`/`updated_at`
//! are stamped here rather than by the store, and a missing `isActive`
//! on creation defaults to true.

use chrono::Utc;
use std::sync::Arc;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, NewProduct, Product, ProductFilter, Sort, UpdateProduct};
use crate::repository::ProductRepository;

/// Page size used when no explicit pagination is requested.
pub const DEFAULT_LIMIT: u64 = 500;

#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Active products, newest first, capped at [`DEFAULT_LIMIT`].
    pub async fn get_all(&self, only_active: bool) -> ProductResult<Vec<Product>> {
        self.repository.paginate(only_active, 1, DEFAULT_LIMIT).await
    }

    pub async fn get_paginated(
        &self,
        only_active: bool,
        page: u64,
        limit: u64,
    ) -> ProductResult<Vec<Product>> {
        self.repository.paginate(only_active, page, limit).await
    }

    pub async fn get_by_criteria(
        &self,
        filter: &ProductFilter,
        sort: Sort,
    ) -> ProductResult<Vec<Product>> {
        self.repository.find_by_criteria(filter, sort).await
    }

    pub async fn count_all(
        &self,
        only_active: bool,
        filter: &ProductFilter,
    ) -> ProductResult<u64> {
        self.repository.count_all(only_active, filter).await
    }

    pub async fn get_by_id(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    pub async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let now = Utc::now();
        let new_product = NewProduct {
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(new_product).await
    }

    pub async fn update(&self, id: i32, changes: UpdateProduct) -> ProductResult<Product> {
        let mut product = self.get_by_id(id).await?;
        product.apply_update(changes);
        self.repository.save(product).await
    }

    pub async fn delete(&self, id: i32) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            category: "tools".to_string(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_get_all_requests_the_default_page() {
        let mut repo = MockProductRepository::new();
        repo.expect_paginate()
            .with(eq(true), eq(1), eq(DEFAULT_LIMIT))
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let service = ProductService::new(repo);
        let products = service.get_all(true).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_maps_missing_row_to_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let service = ProductService::new(repo);
        let err = service.get_by_id(42).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps_and_defaults_active() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .withf(|input| {
                input.is_active && input.created_at == input.updated_at
            })
            .times(1)
            .returning(|input| {
                Ok(Product {
                    id: 1,
                    name: input.name,
                    description: input.description,
                    price: input.price,
                    category: input.category,
                    created_at: input.created_at,
                    updated_at: input.updated_at,
                    is_active: input.is_active,
                })
            });

        let service = ProductService::new(repo);
        let created = service
            .create(CreateProduct {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price: 9.99,
                category: "tools".to_string(),
                is_active: None,
            })
            .await
            .unwrap();

        assert!(created.is_active);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_honors_explicit_inactive_flag() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .withf(|input| !input.is_active)
            .returning(|input| {
                Ok(Product {
                    id: 2,
                    name: input.name,
                    description: input.description,
                    price: input.price,
                    category: input.category,
                    created_at: input.created_at,
                    updated_at: input.updated_at,
                    is_active: input.is_active,
                })
            });

        let service = ProductService::new(repo);
        let created = service
            .create(CreateProduct {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price: 9.99,
                category: "tools".to_string(),
                is_active: Some(false),
            })
            .await
            .unwrap();

        assert!(!created.is_active);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_and_keeps_created_at() {
        let mut existing = sample_product();
        existing.created_at = Utc::now() - Duration::hours(1);
        existing.updated_at = existing.created_at;
        let created_at = existing.created_at;

        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_save()
            .withf(move |p| {
                p.price == 29.99 && p.created_at == created_at && p.updated_at > created_at
            })
            .times(1)
            .returning(|p| Ok(p));

        let service = ProductService::new(repo);
        let updated = service
            .update(
                1,
                UpdateProduct {
                    price: Some(29.99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 29.99);
        assert_eq!(updated.name, "Widget");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_save().never();

        let service = ProductService::new(repo);
        let err = service.update(99, UpdateProduct::default()).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().with(eq(7)).returning(|_| Ok(false));

        let service = ProductService::new(repo);
        let err = service.delete(7).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_existing_product_succeeds() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().with(eq(1)).returning(|_| Ok(true));

        let service = ProductService::new(repo);
        assert!(service.delete(1).await.is_ok());
    }
}
