//! Postgres-backed [`ProductRepository`] built on SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::{self, Entity as Products};
use crate::error::ProductResult;
use crate::models::{NewProduct, Product, ProductFilter, Sort, SortDirection, SortField};
use crate::repository::ProductRepository;

#[derive(Debug, Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Single source of truth for list/count predicates. Listing and
/// counting build their queries from the same condition so totals can
/// never drift from page contents.
fn filter_condition(only_active: bool, filter: &ProductFilter) -> Condition {
    let mut condition = Condition::all();
    if only_active {
        condition = condition.add(entity::Column::IsActive.eq(true));
    }
    if let Some(category) = &filter.category {
        condition = condition.add(entity::Column::Category.eq(category.clone()));
    }
    if let Some(min) = filter.min_price {
        condition = condition.add(entity::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        condition = condition.add(entity::Column::Price.lte(max));
    }
    if let Some(is_active) = filter.is_active {
        condition = condition.add(entity::Column::IsActive.eq(is_active));
    }
    condition
}

fn order_column(field: SortField) -> entity::Column {
    match field {
        SortField::CreatedAt => entity::Column::CreatedAt,
        SortField::UpdatedAt => entity::Column::UpdatedAt,
        SortField::Price => entity::Column::Price,
        SortField::Name => entity::Column::Name,
        SortField::Category => entity::Column::Category,
    }
}

fn order_direction(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn paginate(
        &self,
        only_active: bool,
        page: u64,
        limit: u64,
    ) -> ProductResult<Vec<Product>> {
        let offset = page.saturating_sub(1) * limit;
        let models = Products::find()
            .filter(filter_condition(only_active, &ProductFilter::default()))
            .order_by_desc(entity::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_by_criteria(
        &self,
        filter: &ProductFilter,
        sort: Sort,
    ) -> ProductResult<Vec<Product>> {
        let models = Products::find()
            .filter(filter_condition(false, filter))
            .order_by(order_column(sort.field), order_direction(sort.direction))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn count_all(&self, only_active: bool, filter: &ProductFilter) -> ProductResult<u64> {
        let count = Products::find()
            .filter(filter_condition(only_active, filter))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = Products::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn insert(&self, input: NewProduct) -> ProductResult<Product> {
        let model = entity::ActiveModel::from(input).insert(&self.db).await?;
        tracing::info!(product_id = model.id, "product created");
        Ok(model.into())
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let model = entity::ActiveModel::from(product).update(&self.db).await?;
        tracing::info!(product_id = model.id, "product updated");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "product deleted");
        }
        Ok(result.rows_affected > 0)
    }
}
