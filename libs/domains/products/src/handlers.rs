use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_helpers::JsonBody;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::{ProductError, ProductResult};
use crate::models::{
    parse_bool, parse_index, parse_price, CreateProduct, Product, ProductFilter, ProductPayload,
    Sort,
};
use crate::repository::ProductRepository;
use crate::service::{ProductService, DEFAULT_LIMIT};

const TAG: &str = "products";

static X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, replace_product, patch_product, delete_product),
    components(schemas(Product, ProductPayload, ListEnvelope, ListMeta)),
    tags((name = TAG, description = "Product catalog endpoints"))
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// Raw list query parameters.
///
/// Everything arrives as a string and is coerced permissively;
/// unparseable values drop the predicate instead of erroring.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// Filter on the active flag
    pub is_active: Option<String>,
    /// 1-based page number; takes effect together with `limit`
    pub page: Option<String>,
    /// Page size; takes effect together with `page`
    pub limit: Option<String>,
    /// Truthy value lifts the active-only default
    pub all: Option<String>,
    /// `field,direction` expression, e.g. `price,ASC`
    pub sort: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            // Matched exactly as supplied; `category=` compares against
            // the empty string and matches nothing.
            category: self.category.clone(),
            min_price: self.min_price.as_deref().and_then(parse_price),
            max_price: self.max_price.as_deref().and_then(parse_price),
            is_active: self.is_active.as_deref().map(parse_bool),
        }
    }

    fn has_filter(&self) -> bool {
        self.category.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.is_active.is_some()
    }

    fn has_pagination(&self) -> bool {
        self.page.is_some() && self.limit.is_some()
    }

    fn wants_all(&self) -> bool {
        self.all.as_deref().is_some_and(parse_bool)
    }

    fn page(&self) -> u64 {
        self.page.as_deref().map(parse_index).unwrap_or(1)
    }

    fn limit(&self) -> u64 {
        self.limit
            .as_deref()
            .map(parse_index)
            .unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// List response wrapper: `{"data": [...], "meta": {...}}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListEnvelope {
    pub data: Vec<Product>,
    pub meta: ListMeta,
}

/// List products.
///
/// Parameter precedence: any recognized filter wins over pagination,
/// pagination wins over the `all` flag, and with none of those the
/// default is the first page of active products.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Products with list metadata", body = ListEnvelope),
        (status = 204, description = "No products matched"),
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ListQuery>,
) -> ProductResult<Response> {
    let filter = query.filter();

    let (products, total, limit) = if query.has_filter() {
        let sort = Sort::parse(query.sort.as_deref());
        let products = service.get_by_criteria(&filter, sort).await?;
        // The active-flag predicate lives in the filter itself here, so
        // the count runs under exactly the listed predicates.
        let total = service.count_all(false, &filter).await?;
        // A criteria read is unpaginated; its effective page size is
        // whatever matched.
        let limit = products.len() as u64;
        (products, total, limit)
    } else if query.has_pagination() {
        let products = service
            .get_paginated(true, query.page(), query.limit())
            .await?;
        let total = service.count_all(true, &filter).await?;
        (products, total, query.limit())
    } else if query.wants_all() {
        let products = service.get_all(false).await?;
        let total = service.count_all(false, &filter).await?;
        (products, total, DEFAULT_LIMIT)
    } else {
        let products = service.get_all(true).await?;
        let total = service.count_all(true, &filter).await?;
        (products, total, DEFAULT_LIMIT)
    };

    if products.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let envelope = ListEnvelope {
        data: products,
        meta: ListMeta {
            total,
            page: query.page(),
            limit,
        },
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
        headers.insert(X_TOTAL_COUNT.clone(), value);
    }
    Ok((StatusCode::OK, headers, Json(envelope)).into_response())
}

/// Create a product.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Payload constraint violations"),
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> ProductResult<Response> {
    let input = CreateProduct::try_from(payload).map_err(ProductError::Validation)?;
    let product = service.create(input).await?;

    let location = format!("/api/products/{}", product.id);
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, value);
    }
    Ok((StatusCode::CREATED, headers, Json(product)).into_response())
}

/// Fetch one product by id.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "No product with that id"),
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
) -> ProductResult<Json<Product>> {
    let product = service.get_by_id(id).await?;
    Ok(Json(product))
}

/// Replace a product; every writable field must be supplied.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Malformed JSON body"),
        (status = 404, description = "No product with that id"),
        (status = 422, description = "Payload constraint violations"),
    )
)]
async fn replace_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> ProductResult<Json<Product>> {
    update_product(&service, id, payload, false).await
}

/// Update supplied fields only.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Malformed JSON body"),
        (status = 404, description = "No product with that id"),
        (status = 422, description = "Payload constraint violations"),
    )
)]
async fn patch_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> ProductResult<Json<Product>> {
    update_product(&service, id, payload, true).await
}

/// Shared PUT/PATCH flow: existence first, then payload constraints,
/// so an unknown id is a 404 even with an invalid body.
async fn update_product<R: ProductRepository>(
    service: &ProductService<R>,
    id: i32,
    payload: ProductPayload,
    partial: bool,
) -> ProductResult<Json<Product>> {
    service.get_by_id(id).await?;

    let violations = payload.violations(partial);
    if !violations.is_empty() {
        return Err(ProductError::Validation(violations));
    }

    let product = service.update(id, payload.into()).await?;
    Ok(Json(product))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "No product with that id"),
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<i32>,
) -> ProductResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
