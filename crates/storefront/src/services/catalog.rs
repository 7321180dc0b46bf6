//! Cached access to the product catalogue.
//!
//! Product listings and details are cached for 5 minutes per tenant.
//! Categories are cached alongside them. Only successful responses are
//! cached; errors always go back to the backend on the next call.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use clinica_backend::products::{Category, Product, ProductQuery};
use clinica_backend::{ApiResponse, BackendClient, BackendError, Paginated, RequestContext};
use clinica_core::ProductId;

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;

/// Cache key for catalogue responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product { tenant: String, id: ProductId },
    Products { tenant: String, query: String },
    Categories { tenant: String },
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Paginated<Product>),
    Categories(Vec<Category>),
}

/// Product catalogue backed by the REST API with a short-lived cache.
#[derive(Clone)]
pub struct CatalogService {
    backend: BackendClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { backend, cache }
    }

    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend request fails.
    #[instrument(skip(self, ctx))]
    pub async fn products(
        &self,
        ctx: &RequestContext,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, BackendError> {
        let key = CacheKey::Products {
            tenant: tenant_of(ctx),
            query: query.cache_key(),
        };
        if let Some(CacheValue::Products(page)) = self.cache.get(&key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let page = self
            .backend
            .list_products(ctx, query)
            .await?
            .data
            .unwrap_or_else(empty_page);
        self.cache
            .insert(key, CacheValue::Products(page.clone()))
            .await;
        Ok(page)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend request fails.
    #[instrument(skip(self, ctx), fields(product_id = %id))]
    pub async fn product(
        &self,
        ctx: &RequestContext,
        id: &ProductId,
    ) -> Result<Option<Product>, BackendError> {
        let key = CacheKey::Product {
            tenant: tenant_of(ctx),
            id: id.clone(),
        };
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let response: ApiResponse<Product> = match self.backend.get_product(ctx, id).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let Some(product) = response.data else {
            return Ok(None);
        };
        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(Some(product))
    }

    /// List product categories.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend request fails.
    #[instrument(skip(self, ctx))]
    pub async fn categories(&self, ctx: &RequestContext) -> Result<Vec<Category>, BackendError> {
        let key = CacheKey::Categories {
            tenant: tenant_of(ctx),
        };
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = self
            .backend
            .list_categories(ctx)
            .await?
            .data
            .unwrap_or_default();
        self.cache
            .insert(key, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

fn tenant_of(ctx: &RequestContext) -> String {
    ctx.client_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default()
}

const fn empty_page() -> Paginated<Product> {
    Paginated {
        data: Vec::new(),
        total: 0,
        page: 1,
        limit: 0,
    }
}
