//! Catalog service with an in-memory read cache.
//!
//! Caches categories, product listings and banners using `moka`. Order
//! creation never reads through this cache; prices for new orders come from
//! the database.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use delivery_core::ProductId;
use delivery_core::catalog::{Banner, Category, Product};

use crate::db::{CatalogRepository, RepositoryError};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Banners,
    Categories,
    Products { category: Option<String> },
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Banners(Arc<Vec<Banner>>),
    Categories(Arc<Vec<Category>>),
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
}

/// Cached access to the catalog.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    /// Create a catalog service whose entries expire after `ttl`.
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { pool, cache }),
        }
    }

    /// List active banners for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Arc<Vec<Banner>>, RepositoryError> {
        if let Some(CacheValue::Banners(banners)) =
            self.inner.cache.get(&CacheKey::Banners).await
        {
            debug!("Cache hit for banners");
            return Ok(banners);
        }

        let banners = Arc::new(
            CatalogRepository::new(&self.inner.pool)
                .list_active_banners()
                .await?,
        );

        self.inner
            .cache
            .insert(CacheKey::Banners, CacheValue::Banners(Arc::clone(&banners)))
            .await;

        Ok(banners)
    }

    /// List all categories with their product counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, RepositoryError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(
            CatalogRepository::new(&self.inner.pool)
                .list_categories()
                .await?,
        );

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;

        Ok(categories)
    }

    /// List products, optionally filtered by category slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        category: Option<&str>,
    ) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let cache_key = CacheKey::Products {
            category: category.map(str::to_owned),
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(
            CatalogRepository::new(&self.inner.pool)
                .list_products(category)
                .await?,
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a single product. Misses are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let product = CatalogRepository::new(&self.inner.pool)
            .get_product(id)
            .await?;

        if let Some(product) = &product {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }
}
