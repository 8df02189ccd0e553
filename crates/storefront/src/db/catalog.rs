//! Catalog repository: categories, products and home page banners.

use sqlx::PgPool;

use delivery_core::catalog::{Banner, Category, Product};
use delivery_core::{BannerId, CategoryId, Price, ProductId};

use super::RepositoryError;

/// Internal row type for product queries, joined with the product's category.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Price,
    photo: Option<String>,
    category_id: CategoryId,
    category_name: String,
    category_slug: String,
    category_color: String,
    category_photo: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            photo: row.photo,
            category_id: row.category_id,
            category: Some(Category {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
                color: row.category_color,
                photo: row.category_photo,
                product_count: None,
            }),
        }
    }
}

const PRODUCT_COLUMNS: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.photo, p.category_id,
           c.name AS category_name, c.slug AS category_slug,
           c.color AS category_color, c.photo AS category_photo
    FROM product p
    JOIN category c ON c.id = p.category_id
";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    color: String,
    photo: Option<String>,
    product_count: i64,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let product_count = u64::try_from(row.product_count).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative product count for category {}",
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            color: row.color,
            photo: row.photo,
            product_count: Some(product_count),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BannerRow {
    id: BannerId,
    title: String,
    description: Option<String>,
    image: String,
    link: Option<String>,
    position: i32,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            link: row.link,
            position: row.position,
        }
    }
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name, each with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT c.id, c.name, c.slug, c.color, c.photo,
                   COUNT(p.id) AS product_count
            FROM category c
            LEFT JOIN product p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    /// List products ordered by name, optionally restricted to one category slug.
    ///
    /// Each product embeds its category. An unknown slug yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_COLUMNS} WHERE $1::text IS NULL OR c.slug = $1 ORDER BY p.name"
        ))
        .bind(category_slug)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID, with its category embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_COLUMNS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// List active banners, lowest position first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_banners(&self) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, BannerRow>(
            r"
            SELECT id, title, description, image, link, position
            FROM banner
            WHERE active
            ORDER BY position, created_at, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Banner::from).collect())
    }
}
