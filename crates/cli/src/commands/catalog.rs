//! `delivery products`, `delivery categories` and `delivery banners` - browse the catalog.

use delivery_cli::presenter::{render_banners, render_categories, render_products};
use delivery_cli::{ApiClient, CliConfig, ClientError};

/// List products, grouped by category unless a category filter is given.
#[allow(clippy::print_stdout)]
pub async fn products(config: &CliConfig, category: Option<&str>) -> Result<(), ClientError> {
    let api = ApiClient::new(config)?;
    let products = api.products(category).await?;

    print!("{}", render_products(&products, category.is_none()));
    Ok(())
}

/// List categories with their product counts.
#[allow(clippy::print_stdout)]
pub async fn categories(config: &CliConfig) -> Result<(), ClientError> {
    let api = ApiClient::new(config)?;
    print!("{}", render_categories(&api.categories().await?));
    Ok(())
}

/// List active home page banners.
#[allow(clippy::print_stdout)]
pub async fn banners(config: &CliConfig) -> Result<(), ClientError> {
    let api = ApiClient::new(config)?;
    print!("{}", render_banners(&api.banners().await?));
    Ok(())
}
