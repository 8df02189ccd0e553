//! `delivery cart` - inspect and edit the local cart.
//!
//! The cart is read from and written to `DELIVERY_CART_DIR` on every
//! invocation. Only `add` talks to the storefront, to snapshot the product.

use delivery_cli::presenter::render_cart;
use delivery_cli::{ApiClient, CliConfig, ClientError, FileStorage};
use delivery_core::ProductId;
use delivery_core::cart::{CartProduct, CartStore};

fn open(config: &CliConfig) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::new(config.cart_dir.clone()))
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartStore<FileStorage>) {
    print!("{}", render_cart(&cart.snapshot()));
}

/// Print the cart.
pub fn show(config: &CliConfig) {
    print_cart(&open(config));
}

/// Add `quantity` units of a product, fetching its current details first.
pub async fn add(
    config: &CliConfig,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), ClientError> {
    if quantity == 0 {
        return Err(ClientError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = ApiClient::new(config)?.product(product_id).await?;

    let mut cart = open(config);
    cart.add_item(CartProduct::from(&product), quantity);
    tracing::info!(product_id = %product_id, quantity, "Added to cart");

    print_cart(&cart);
    Ok(())
}

/// Remove a product's line. Removing a product that is not in the cart is a no-op.
pub fn remove(config: &CliConfig, product_id: ProductId) {
    let mut cart = open(config);
    cart.remove_item(product_id);
    print_cart(&cart);
}

/// Set a line's quantity; zero or less removes the line.
pub fn update(config: &CliConfig, product_id: ProductId, quantity: i64) {
    let mut cart = open(config);
    cart.update_quantity(product_id, quantity);
    print_cart(&cart);
}

/// Empty the cart.
pub fn clear(config: &CliConfig) {
    let mut cart = open(config);
    cart.clear_cart();
    print_cart(&cart);
}
