//! `delivery checkout` - place an order for the cart contents.
//!
//! Runs the core checkout flow against the storefront. On success the cart
//! file is cleared and, after the confirmation delay, the created order is
//! fetched and printed.

use delivery_cli::presenter::{render_field_errors, render_order};
use delivery_cli::{ApiClient, CliConfig, ClientError, FileStorage, TerminalNotifier};
use delivery_core::cart::CartStore;
use delivery_core::checkout::{CheckoutError, CheckoutField, CheckoutFlow, CheckoutForm};

/// Submit the cart with the given contact details.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub async fn run(config: &CliConfig, form: &CheckoutForm) -> Result<(), ClientError> {
    let api = ApiClient::new(config)?;
    let mut cart = CartStore::open(FileStorage::new(config.cart_dir.clone()));

    let mut flow = CheckoutFlow::new(TerminalNotifier);
    for field in CheckoutField::ALL {
        flow.set_field(field, form.get(field));
    }

    let redirect = match flow.submit(&mut cart, &api).await {
        Ok(redirect) => redirect,
        Err(CheckoutError::Invalid(errors)) => {
            eprint!("{}", render_field_errors(&errors));
            return Err(CheckoutError::Invalid(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Order {} placed. Loading confirmation...", redirect.order_id);
    tokio::time::sleep(redirect.after).await;
    tracing::debug!(path = %redirect.path(), "Showing confirmation");

    let order = api.order(redirect.order_id).await?;
    print!("{}", render_order(&order));
    Ok(())
}
