//! Delivery CLI - cart, checkout and order confirmation from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! delivery products
//! delivery products --category pizzas
//! delivery categories
//! delivery banners
//!
//! # Edit the cart (persisted under DELIVERY_CART_DIR)
//! delivery cart add 67e55044-10b1-426f-9247-bb680e5fe0c8 -q 2
//! delivery cart update 67e55044-10b1-426f-9247-bb680e5fe0c8 3
//! delivery cart show
//!
//! # Place the order
//! delivery checkout --name "João Silva" --email joao@email.com \
//!     --phone 11988887777 --address "Rua das Flores, 123"
//!
//! # Show a confirmation again
//! delivery order <order-id>
//!
//! # Run storefront database migrations
//! delivery migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use delivery_cli::{CliConfig, ClientError};
use delivery_core::checkout::CheckoutForm;

mod commands;

#[derive(Parser)]
#[command(name = "delivery")]
#[command(author, version, about = "Delivery storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// Full name (at least 3 characters)
        #[arg(long, default_value = "")]
        name: String,

        /// Email address
        #[arg(long, default_value = "")]
        email: String,

        /// Phone number, 10 or 11 digits
        #[arg(long, default_value = "")]
        phone: String,

        /// Delivery address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Show an order confirmation
    Order {
        /// Order ID
        id: String,
    },
    /// List products
    Products {
        /// Only show products in this category (slug)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories with product counts
    Categories,
    /// List active home page banners
    Banners,
    /// Run storefront database migrations
    Migrate,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Set a product's quantity (0 or less removes it)
    Update {
        /// Product ID
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove everything from the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,delivery=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::storefront().await;
    }

    let config = CliConfig::from_env()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config),
            CartAction::Add {
                product_id,
                quantity,
            } => {
                let product_id = commands::parse_product_id(&product_id)?;
                commands::cart::add(&config, product_id, quantity).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&config, commands::parse_product_id(&product_id)?);
            }
            CartAction::Update {
                product_id,
                quantity,
            } => {
                let product_id = commands::parse_product_id(&product_id)?;
                commands::cart::update(&config, product_id, quantity);
            }
            CartAction::Clear => commands::cart::clear(&config),
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
        } => {
            let form = CheckoutForm {
                name,
                email,
                phone,
                address,
            };
            commands::checkout::run(&config, &form).await?;
        }
        Commands::Order { id } => {
            commands::order::show(&config, commands::parse_order_id(&id)?).await?;
        }
        Commands::Products { category } => {
            commands::catalog::products(&config, category.as_deref()).await?;
        }
        Commands::Categories => commands::catalog::categories(&config).await?,
        Commands::Banners => commands::catalog::banners(&config).await?,
        Commands::Migrate => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_catalog_subcommands_parse() {
        assert!(matches!(
            Cli::try_parse_from(["delivery", "banners"]).map(|c| c.command),
            Ok(Commands::Banners)
        ));
        assert!(matches!(
            Cli::try_parse_from(["delivery", "categories"]).map(|c| c.command),
            Ok(Commands::Categories)
        ));
    }

    #[test]
    fn test_update_accepts_negative_quantity() {
        let cli = Cli::try_parse_from([
            "delivery",
            "cart",
            "update",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "-1",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Update { quantity: -1, .. }
            })
        ));
    }
}
