//! Terminal presentation: notifications and plain-text views.
//!
//! Rendering functions return `String`s; only [`TerminalNotifier`] and the
//! command layer write to the terminal.

use std::cmp::Ordering;
use std::fmt::Write as _;

use delivery_core::CategoryId;
use delivery_core::cart::CartSnapshot;
use delivery_core::catalog::{Banner, Category, Product};
use delivery_core::checkout::{CheckoutField, FieldErrors, Notifier};
use delivery_core::order::Order;

/// Prints checkout notifications: successes to stdout, errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    #[allow(clippy::print_stdout)]
    fn success(&self, message: &str) {
        println!("✔ {message}");
    }

    #[allow(clippy::print_stderr)]
    fn error(&self, message: &str) {
        eprintln!("✘ {message}");
    }
}

/// Render the cart contents with per-line totals and the subtotal.
#[must_use]
pub fn render_cart(cart: &CartSnapshot) -> String {
    if cart.items.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for line in &cart.items {
        let _ = writeln!(
            out,
            "{:>4} x {:<32} {:>10}  ({})",
            line.quantity,
            line.name,
            line.line_total(),
            line.product_id
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count, cart.subtotal
    );
    out
}

/// Render an order confirmation.
#[must_use]
pub fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(out, "Placed {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Deliver to {} at {}", order.name, order.address);
    let _ = writeln!(out, "Contact {} / {}", order.email, order.phone);
    let _ = writeln!(out);
    for line in &order.items {
        let _ = writeln!(
            out,
            "{:>4} x {:<32} {:>10}",
            line.quantity,
            line.product.name,
            line.line_total()
        );
    }
    let _ = writeln!(out, "Total {}", order.total);
    out
}

/// Render a product listing.
///
/// With `grouped`, products are listed under their embedded category,
/// categories by name, and products without one come last.
#[must_use]
pub fn render_products(products: &[Product], grouped: bool) -> String {
    let mut out = String::new();

    let write_product = |out: &mut String, product: &Product| {
        let _ = writeln!(
            out,
            "  {:<32} {:>10}  {}",
            product.name, product.price, product.id
        );
    };

    if grouped {
        let mut sorted: Vec<&Product> = products.iter().collect();
        sorted.sort_by(|a, b| match (&a.category, &b.category) {
            (Some(x), Some(y)) => x.name.cmp(&y.name).then(x.id.cmp(&y.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let mut current: Option<CategoryId> = None;
        let mut in_other = false;
        for product in sorted {
            match &product.category {
                Some(category) if current != Some(category.id) => {
                    current = Some(category.id);
                    let _ = writeln!(out, "{} [{}]", category.name, category.slug);
                }
                None if !in_other => {
                    in_other = true;
                    let _ = writeln!(out, "Other");
                }
                _ => {}
            }
            write_product(&mut out, product);
        }
    } else {
        for product in products {
            write_product(&mut out, product);
        }
    }

    if out.is_empty() {
        out.push_str("No products found.\n");
    }
    out
}

/// Render the category list with product counts.
#[must_use]
pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut out = String::new();
    for category in categories {
        let count = category
            .product_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<16} {:>5} product(s)",
            category.name, category.slug, count
        );
    }
    out
}

/// Render active banners in display order.
#[must_use]
pub fn render_banners(banners: &[Banner]) -> String {
    if banners.is_empty() {
        return "No active banners.\n".to_string();
    }

    let mut out = String::new();
    for banner in banners {
        let _ = writeln!(out, "{:>3}. {}", banner.position, banner.title);
        if let Some(description) = &banner.description {
            let _ = writeln!(out, "     {description}");
        }
        if let Some(link) = &banner.link {
            let _ = writeln!(out, "     -> {link}");
        }
    }
    out
}

/// Render inline form errors, one per line, in field order.
#[must_use]
pub fn render_field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for field in CheckoutField::ALL {
        if let Some(message) = errors.get(field) {
            let _ = writeln!(out, "  --{field}: {message}");
        }
    }
    out
}
