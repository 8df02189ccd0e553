//! The cart store: owned line items, persistence and snapshot publishing.

use tokio::sync::watch;
use tracing::{debug, warn};

use super::item::{CartLineItem, CartProduct};
use super::storage::CartStorage;
use crate::types::{Price, ProductId};

/// Fixed storage key for the persisted cart.
pub const CART_STORAGE_KEY: &str = "delivery_cart";

/// Immutable view of the cart published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub subtotal: Price,
    pub item_count: u64,
    /// True until the persisted cart has been read. Views should not render
    /// "your cart is empty" while this is set.
    pub is_loading: bool,
}

impl CartSnapshot {
    fn of(items: &[CartLineItem], is_loading: bool) -> Self {
        Self {
            items: items.to_vec(),
            subtotal: subtotal(items),
            item_count: item_count(items),
            is_loading,
        }
    }
}

/// The authoritative client-side cart.
///
/// At most one line exists per product and every line has `quantity >= 1`.
/// Construct one per client session and pass it to whatever needs it.
pub struct CartStore<S> {
    storage: S,
    items: Vec<CartLineItem>,
    loading: bool,
    snapshots: watch::Sender<CartSnapshot>,
}

impl<S: CartStorage> CartStore<S> {
    /// Create an empty store in the loading state. Call [`Self::load`] to
    /// hydrate it.
    pub fn new(storage: S) -> Self {
        let (snapshots, _) = watch::channel(CartSnapshot::of(&[], true));
        Self {
            storage,
            items: Vec::new(),
            loading: true,
            snapshots,
        }
    }

    /// Create a store and hydrate it from storage.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Read the persisted cart once.
    ///
    /// Missing, unreadable or corrupt data hydrates as an empty cart. Persisted
    /// entries that break the cart invariants are repaired: zero quantities are
    /// dropped and repeated products are merged.
    pub fn load(&mut self) {
        if !self.loading {
            return;
        }

        self.items = match self.storage.load(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => normalize(items),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable persisted cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted cart");
                Vec::new()
            }
        };
        self.loading = false;
        debug!(lines = self.items.len(), "cart hydrated");
        self.publish();
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line for the product if there is one,
    /// otherwise appends a new line. A zero quantity changes nothing.
    pub fn add_item(&mut self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(CartLineItem::new(product, quantity)),
        }
        self.commit();
    }

    /// Remove the line for `product_id`. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            self.commit();
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or below removes the line. Absent products are
    /// not added.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity = quantity;
            self.commit();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Quantity of `product_id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        subtotal(&self.items)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.items)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True until the initial load attempt has completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.items, self.loading)
    }

    /// Subscribe to snapshots. The receiver always holds the latest one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    fn commit(&mut self) {
        // Writing before hydration would clobber the persisted cart.
        if !self.loading {
            self.persist();
        }
        self.publish();
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.save(CART_STORAGE_KEY, &encoded) {
            warn!(error = %e, "failed to persist cart");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

fn subtotal(items: &[CartLineItem]) -> Price {
    items.iter().map(CartLineItem::line_total).sum()
}

fn item_count(items: &[CartLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for item in items.into_iter().filter(|item| item.quantity > 0) {
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }

    // Lines whose amounts cannot be represented are treated as corrupt.
    let mut total = Price::ZERO;
    merged.retain(|item| {
        match item
            .unit_price
            .checked_times(item.quantity)
            .and_then(|line| total.checked_add(line))
        {
            Some(next) => {
                total = next;
                true
            }
            None => {
                warn!(
                    product_id = %item.product_id,
                    "dropping persisted cart line with overflowing total"
                );
                false
            }
        }
    });
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::{MemoryStorage, StorageError};

    fn product(cents: i64) -> CartProduct {
        CartProduct {
            product_id: ProductId::generate(),
            name: "Margherita".to_string(),
            unit_price: Price::from_cents(cents).unwrap(),
            image: None,
        }
    }

    fn open() -> (CartStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::default();
        (CartStore::open(storage.clone()), storage)
    }

    #[test]
    fn test_new_store_is_loading_until_load() {
        let mut store = CartStore::new(MemoryStorage::default());
        assert!(store.is_loading());
        assert!(store.snapshot().is_loading);
        store.load();
        assert!(!store.is_loading());
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let (mut store, _) = open();
        let pizza = product(1000);
        for quantity in [1, 4, 2] {
            store.add_item(pizza.clone(), quantity);
        }
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.quantity_of(pizza.product_id), 7);
    }

    #[test]
    fn test_add_to_existing_line_scenario() {
        let (mut store, _) = open();
        let p1 = product(1000);
        store.add_item(p1.clone(), 2);
        store.add_item(p1.clone(), 1);
        assert_eq!(store.items()[0].quantity, 3);
        assert_eq!(store.subtotal(), Price::from_cents(3000).unwrap());
    }

    #[test]
    fn test_add_zero_is_ignored() {
        let (mut store, storage) = open();
        store.add_item(product(1000), 0);
        assert!(store.is_empty());
        assert!(storage.get(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let (mut store, _) = open();
        let a = product(100);
        let b = product(200);
        store.add_item(a.clone(), 1);
        store.add_item(b.clone(), 1);
        store.add_item(a.clone(), 1);
        let ids: Vec<_> = store.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![a.product_id, b.product_id]);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for quantity in [0, -5] {
            let (mut store, _) = open();
            let p1 = product(1000);
            store.add_item(p1.clone(), 3);
            store.update_quantity(p1.product_id, quantity);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let (mut store, _) = open();
        let kept = product(1000);
        store.add_item(kept.clone(), 1);
        store.update_quantity(ProductId::generate(), 5);
        store.update_quantity(ProductId::generate(), 0);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.quantity_of(kept.product_id), 1);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let (mut store, _) = open();
        let p1 = product(250);
        store.add_item(p1.clone(), 1);
        store.update_quantity(p1.product_id, 4);
        assert_eq!(store.quantity_of(p1.product_id), 4);
        assert_eq!(store.subtotal(), Price::from_cents(1000).unwrap());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut store, _) = open();
        store.add_item(product(100), 1);
        store.remove_item(ProductId::generate());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_totals() {
        let (mut store, _) = open();
        assert_eq!(store.subtotal(), Price::ZERO);
        assert_eq!(store.item_count(), 0);

        store.add_item(product(1000), 2);
        store.add_item(product(450), 3);
        assert_eq!(store.subtotal(), Price::from_cents(3350).unwrap());
        assert_eq!(store.item_count(), 5);
    }

    #[test]
    fn test_clear_cart() {
        let (mut store, storage) = open();
        store.add_item(product(1000), 2);
        store.clear_cart();
        assert!(store.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), "[]");
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let (mut store, storage) = open();
        let mut with_image = product(1290);
        with_image.image = Some("https://cdn.example.com/p.png".to_string());
        store.add_item(with_image, 2);
        store.add_item(product(500), 1);

        let reloaded = CartStore::open(storage);
        assert_eq!(reloaded.items(), store.items());
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json");
        let store = CartStore::open(storage);
        assert!(store.is_empty());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_load_repairs_broken_invariants() {
        let id = ProductId::generate();
        let raw = format!(
            r#"[{{"productId":"{id}","name":"A","unitPrice":"1.00","quantity":2}},
                {{"productId":"{id}","name":"A","unitPrice":"1.00","quantity":3}},
                {{"productId":"{other}","name":"B","unitPrice":"1.00","quantity":0}}]"#,
            other = ProductId::generate()
        );
        let store = CartStore::open(MemoryStorage::with_entry(CART_STORAGE_KEY, &raw));
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.quantity_of(id), 5);
    }

    #[test]
    fn test_load_drops_lines_with_overflowing_totals() {
        let kept = ProductId::generate();
        let huge = ProductId::generate();
        let raw = format!(
            r#"[{{"productId":"{kept}","name":"A","unitPrice":"1.00","quantity":2}},
                {{"productId":"{huge}","name":"B","unitPrice":"79228162514264337593543950335","quantity":2}}]"#
        );
        let store = CartStore::open(MemoryStorage::with_entry(CART_STORAGE_KEY, &raw));
        assert!(!store.is_loading());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.quantity_of(kept), 2);
        assert_eq!(store.quantity_of(huge), 0);
        assert_eq!(store.subtotal(), Price::from_cents(200).unwrap());
    }

    #[test]
    fn test_huge_totals_saturate_instead_of_panicking() {
        let (mut store, _) = open();
        let mut expensive = product(100);
        expensive.unit_price = Price::new(rust_decimal::Decimal::MAX).unwrap();
        store.add_item(expensive.clone(), u32::MAX);
        store.add_item(product(100), 1);
        assert_eq!(store.subtotal(), expensive.unit_price);
    }

    struct FailingStorage;

    impl CartStorage for FailingStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("unavailable".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("unavailable".to_string()))
        }
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let mut store = CartStore::open(FailingStorage);
        assert!(store.is_empty());
        store.add_item(product(100), 1);
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn test_mutation_before_load_is_not_persisted() {
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(storage.clone());
        store.add_item(product(100), 1);
        assert!(storage.get(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_subscribers_receive_latest_snapshot() {
        let (mut store, _) = open();
        let mut rx = store.subscribe();
        assert!(!rx.borrow_and_update().is_loading);

        store.add_item(product(1000), 2);
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.subtotal, Price::from_cents(2000).unwrap());
    }
}
