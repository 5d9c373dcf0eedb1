//! The cart store

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use bazaar_catalog::Product;

use crate::error::CartError;
use crate::storage::KeyValueStorage;

/// A product in the pending order, with how many units of it were added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

/// Pending-order store over a single storage key.
///
/// The whole cart is serialized as one JSON array and rewritten on every
/// mutation. Adding a product that is already present merges into the
/// existing item by incrementing its quantity; insertion order is
/// preserved.
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Read the current cart.
    ///
    /// An unset key, an unreadable backend, or a corrupt blob all yield an
    /// empty cart rather than an error; corrupt storage must never surface
    /// to the user.
    pub fn read_cart(&self) -> Vec<CartItem> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Cart storage unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Corrupt cart data, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// Merges into the existing item when the product id is already
    /// present, otherwise appends a new item with quantity 1. The updated
    /// cart is written back as one atomic overwrite.
    pub fn add_item(&self, product: &Product) -> Result<(), CartError> {
        let mut cart = self.read_cart();

        match cart.iter_mut().find(|item| item.product.id == product.id) {
            Some(existing) => existing.quantity += 1,
            None => cart.push(CartItem {
                product: product.clone(),
                quantity: 1,
            }),
        }

        let raw = serde_json::to_string(&cart)?;
        self.storage.write(&self.key, &raw)?;
        Ok(())
    }

    /// Number of distinct items in the cart.
    ///
    /// This counts entries, not total units; two of the same product still
    /// count as one item. Callers wanting total units sum the quantities.
    pub fn item_count(&self) -> usize {
        self.read_cart().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: u64, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: String::new(),
            category: String::new(),
            price: 10.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            brand: None,
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::new()), "cart")
    }

    #[test]
    fn test_empty_cart_reads_empty() {
        let cart = store();
        assert!(cart.read_cart().is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_repeated_add_merges_by_product_id() {
        let cart = store();
        let p = product(1, "Widget");

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        let items = cart.read_cart();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        // Distinct items, not total units
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let cart = store();
        cart.add_item(&product(1, "First")).unwrap();
        cart.add_item(&product(2, "Second")).unwrap();

        let items = cart.read_cart();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product.title, "First");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[1].product.title, "Second");
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_corrupt_blob_is_an_empty_cart() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write("cart", "{not json").unwrap();

        let cart = CartStore::new(storage, "cart");
        assert!(cart.read_cart().is_empty());

        // And recovers: the next add rewrites a valid blob
        cart.add_item(&product(3, "Fresh")).unwrap();
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_item_flattens_product_fields_in_json() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone(), "cart");
        cart.add_item(&product(5, "Flat")).unwrap();

        let raw = storage.read("cart").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        // Product fields sit alongside quantity, not nested
        assert_eq!(value[0]["id"], 5);
        assert_eq!(value[0]["title"], "Flat");
        assert_eq!(value[0]["quantity"], 1);
    }
}
