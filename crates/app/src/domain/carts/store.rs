//! Cart Store

use jiff::Timestamp;
use thiserror::Error;

use super::{
    models::{CartItem, NewCartItem, StoreGroup},
    storage::{CartStorage, CartStorageError},
};

/// Storage key the full item list is persisted under.
pub const CART_STORAGE_KEY: &str = "feria-cart";

/// Cart Store Errors
#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error(transparent)]
    Storage(#[from] CartStorageError),

    #[error("malformed cart payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Cart Store
///
/// The shopper's working selection. Every mutation rewrites the full
/// item list through the backing [`CartStorage`], so reloading from the
/// same backend restores the exact prior state.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartItem>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Restores a cart from its storage backend. A missing payload
    /// yields an empty cart; a malformed one is an error rather than a
    /// silent reset.
    pub fn load(storage: S) -> Result<Self, CartStoreError> {
        let items = match storage.restore(CART_STORAGE_KEY)? {
            Some(payload) => serde_json::from_str(&payload)?,
            None => Vec::new(),
        };

        Ok(Self { items, storage })
    }

    /// Adds an item, merging into an existing line when product, size,
    /// and color all match. Returns the id of the affected line.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<String, CartStoreError> {
        let matching = self.items.iter_mut().find(|existing| {
            existing.product_uuid == item.product_uuid
                && existing.size == item.size
                && existing.color == item.color
        });

        let id = match matching {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.id.clone()
            }
            None => {
                let line = CartItem {
                    id: derive_item_id(&item, Timestamp::now()),
                    product_uuid: item.product_uuid,
                    tenant_uuid: item.tenant_uuid,
                    name: item.name,
                    unit_price: item.unit_price,
                    image: item.image,
                    quantity: item.quantity,
                    size: item.size,
                    color: item.color,
                };

                let id = line.id.clone();
                self.items.push(line);
                id
            }
        };

        self.persist()?;

        Ok(id)
    }

    /// Removes the line with the given id. Unknown ids are a no-op.
    pub fn remove_item(&mut self, id: &str) -> Result<(), CartStoreError> {
        self.items.retain(|item| item.id != id);
        self.persist()
    }

    /// Sets the quantity of the line with the given id. A quantity of
    /// zero or less removes the line instead.
    pub fn update_quantity(&mut self, id: &str, quantity: i32) -> Result<(), CartStoreError> {
        match u32::try_from(quantity) {
            Ok(quantity) if quantity > 0 => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.quantity = quantity;
                }

                self.persist()
            }
            _ => self.remove_item(id),
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.items.clear();
        self.persist()
    }

    /// Partitions the cart by store, in the order each store first
    /// appears. One quotation is requested per group.
    #[must_use]
    pub fn store_groups(&self) -> Vec<StoreGroup> {
        let mut groups: Vec<StoreGroup> = Vec::new();

        for item in &self.items {
            let group = groups
                .iter_mut()
                .find(|group| group.tenant_uuid == item.tenant_uuid);

            match group {
                Some(group) => group.items.push(item.clone()),
                None => groups.push(StoreGroup {
                    tenant_uuid: item.tenant_uuid,
                    items: vec![item.clone()],
                }),
            }
        }

        groups
    }

    /// Sum of line subtotals in minor currency units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the store, handing back its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<(), CartStoreError> {
        let payload = serde_json::to_string(&self.items)?;
        self.storage.persist(CART_STORAGE_KEY, &payload)?;

        Ok(())
    }
}

fn derive_item_id(item: &NewCartItem, now: Timestamp) -> String {
    format!(
        "{}-{}-{}-{}",
        item.product_uuid,
        item.size.as_deref().unwrap_or_default(),
        item.color.as_deref().unwrap_or_default(),
        now.as_millisecond()
    )
}
