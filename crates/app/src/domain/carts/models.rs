//! Cart Models

use serde::{Deserialize, Serialize};

use crate::domain::{products::records::ProductUuid, tenants::records::TenantUuid};

/// Cart Line Model
///
/// One selected product variant. The `id` is minted when the line is
/// first added and stays stable across quantity updates, so the UI can
/// address lines without re-deriving keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,

    pub product_uuid: ProductUuid,

    /// Store the product belongs to. Absent on lines persisted before
    /// carts recorded the store alongside each product.
    pub tenant_uuid: Option<TenantUuid>,

    /// Product name captured when the line was added.
    pub name: String,

    /// Unit price in minor currency units.
    pub unit_price: u64,

    /// Primary product image URL.
    pub image: Option<String>,

    pub quantity: u32,

    pub size: Option<String>,

    pub color: Option<String>,
}

impl CartItem {
    /// Line subtotal in minor currency units.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// New Cart Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub tenant_uuid: Option<TenantUuid>,
    pub name: String,
    pub unit_price: u64,
    pub image: Option<String>,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Store Group Model
///
/// Cart lines for one store, in the order the store first appeared in
/// the cart. Each group becomes its own quotation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup {
    pub tenant_uuid: Option<TenantUuid>,
    pub items: Vec<CartItem>,
}
