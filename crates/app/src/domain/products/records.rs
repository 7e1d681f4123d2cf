//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,

    /// Display name shown on the storefront.
    pub name: String,

    pub description: Option<String>,

    /// Unit price in minor currency units.
    pub price: u64,

    /// Primary image URL.
    pub image: Option<String>,

    /// Offered size variants. Empty when the product has a single size.
    pub sizes: Vec<String>,

    /// Offered color variants. Empty when the product has a single color.
    pub colors: Vec<String>,

    /// Whether the product is visible on the public storefront.
    pub active: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
