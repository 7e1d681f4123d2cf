//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub image: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

/// Product Update Data
///
/// Updates replace the full editable field set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub image: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub active: bool,
}
