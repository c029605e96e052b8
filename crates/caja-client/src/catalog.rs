//! # Catalog Payloads
//!
//! Converts product records from the backend into core [`Product`]s.
//!
//! ```text
//! { "id": 7, "name": "Café", "price": "12.50", "sku": "CAF-1" }
//!         │
//!         ▼  ApiProduct (serde)
//!         │  price: Decimal ──► Money::from_decimal (half away from zero)
//!         ▼  validate_product
//! Product { id: 7, price_cents: 1250, … }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;

use caja_core::validation::validate_product;
use caja_core::{CoreError, Money, Product, ProductId};

use crate::error::{ClientError, ClientResult};

/// Product record as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub id: ProductId,
    pub name: String,
    /// Decimal number or numeric string.
    pub price: Decimal,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<ApiProduct> for Product {
    type Error = ClientError;

    fn try_from(api: ApiProduct) -> ClientResult<Self> {
        let price = Money::from_decimal(api.price).ok_or_else(|| {
            ClientError::InvalidPayload(format!("price out of range: {}", api.price))
        })?;

        let mut product = Product::new(api.id, api.name, price);
        product.sku = api.sku.filter(|s| !s.trim().is_empty());
        product.image_url = api.image_url.filter(|u| !u.trim().is_empty());

        validate_product(&product).map_err(CoreError::from)?;
        Ok(product)
    }
}

/// Parses a JSON product list, rejecting the whole batch on the first bad record.
pub fn parse_products(json: &str) -> ClientResult<Vec<Product>> {
    let records: Vec<ApiProduct> =
        serde_json::from_str(json).map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

    records.into_iter().map(Product::try_from).collect()
}
