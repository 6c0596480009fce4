//! Shipping rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::price::Price;

/// One entry of the province shipping table.
///
/// The table is maintained outside this crate, so records are carried as
/// opaque JSON and written back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Province(Value);

impl Province {
    /// Wrap a raw province record.
    #[must_use]
    pub const fn new(record: Value) -> Self {
        Self(record)
    }

    /// The record's `name` field, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// The raw JSON record.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Province {
    fn from(record: Value) -> Self {
        Self(record)
    }
}

/// Shipping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettings {
    /// Province table, in display order.
    pub provinces: Vec<Province>,
    /// Order subtotal at or above which shipping is free.
    pub free_shipping_threshold: Price,
    /// Lowest shipping charge.
    pub min_price: Price,
    /// Highest shipping charge.
    pub max_price: Price,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            provinces: Vec::new(),
            free_shipping_threshold: Price::from_units(5000),
            min_price: Price::from_units(300),
            max_price: Price::from_units(800),
        }
    }
}

impl ShippingSettings {
    /// Default settings with the given province table.
    #[must_use]
    pub fn with_provinces(provinces: Vec<Province>) -> Self {
        Self {
            provinces,
            ..Self::default()
        }
    }

    /// Whether an order subtotal qualifies for free shipping.
    #[must_use]
    pub fn qualifies_for_free_shipping(&self, subtotal: Price) -> bool {
        subtotal >= self.free_shipping_threshold
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_provinces_are_preserved_verbatim() {
        let raw = json!({
            "provinces": [
                {"name": "Punjab", "cities": ["Lahore", "Multan"], "rate": 300},
                {"name": "Sindh", "rate": 450},
                "unexpected shape"
            ],
            "freeShippingThreshold": 5000,
            "minPrice": 300,
            "maxPrice": 800
        });
        let shipping: ShippingSettings = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(shipping.provinces.len(), 3);
        assert_eq!(shipping.provinces[0].name(), Some("Punjab"));
        assert_eq!(shipping.provinces[2].name(), None);

        let back = serde_json::to_value(&shipping).unwrap();
        assert_eq!(back["provinces"], raw["provinces"]);
    }

    #[test]
    fn test_free_shipping_threshold_is_inclusive() {
        let shipping = ShippingSettings::default();
        assert!(!shipping.qualifies_for_free_shipping(Price::from_units(4999)));
        assert!(shipping.qualifies_for_free_shipping(Price::from_units(5000)));
    }
}
