use serde::{Deserialize, Serialize};

/// Consumer purchase used to translate a savings amount into something tangible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalentGoodItem {
    pub id: String,
    pub label: String,
    pub unit_price_usd: f64,
}

impl EquivalentGoodItem {
    pub fn new(id: &str, label: &str, unit_price_usd: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit_price_usd,
        }
    }
}

/// How many of an item a savings amount buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equivalent {
    pub item: EquivalentGoodItem,
    pub count: f64,
}
