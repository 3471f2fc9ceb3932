//! Data models for Buff163 market responses

use serde::{ Deserialize, Deserializer };

/// Market API response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<MarketPage>,
}

impl MarketResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "OK"
    }

    /// Best human-readable explanation the market gave for a failure
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.msg.clone())
            .unwrap_or_default()
    }
}

/// One page of goods listings
#[derive(Debug, Clone, Deserialize)]
pub struct MarketPage {
    #[serde(default)]
    pub items: Vec<MarketItem>,
    #[serde(default)]
    pub page_num: Option<u32>,
    #[serde(default)]
    pub total_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// A goods listing: an item and its current lowest asking price
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketItem {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(deserialize_with = "price_text")]
    pub sell_min_price: String,
    #[serde(default)]
    pub sell_num: Option<u64>,
    #[serde(default)]
    pub market_hash_name: Option<String>,
}

impl MarketItem {
    pub fn new(name: impl Into<String>, sell_min_price: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sell_min_price: sell_min_price.into(),
            sell_num: None,
            market_hash_name: None,
        }
    }
}

/// Prices arrive as `"85.5"` but some responses use bare numbers
fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error> where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Price::deserialize(deserializer)? {
        Price::Text(text) => text,
        Price::Number(number) => number.to_string(),
    })
}
