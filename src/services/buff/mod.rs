//! Buff163 marketplace access
//!
//! [`ListingSource`] is the narrow seam between the price command and the
//! data acquisition: search text in, item records out. [`BuffClient`] talks to
//! the JSON goods endpoint; the body decoding lives in [`parse_listings`] so
//! it can be exercised and replaced on its own.

pub mod client;
pub mod error;
pub mod models;
pub mod parser;

use async_trait::async_trait;

pub use client::{ BuffClient, BuffClientOptions };
pub use error::{ MarketError, MarketResult };
pub use models::{ MarketItem, MarketPage, MarketResponse };
pub use parser::parse_listings;

/// Something that can list marketplace goods for a search text
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, query: &str) -> MarketResult<Vec<MarketItem>>;
}

#[async_trait]
impl ListingSource for BuffClient {
    async fn fetch_listings(&self, query: &str) -> MarketResult<Vec<MarketItem>> {
        self.search_goods(query).await
    }
}
