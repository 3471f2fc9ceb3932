//! # Buff163 Price Bot Library
//!
//! A chat bot plugin that answers `/查价格 <item>` with the lowest asking
//! prices listed on the Buff163 marketplace.
//!
//! The crate contains:
//! - A marketplace client with explicit credential and locale headers
//! - The price lookup plugin (matching, formatting, user-facing errors)
//! - A small command registry so the plugin can be hosted by any chat front end
//! - A line-oriented TCP chat gateway used by the bundled binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use buff_price_bot::{ PricePlugin, Settings };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load(None)?;
//!     let plugin = PricePlugin::new(&settings);
//!
//!     for message in plugin.search_price_replies("AK-47 | 红线").await {
//!         println!("{}", message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod plugins;
pub mod server;
pub mod services;

pub use config::Settings;
pub use crate::core::{ ChatCommand, parse_chat_line };
pub use plugins::{ CommandPlugin, CommandRegistry, ReplySink };
pub use services::buff::{ BuffClient, ListingSource, MarketError, MarketItem };
pub use services::price::PricePlugin;

/// Build a registry with every command this crate provides
///
/// The price plugin is always registered; without a session cookie it
/// answers with the disabled message instead of querying the market.
pub fn default_registry(settings: &Settings) -> anyhow::Result<CommandRegistry> {
    let mut registry = CommandRegistry::new();
    registry.register(std::sync::Arc::new(PricePlugin::new(settings)))?;
    Ok(registry)
}
