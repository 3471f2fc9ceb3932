pub mod buff;
pub mod help;
pub mod price;

pub use buff::{ BuffClient, ListingSource, MarketError, MarketItem };
pub use help::{ generate_help_response, unknown_command_response };
pub use price::PricePlugin;
