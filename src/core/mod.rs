pub mod command;
pub mod logger;

pub use command::*;
