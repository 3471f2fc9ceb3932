//! Command plugin system
//!
//! Chat front ends hand every `/command args` line to a [`CommandRegistry`],
//! which routes it to the [`CommandPlugin`] registered for that name. Plugins
//! answer through a [`ReplySink`] and never return errors to the host: any
//! failure becomes a user-facing message.

pub mod registry;
pub mod reply;

pub use registry::{ CommandPlugin, CommandRegistry };
pub use reply::{ ReplySink, collect_replies };
