//! Line-oriented TCP chat gateway
//!
//! Each client line is one chat message. Lines starting with `/` are routed
//! through the command registry; every reply is written back as its text
//! followed by a blank line.

mod async_server;
pub mod connection;

pub use async_server::{ run_async_server, serve };
pub use connection::{ dispatch_line, handle_connection };
