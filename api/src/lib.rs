//! WESCU Chat API Module
//!
//! The API module provides the HTTP endpoints the website talks to: session
//! minting for the embedded chat widget, static panel configuration, the
//! spoken greeting, the current-time helper and the widget loader script.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::*;
pub use handlers::*;
pub use server::*;
