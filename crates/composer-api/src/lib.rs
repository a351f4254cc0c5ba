//! composer-api: HTTP API layer for the route composer
//!
//! Lets the front end request a route composition for a plan it has
//! already fetched from the quoting backend.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
