//! calburn Web - request handling and HTTP surface
//!
//! - `handler`: framework-free Request Handler (index / predict / history)
//! - `form`: parsing of the seven submitted fields
//! - `views`: HTML for the index form and the history table
//! - `routes`: axum router, state, and error-to-status mapping
//! - `config`: layered server configuration
//! - `server`: startup sequence and listener

pub mod config;
pub mod form;
pub mod handler;
pub mod routes;
pub mod server;
pub mod views;

pub use config::{Cli, ServerConfig};
pub use handler::{RequestHandler, View};
pub use routes::{build_router, ApiError, AppState};
