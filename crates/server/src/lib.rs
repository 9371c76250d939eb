//! HTTP surface for document and handbook question answering.

pub mod api;
pub mod app_config;
pub mod cli;
pub mod error;
pub mod router;
pub mod state;

pub use app_config::build_state;
pub use router::build_router;
pub use state::AppState;
