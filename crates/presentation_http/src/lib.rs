//! Prononce HTTP presentation layer
//!
//! axum server exposing the pronunciation tutoring flows.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::{apply_middleware, create_router};
pub use shutdown::{Drain, run_until_drained, shutdown_signal};
pub use state::AppState;
