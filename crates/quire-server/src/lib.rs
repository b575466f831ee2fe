//! Serving and live regeneration for quire sites.
//!
//! A [`Scheduler`] polls the notes directory and rebuilds the site on change,
//! while the HTTP server serves the output directory, a rebuild trigger and
//! the booking form endpoint.

pub mod scheduler;
pub mod server;

pub use scheduler::{Scheduler, TickOutcome, DEFAULT_INTERVAL};
pub use server::{router, AppState, QuireServer, ServerConfig, ServerError};
