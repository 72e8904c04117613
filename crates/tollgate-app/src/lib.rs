#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(dead_code, unused, unused_imports, unreachable_pub)]

//! Tollgate application bootstrap wiring.
//!
//! Layout: `settings.rs` (environment parsing), `bootstrap.rs` (service
//! wiring), `retention.rs` (background log content pruning).

/// Application bootstrap and shutdown handling.
pub mod bootstrap;
/// Application-level error types.
pub mod error;
/// Periodic pruning of captured log bodies.
pub mod retention;
/// Process settings read from the environment.
pub mod settings;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use settings::AppSettings;
