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
#![allow(clippy::module_name_repetitions)]

//! Administrative HTTP API for the Tollgate gateway.
//!
//! Layout: `http/router.rs` (server host and routes), `http/options.rs`
//! (runtime option read/write), `http/log_content.rs` (captured bodies),
//! `http/system.rs` (self-hosted diagnostics), `facade.rs` (log content
//! backend trait), `models.rs` (wire documents).

pub mod error;
pub mod facade;
pub mod http;
pub mod models;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use facade::{LogContentFacade, SharedLogContents};
pub use http::router::ApiServer;
pub use http::system::SystemInfo;
