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

//! Shared data access layer for Tollgate: migrations, option rows, and log content.

pub mod error;
pub mod log_content;
pub mod options;

pub use error::{DataError, Result as DataResult};
pub use log_content::{LogContent, LogContentStore, LogRecordIndex, PgLogRecordIndex};
pub use options::{OptionRow, fetch_options, run_migrations, upsert_option};
