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

//! Runtime option store for the Tollgate gateway.
//!
//! Layout: `value.rs` (boundary value type and normalization), `validate.rs`
//! (per-key rule registry), `payload.rs` and `console.rs` (structured value
//! checks), `redact.rs` (export filter), `store.rs` (`OptionStore` and the
//! durability sink contract), `service.rs` (Postgres bootstrap).

pub mod console;
pub mod defaults;
pub mod error;
pub mod keys;
pub mod payload;
pub mod redact;
pub mod service;
pub mod store;
pub mod validate;
pub mod value;

pub use defaults::default_options;
pub use error::{ConfigError, ConfigResult, SinkError};
pub use payload::StatusCodeRanges;
pub use redact::{SENSITIVE_SUFFIXES, is_sensitive};
pub use service::{ConfigService, PgOptionSink};
pub use store::{OptionEntry, OptionSink, OptionStore};
pub use validate::{OptionLookup, OptionRule, ValidatorRegistry};
pub use value::OptionValue;
