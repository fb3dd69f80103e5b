//! Fatura - credit card invoice tracking from the terminal
//!
//! Records card purchases and installment plans, groups them into monthly
//! invoices according to each card's closing and due days, and reports how
//! much of every card's limit is still available.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Cards, purchases, installments, paid invoices, recurring markers
//! - `engine`: Pure invoice allocation and available-credit computations
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `fatura` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fatura::config::FaturaPaths;
//! use fatura::services::InvoiceService;
//! use fatura::storage::Storage;
//!
//! let mut storage = Storage::new(FaturaPaths::new()?)?;
//! storage.load_all()?;
//! let buckets = InvoiceService::new(&storage).list(card_id)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FaturaError, FaturaResult};

use std::sync::Once;

/// Environment variable holding a `tracing` filter, e.g. `fatura=debug`
pub const LOG_ENV: &str = "FATURA_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr.
///
/// The filter comes from `FATURA_LOG` when set, otherwise `default_level`.
/// Later calls are no-ops.
pub fn init_tracing(default_level: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
