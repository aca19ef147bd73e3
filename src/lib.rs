#![doc(test(attr(deny(warnings))))]

//! Finance Core turns a snapshot of transactions, categories and savings goals
//! into monthly summaries, trends, budget progress and insights.
//!
//! The analytics live in `pfd-core`; this crate wires them to configuration,
//! JSON storage and a read-only reporting CLI.

pub mod cli;
pub mod errors;
pub mod report;
pub mod utils;

pub use errors::{FinanceError, FinanceResult};
pub use pfd_config as config;
pub use pfd_core as analytics;
pub use pfd_domain as domain;
pub use pfd_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
