//! pfd-core
//!
//! Analytics engine for the personal finance dashboard.
//! Depends on pfd-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod breakdown_service;
pub mod budget_service;
pub mod category_tree;
pub mod error;
pub mod filters;
pub mod format;
pub mod insight_service;
pub mod options;
pub mod periods;
pub mod savings_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod trend_service;

pub use breakdown_service::*;
pub use budget_service::*;
pub use category_tree::{CategoryNode, CategoryTree};
pub use error::{CoreError, CoreResult};
pub use filters::{AmountRange, TransactionFilter};
pub use format::*;
pub use insight_service::*;
pub use options::*;
pub use periods::{InsightsPeriod, InsightsPeriodKind, MonthRef, PresetRange};
pub use savings_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use trend_service::*;

#[cfg(test)]
mod tests;
