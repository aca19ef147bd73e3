//! pfd-domain
//!
//! Pure domain models (Transaction, Category, SavingsGoal) and the derived
//! report structures produced by the analytics engine.
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod budget;
pub mod category;
pub mod common;
pub mod goal;
pub mod summary;
pub mod transaction;
pub mod trend;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use goal::*;
pub use summary::*;
pub use transaction::*;
pub use trend::*;
