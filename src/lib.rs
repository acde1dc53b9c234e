// Receipt Processor - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod error;
pub mod model;
pub mod scoring;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{AmountField, ScoreError};
pub use model::{Item, Receipt};
pub use scoring::{score_receipt, PointsScorer, ScoreBreakdown, ScoringPolicy};
pub use store::ReceiptStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
