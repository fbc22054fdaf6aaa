//! Catalog domain: records, normalization, loading, querying and market data

pub mod cache;
pub mod config;
pub mod fund;
pub mod history;
pub mod loader;
pub mod log;
pub mod normalize;
pub mod query;

// Re-export main types for cleaner imports
pub use fund::{Fund, RiskLevel};
pub use history::{HistoricalPeriod, HistoryProvider, PriceHistory, PricePoint, SymbolNotFound};
pub use loader::{load_funds, parse_funds};
pub use query::{FundPage, FundQuery, QueryParams, SortKey, run_query};
