// Hotel intelligence reports: fetch one search-grounded report, normalize it
// against a canonical schema, and derive the views and spreadsheet sheets
// built on top of it.
pub mod config;
pub mod error;
pub mod export;
pub mod intel;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod schema;
pub mod session;
pub mod sort;
pub mod source;
pub mod types;
pub mod util;
