//! CLI command handlers, one file per command.

mod config;
mod delete;
mod export;
mod import;
mod query_range;
mod series;

pub use config::run_config;
pub use delete::run_delete;
pub use export::run_export;
pub use import::run_import;
#[cfg(test)]
pub(crate) use import::build_request;
pub use query_range::run_query_range;
pub use series::run_series;
