//! CLI command implementations.

mod ask;
mod config;
mod create;
mod delete;
mod fetch;
mod ingest;
mod list;
mod search;

pub use ask::run_ask;
pub use config::run_config;
pub use create::run_create;
pub use delete::run_delete;
pub use fetch::run_fetch;
pub use ingest::{run_add_text, run_ingest};
pub use list::{run_list, run_stats};
pub use search::{run_context, run_search};
