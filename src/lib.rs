pub mod bootstrap;
pub mod catalog;
pub mod cli;
mod config;
pub mod error;
pub mod ingest;
pub mod merge;
pub mod output;
pub mod plugin;
pub mod search;
pub mod tags;

pub use crate::cli::{Cli, Commands, OutputFormat, QUERY_MAX_LEN, QUERY_MIN_LEN};
pub use crate::config::Config;
pub use crate::error::{PlugseekError, Result};
pub use crate::merge::merge;
pub use crate::output::{ScoredPlugin, SearchResponse, TagsResponse};
pub use crate::plugin::Plugin;
pub use crate::search::{Hit, SearchIndex};
pub use crate::tags::{count_tags, ranked_tags};
pub use clap::Parser;

use crate::error::PlugseekError as Error;

/// Boundary validation applied before any search work happens: the query
/// must be 3 to 50 characters. Length is counted in characters, not bytes,
/// so multibyte queries are not unfairly rejected.
pub fn validate_query(query: &str) -> Result<()> {
    let len = query.chars().count();
    if !(QUERY_MIN_LEN..=QUERY_MAX_LEN).contains(&len) {
        return Err(Error::Validation(format!(
            "query must be between {QUERY_MIN_LEN} and {QUERY_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}
