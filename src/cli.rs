use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Query length bounds enforced at the boundary, before the index is
/// consulted.
pub const QUERY_MIN_LEN: usize = 3;
pub const QUERY_MAX_LEN: usize = 50;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to operate on (overrides the config file).
    #[clap(long, value_parser, global = true)]
    pub catalog: Option<PathBuf>,

    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub verbose: bool,

    /// Append log output to this file instead of stderr.
    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fuzzy-search the plugin catalog.
    Search {
        /// Query text, 3 to 50 characters.
        query: String,

        /// Only return plugins carrying (approximately) this tag.
        #[clap(short, long, value_parser)]
        tag: Option<String>,

        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// List catalog tags ranked by popularity.
    Tags {
        #[clap(long, value_parser, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// Refresh the catalog from an upstream listing dump.
    Update {
        /// Listing file as fetched from upstream; `-` reads stdin.
        #[clap(short, long, value_parser)]
        input: PathBuf,
    },
    /// Seed the catalog from a hand-maintained awesome-list markdown file.
    Bootstrap {
        /// Markdown file to parse.
        markdown: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
