//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::AggregateKind;

/// Trees of doubly linked info lists: render, walk and aggregate by position
#[derive(Parser, Debug)]
#[command(name = "infotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree, one line per node
    Tree {
        /// Tree manifest (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: String,
        /// Show every record of each node instead of the first
        #[arg(long)]
        full: bool,
    },

    /// Print the records of one node
    List {
        /// Tree manifest (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: String,
        /// Node path as dot-separated child indices, empty for the root
        #[arg(short, long, default_value = "")]
        node: String,
        /// Walk from tail to head
        #[arg(short, long)]
        backward: bool,
    },

    /// Aggregate records position by position across all nodes
    Sync {
        /// Tree manifest (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: String,
        /// Start node path, empty for the root
        #[arg(short, long, default_value = "")]
        from: String,
        /// Aggregate applied to every position group
        #[arg(short, long, value_enum, default_value_t = AggregateKind::Count)]
        aggregate: AggregateKind,
        /// Attribute read by numeric aggregates
        #[arg(long)]
        attr: Option<String>,
        /// Stop after this many positions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show tree statistics
    Info {
        /// Tree manifest (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        manifest: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings as TOML
    Show,
    /// Print the global config file path
    Path,
}
