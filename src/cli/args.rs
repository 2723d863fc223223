use crate::output::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "refit")]
#[command(about = "Rule-based source rewriting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the nearest .refit.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Discovery options shared by `process` and `discover`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    /// Files, directories or directory globs (defaults to `paths` from config)
    pub paths: Vec<String>,

    /// File suffix to pick up from directories, without the dot (repeatable)
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub suffixes: Vec<String>,

    /// Exclude pattern, literal substring or glob (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite source units in place
    Process {
        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Repeat passes until no rule applies
        #[arg(long)]
        converge: bool,

        /// Pass limit for --converge
        #[arg(long, value_name = "N")]
        max_passes: Option<usize>,

        /// Only run these rules (comma separated)
        #[arg(long, value_delimiter = ',')]
        rules: Option<Vec<String>>,

        /// Number of parallel jobs (0 = all cores)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the source units a run would process
    Discover {
        #[command(flatten)]
        discovery: DiscoveryArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },

    /// Describe the available rules with before/after samples
    Rules {
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
