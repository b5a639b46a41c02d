//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use polished_dex_core::Variant;

#[derive(Parser)]
#[command(name = "polished-dex")]
#[command(about = "Extract Pokédex data from the Polished Crystal sources", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of `extract`. Anything left out comes from the settings file.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ExtractArgs {
    /// Root of the Polished Crystal source tree
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory for the JSON data set
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Concurrent file reads per batch
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Skip files whose variant conditionals never close
    #[arg(long)]
    pub strict: bool,

    /// Also extract encounters from test-only maps
    #[arg(long)]
    pub keep_debug_locations: bool,

    /// Directory of curated item YAML files
    #[arg(long)]
    pub curated_items: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract every record family and write the data set
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Show or edit the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Look at how the extractor sees a single source file
    Inspect {
        #[command(subcommand)]
        action: InspectAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the values a run would use
    Show,
    /// Print the settings file path
    Path,
    /// Save the source tree root (omit the path to clear it)
    SetSource { path: Option<PathBuf> },
    /// Save the output directory (omit the path to clear it)
    SetOutput { path: Option<PathBuf> },
}

#[derive(Subcommand)]
pub(crate) enum InspectAction {
    /// Print both variant streams of one file and its split diagnostics
    Split {
        file: PathBuf,

        /// Only print this variant's stream
        #[arg(long)]
        only: Option<VariantArg>,

        /// Keep `@` string terminators
        #[arg(long)]
        keep_at: bool,

        /// Fail on an unterminated variant conditional
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum VariantArg {
    Polished,
    Faithful,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Polished => Variant::Polished,
            VariantArg::Faithful => Variant::Faithful,
        }
    }
}
