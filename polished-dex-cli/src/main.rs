//! polished-dex CLI
//!
//! Command-line interface for extracting the Polished Crystal data set.

use std::io::Write;

use clap::Parser;
use env_logger::Env;

mod cli_types;
mod commands;
mod error;
mod spinner;

use cli_types::{Cli, Commands, ConfigAction, InspectAction};
use commands::config::{run_config_path, run_config_set_output, run_config_set_source, run_config_show};
use commands::extract::run_extract;
use commands::inspect::run_inspect_split;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Extract { args } => run_extract(args, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                run_config_show();
                Ok(())
            }
            ConfigAction::Path => {
                run_config_path();
                Ok(())
            }
            ConfigAction::SetSource { path } => run_config_set_source(path),
            ConfigAction::SetOutput { path } => run_config_set_output(path),
        },
        Commands::Inspect { action } => match action {
            InspectAction::Split {
                file,
                only,
                keep_at,
                strict,
            } => run_inspect_split(&file, only.map(Into::into), keep_at, strict),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Plain messages on stdout by default; `--verbose` adds timestamps and
/// debug output from every crate. `RUST_LOG` overrides either.
fn init_logging(quiet: bool, verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        // Per-stage pipeline chatter is shown by the spinner instead.
        "info,polished_dex_lib=warn"
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Error => writeln!(buf, "error: {}", record.args()),
            _ => writeln!(buf, "{}", record.args()),
        });
    }
    builder.init();
}
