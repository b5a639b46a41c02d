use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use polished_dex_lib::{
    load_settings, load_settings_string, save_output_dir, save_source_root, settings_path,
};

use crate::error::CliError;

/// Show the settings file and the values an `extract` without flags would
/// use.
pub(crate) fn run_config_show() {
    let path = settings_path();

    log::info!(
        "{}",
        "polished-dex Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if let Some(contents) = load_settings_string() {
        log::info!("");
        for line in contents.lines() {
            log::info!("    {}", line.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
    log::info!("");

    let settings = load_settings();
    let options = settings.pipeline_options(None, None, None);
    log::info!("{}", "Resolved values:".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  source root:          {}", options.source_root.display());
    log::info!("  output dir:           {}", options.output_dir.display());
    log::info!("  workers:              {}", options.workers);
    log::info!("  strict conditionals:  {}", options.strict_conditionals);
    log::info!("  keep debug locations: {}", options.keep_debug_locations);
    log::info!(
        "  curated items:        {}",
        options
            .curated_items
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

pub(crate) fn run_config_set_source(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.map(std::path::absolute).transpose()?;
    if let Some(p) = &path
        && !p.is_dir()
    {
        return Err(CliError::config(format!("{} is not a directory", p.display())));
    }
    save_source_root(path.as_deref())?;
    report_saved("source root", path.as_deref());
    Ok(())
}

pub(crate) fn run_config_set_output(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.map(std::path::absolute).transpose()?;
    save_output_dir(path.as_deref())?;
    report_saved("output dir", path.as_deref());
    Ok(())
}

fn report_saved(what: &str, path: Option<&Path>) {
    match path {
        Some(p) => log::info!(
            "{} {} set to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            what,
            p.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "{} {} cleared",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            what,
        ),
    }
    log::info!(
        "  {}",
        settings_path()
            .display()
            .if_supports_color(Stdout, |t| t.dimmed())
    );
}
