use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use polished_dex_core::Variant;
use polished_dex_extract::{SplitOptions, split_strict, split_variants};

use crate::error::CliError;

/// Print the variant streams of one source file, numbered, followed by
/// whatever the splitter had to recover from.
pub(crate) fn run_inspect_split(
    file: &Path,
    only: Option<Variant>,
    keep_at: bool,
    strict: bool,
) -> Result<(), CliError> {
    let text = std::fs::read_to_string(file)?;
    let name = file.display().to_string();
    let options = SplitOptions::new().keep_at(keep_at);
    let split = if strict {
        split_strict(&name, &text, options)?
    } else {
        split_variants(&name, &text, options)
    };

    for &variant in Variant::all() {
        if only.is_some_and(|v| v != variant) {
            continue;
        }
        let lines = split.lines(variant);
        log::info!(
            "{} {}",
            variant.as_str().if_supports_color(Stdout, |t| t.bold()),
            format!("({} lines)", lines.len()).if_supports_color(Stdout, |t| t.dimmed()),
        );
        for (i, line) in lines.iter().enumerate() {
            log::info!(
                "{:>5}  {}",
                (i + 1).if_supports_color(Stdout, |t| t.dimmed()),
                line
            );
        }
        log::info!("");
    }

    if split.diagnostics.is_empty() {
        log::info!(
            "{}",
            "No split diagnostics".if_supports_color(Stdout, |t| t.green()),
        );
        return Ok(());
    }
    log::info!(
        "{}",
        format!("{} split diagnostics:", split.diagnostics.len())
            .if_supports_color(Stdout, |t| t.yellow()),
    );
    for d in split.diagnostics.iter() {
        log::info!(
            "  {} {}",
            d.kind.as_str().if_supports_color(Stdout, |t| t.yellow()),
            d.detail
        );
    }
    Ok(())
}
