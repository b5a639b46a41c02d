use std::time::Instant;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use polished_dex_lib::{
    PipelineOptions, RunSummary, event_channel, load_settings, run_pipeline, run_with_events,
};

use crate::cli_types::ExtractArgs;
use crate::error::CliError;
use crate::spinner::StageSpinner;

/// Flags first, then the settings file, then defaults.
fn resolve_options(args: ExtractArgs) -> PipelineOptions {
    let settings = load_settings();
    let mut options = settings.pipeline_options(args.source, args.out, args.workers);
    options.strict_conditionals |= args.strict;
    options.keep_debug_locations |= args.keep_debug_locations;
    if args.curated_items.is_some() {
        options.curated_items = args.curated_items;
    }
    options
}

pub(crate) fn run_extract(args: ExtractArgs, quiet: bool) -> Result<(), CliError> {
    let options = resolve_options(args);

    log::info!(
        "{}",
        "Polished Crystal extraction".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "Source:  {}",
        options.source_root.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "Output:  {}",
        options.output_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    if options.strict_conditionals {
        log::info!(
            "{}",
            "Strict: files with unterminated conditionals are skipped"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let started = Instant::now();
    let mut spinner = StageSpinner::new(quiet);
    let (event_tx, event_rx) = event_channel();

    let result = rt.block_on(run_with_events(
        run_pipeline(options, Some(event_tx)),
        event_rx,
        |event| spinner.handle(event),
    ));
    spinner.finish();

    let summary = result?;
    print_summary(&summary, spinner.warnings(), started.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(summary: &RunSummary, warnings: usize, seconds: f64) {
    log::info!("");
    log::info!(
        "{} Wrote {} in {:.1}s",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.output_dir.display().if_supports_color(Stdout, |t| t.cyan()),
        seconds,
    );

    let counts = [
        ("moves", summary.moves),
        ("species", summary.species),
        ("abilities", summary.abilities),
        ("evolution families", summary.evolution_families),
        ("trainers", summary.trainers),
        ("locations", summary.locations),
        ("items", summary.items),
        ("static encounters", summary.static_encounters),
    ];
    for (label, count) in counts {
        log::info!("  {:<20} {}", label, count);
    }

    if summary.diagnostics == 0 {
        log::info!(
            "  {}",
            "no diagnostics".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::warn!(
            "  {} {} diagnostics ({} warnings), see diagnostics.json",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.diagnostics,
            warnings,
        );
    }
}
