//! Stage spinner for a running extraction.
//!
//! One spinner line follows the pipeline's progress events; finished stages
//! are printed above it as permanent lines.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use polished_dex_lib::{PipelineEvent, Stage};

pub struct StageSpinner {
    pb: ProgressBar,
    position: String,
    batch_total: usize,
    batch_loaded: usize,
    warnings: usize,
}

impl StageSpinner {
    /// When `quiet` is true the spinner is hidden; finished stages are
    /// still reported through the log.
    pub fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        // The template is a literal; a parse failure leaves the default style.
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            position: String::new(),
            batch_total: 0,
            batch_loaded: 0,
            warnings: 0,
        }
    }

    /// Warnings seen so far.
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn handle(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage, index, total } => {
                self.position = format!("[{}/{}]", index + 1, total);
                self.batch_total = 0;
                self.batch_loaded = 0;
                self.pb.set_message(format!("{} {}", self.position, stage));
            }
            PipelineEvent::BatchQueued { stage, files } => {
                self.batch_total = files;
                self.batch_loaded = 0;
                self.pb
                    .set_message(format!("{} {}: reading {} files", self.position, stage, files));
            }
            PipelineEvent::FileLoaded { stage, name } => {
                self.batch_loaded += 1;
                self.pb.set_message(format!(
                    "{} {}: {}/{} {}",
                    self.position, stage, self.batch_loaded, self.batch_total, name
                ));
            }
            PipelineEvent::StageFinished { stage, records } => {
                self.pb.suspend(|| print_stage(stage, records));
            }
            // Already logged by the pipeline.
            PipelineEvent::Warning { .. } => self.warnings += 1,
            PipelineEvent::Done { .. } => self.pb.set_message("done"),
        }
    }

    pub fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

fn print_stage(stage: Stage, records: usize) {
    log::info!(
        "  {} {:<18} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stage.label(),
        format!("{records} records").if_supports_color(Stdout, |t| t.dimmed()),
    );
}
