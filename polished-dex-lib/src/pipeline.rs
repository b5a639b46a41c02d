//! Run orchestration: stages in fixed order over one shared context.

use std::path::PathBuf;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::progress::{EventSender, PipelineEvent, RunSummary, Stage};
use crate::source::SourceTree;
use crate::stages;
use crate::writer::OutputWriter;

/// Concurrent file reads per batch when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 8;

/// Fully resolved inputs of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub workers: usize,
    /// Skip files with an unterminated variant conditional instead of
    /// keeping the open branch.
    pub strict_conditionals: bool,
    /// Extract static encounters from test-only maps too.
    pub keep_debug_locations: bool,
    /// Directory of curated item YAML files.
    pub curated_items: Option<PathBuf>,
}

impl PipelineOptions {
    pub fn new(source_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_dir: output_dir.into(),
            workers: DEFAULT_WORKERS,
            strict_conditionals: false,
            keep_debug_locations: false,
            curated_items: None,
        }
    }
}

/// Extract, cross-reference and write the whole data set.
///
/// Stages run strictly in order; each one finishes its concurrent reads and
/// its writes before the next starts. Source problems never fail the run:
/// they end up in `diagnostics.json`. Only an unusable source root or a
/// failed write is an error.
pub async fn run_pipeline(
    options: PipelineOptions,
    events: Option<EventSender>,
) -> Result<RunSummary, PipelineError> {
    let source = SourceTree::open(&options.source_root)?;
    let writer = OutputWriter::new(&options.output_dir);
    writer.prepare()?;

    log::info!(
        "Extracting {} into {} ({} workers)",
        options.source_root.display(),
        options.output_dir.display(),
        options.workers
    );

    let mut ctx = PipelineContext::new(source, writer, options, events);
    let total = Stage::ALL.len();

    for (index, &stage) in Stage::ALL.iter().enumerate() {
        ctx.emit(PipelineEvent::StageStarted { stage, index, total });
        let records = match stage {
            Stage::Moves => stages::moves::run(&mut ctx).await?,
            Stage::Species => stages::species::run(&mut ctx).await?,
            Stage::Trainers => stages::trainers::run(&mut ctx).await?,
            Stage::Locations => stages::locations::run(&mut ctx).await?,
            Stage::Items => stages::items::run(&mut ctx).await?,
            Stage::StaticEncounters => stages::statics::run(&mut ctx).await?,
            Stage::Finish => stages::finish::run(&mut ctx)?,
        };
        log::info!("{stage}: {records} records");
        ctx.emit(PipelineEvent::StageFinished { stage, records });
    }

    let summary = ctx.finish();
    ctx.emit(PipelineEvent::Done {
        summary: summary.clone(),
    });
    Ok(summary)
}
