//! State threaded through every stage of a run.
//!
//! Each stage reads what earlier stages left here and adds its own
//! results. Concurrent reads return owned values that the stage folds in
//! sequentially, so nothing in the context is ever shared across tasks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use polished_dex_core::{
    DiagnosticKind, Diagnostics, ItemRecord, LocationRecord, MoveRecord, StaticEncounter,
    TrainerRecord, Variant, VariantMap,
};
use polished_dex_extract::ExtractError;
use polished_dex_extract::events::MapScript;
use polished_dex_extract::evos::EvolutionGraph;
use polished_dex_extract::marts::Mart;
use polished_dex_extract::species::SpeciesTable;

use crate::error::PipelineError;
use crate::pipeline::PipelineOptions;
use crate::progress::{EventSender, PipelineEvent, RunSummary, Stage};
use crate::source::{ReadOptions, SourceFile, SourceTree};
use crate::writer::OutputWriter;

pub struct PipelineContext {
    pub source: SourceTree,
    pub writer: OutputWriter,
    pub options: PipelineOptions,
    pub diagnostics: Diagnostics,
    events: Option<EventSender>,

    pub moves: BTreeMap<String, MoveRecord>,
    pub species: VariantMap<SpeciesTable>,
    pub evolutions: VariantMap<EvolutionGraph>,
    pub trainers: Vec<TrainerRecord>,
    /// Every trainer constant to the file stem of its merged record.
    pub trainer_constants: BTreeMap<String, String>,
    pub locations: BTreeMap<String, LocationRecord>,
    /// Map script contents keyed by location id.
    pub map_scripts: VariantMap<BTreeMap<String, MapScript>>,
    /// Split map scripts, kept for the static encounter stage.
    pub map_sources: Vec<SourceFile>,
    pub marts: VariantMap<Vec<Mart>>,
    pub items: BTreeMap<String, ItemRecord>,
    pub statics: Vec<StaticEncounter>,

    pub summary: RunSummary,
}

impl PipelineContext {
    pub fn new(
        source: SourceTree,
        writer: OutputWriter,
        options: PipelineOptions,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            source,
            writer,
            options,
            diagnostics: Diagnostics::new(),
            events,
            moves: BTreeMap::new(),
            species: VariantMap::new(),
            evolutions: VariantMap::new(),
            trainers: Vec::new(),
            trainer_constants: BTreeMap::new(),
            locations: BTreeMap::new(),
            map_scripts: VariantMap::new(),
            map_sources: Vec::new(),
            marts: VariantMap::new(),
            items: BTreeMap::new(),
            statics: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Send a progress event. A frontend that stopped listening is not an
    /// error.
    pub fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.emit(PipelineEvent::Warning { message });
    }

    /// Merge diagnostics collected by one extractor call, tagging them with
    /// the variant they came from.
    pub fn absorb(&mut self, mut local: Diagnostics, variant: Option<Variant>) {
        if let Some(v) = variant {
            local.tag_variant(v);
        }
        self.diagnostics.extend(local);
    }

    fn read_options(&self, keep_at: bool) -> ReadOptions {
        ReadOptions {
            keep_at,
            strict: self.options.strict_conditionals,
        }
    }

    /// Read and split one file. Failures are logged and recorded; the
    /// caller treats `None` as "no data".
    pub async fn read(&mut self, relative: &str, keep_at: bool) -> Option<SourceFile> {
        let path = self.source.path(relative);
        let result = self.source.load(path.clone(), self.read_options(keep_at)).await;
        self.accept(path, result)
    }

    /// Read and split a batch of files concurrently. Files that fail are
    /// left out; the rest come back sorted by name.
    pub async fn read_batch(&mut self, stage: Stage, paths: Vec<PathBuf>, keep_at: bool) -> Vec<SourceFile> {
        self.emit(PipelineEvent::BatchQueued {
            stage,
            files: paths.len(),
        });
        let results = self
            .source
            .load_batch(paths, self.read_options(keep_at), self.options.workers)
            .await;

        let mut files: Vec<SourceFile> = Vec::with_capacity(results.len());
        for (path, result) in results {
            if let Some(file) = self.accept(path, result) {
                self.emit(PipelineEvent::FileLoaded {
                    stage,
                    name: file.name.clone(),
                });
                files.push(file);
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }

    fn accept(&mut self, path: PathBuf, result: Result<SourceFile, PipelineError>) -> Option<SourceFile> {
        let name = self.source.relative_name(&path);
        match result {
            Ok(mut file) => {
                if file.split.is_unterminated() {
                    self.warn(format!("{name}: unterminated variant conditional"));
                }
                let local = std::mem::take(&mut file.split.diagnostics);
                self.absorb(local, None);
                Some(file)
            }
            Err(PipelineError::Extract(ExtractError::UnterminatedConditional { line, .. })) => {
                self.warn(format!("{name}: skipped, conditional opened at line {line} never closes"));
                self.diagnostics.record(
                    DiagnosticKind::UnterminatedConditional,
                    &name,
                    format!("file skipped: conditional opened at line {line} never closes"),
                );
                None
            }
            Err(e) => {
                self.warn(format!("{name}: {e}"));
                self.diagnostics
                    .record(DiagnosticKind::MissingFile, &name, e.to_string());
                None
            }
        }
    }

    /// Close the run: fill in the totals that are only known at the end.
    pub fn finish(&mut self) -> RunSummary {
        self.summary.diagnostics = self.diagnostics.len();
        self.summary.output_dir = self.writer.root().to_path_buf();
        self.summary.clone()
    }
}
