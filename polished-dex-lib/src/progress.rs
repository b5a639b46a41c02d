//! Progress events emitted while the pipeline runs.
//!
//! Events travel over an unbounded `tokio::sync::mpsc` channel; a frontend
//! drains them with [`crate::async_util::run_with_events`].

use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::mpsc;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Moves,
    Species,
    Trainers,
    Locations,
    Items,
    StaticEncounters,
    /// Location cross-references, location files and the diagnostics report.
    Finish,
}

impl Stage {
    pub const ALL: &'static [Stage] = &[
        Stage::Moves,
        Stage::Species,
        Stage::Trainers,
        Stage::Locations,
        Stage::Items,
        Stage::StaticEncounters,
        Stage::Finish,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Moves => "moves",
            Self::Species => "species",
            Self::Trainers => "trainers",
            Self::Locations => "locations",
            Self::Items => "items",
            Self::StaticEncounters => "static encounters",
            Self::Finish => "finish",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A stage has started (`index` is 0-based).
    StageStarted {
        stage: Stage,
        index: usize,
        total: usize,
    },
    /// A concurrent read batch was queued.
    BatchQueued { stage: Stage, files: usize },
    /// One file of a batch has been read and split.
    FileLoaded { stage: Stage, name: String },
    /// A stage finished with `records` output records.
    StageFinished { stage: Stage, records: usize },
    /// A recovered problem worth showing to the user.
    Warning { message: String },
    /// The run is complete.
    Done { summary: RunSummary },
}

/// Record counts of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub moves: usize,
    pub species: usize,
    pub abilities: usize,
    pub evolution_families: usize,
    pub trainers: usize,
    pub locations: usize,
    pub items: usize,
    pub static_encounters: usize,
    pub diagnostics: usize,
    pub output_dir: PathBuf,
}

pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PipelineEvent>;

/// Channel for pipeline events.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
