//! The extraction pipeline: reads a Polished Crystal source tree, extracts
//! both balance variants, cross-references the record families and writes
//! the JSON data set.

pub mod async_util;
pub mod backfill;
pub mod context;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod settings;
pub mod source;
pub mod stages;
pub mod writer;

pub use async_util::{EventSource, run_with_events};
pub use error::PipelineError;
pub use pipeline::{DEFAULT_WORKERS, PipelineOptions, run_pipeline};
pub use progress::{EventReceiver, EventSender, PipelineEvent, RunSummary, Stage, event_channel};
pub use settings::{
    Settings, load_settings, load_settings_string, save_output_dir, save_source_root,
    settings_path,
};
pub use source::{ReadOptions, SourceFile, SourceTree};
pub use writer::OutputWriter;
