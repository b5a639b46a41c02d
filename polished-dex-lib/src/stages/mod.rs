//! Pipeline stages. Each `run` returns the number of records it produced.

pub mod finish;
pub mod items;
pub mod locations;
pub mod moves;
pub mod species;
pub mod statics;
pub mod trainers;

use polished_dex_core::Variant;
use polished_dex_extract::{Line, classify_all};

use crate::source::SourceFile;

/// Classified lines of one variant of an optional file; empty when the
/// file could not be read.
pub(crate) fn classified(file: Option<&SourceFile>, variant: Variant) -> Vec<Line<'_>> {
    file.map(|f| classify_all(f.split.lines(variant)))
        .unwrap_or_default()
}

/// Source name for diagnostics of an optional file.
pub(crate) fn name_of<'a>(file: Option<&'a SourceFile>, fallback: &'a str) -> &'a str {
    file.map_or(fallback, |f| f.name.as_str())
}
