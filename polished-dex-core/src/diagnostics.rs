//! Recovered conditions collected over a run.
//!
//! Nothing in the pipeline aborts on bad input. Each condition that would
//! otherwise be silently absorbed is recorded here and written out as
//! `diagnostics.json` at the end of the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A source file a stage expects is absent or unreadable.
    MissingFile,
    /// A variant conditional reached end of input without `endc`.
    UnterminatedConditional,
    /// A variant conditional opened inside another one.
    NestedConditional,
    /// `else` or `endc` with no open variant conditional.
    StrayConditional,
    /// A block lacked a line the extractor needs.
    MissingField,
    /// A line was present but its value could not be parsed.
    MalformedField,
    /// A lookup across record families found nothing.
    CrossReferenceMiss,
    /// A structural rule of the data model does not hold.
    InvariantViolation,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing-file",
            Self::UnterminatedConditional => "unterminated-conditional",
            Self::NestedConditional => "nested-conditional",
            Self::StrayConditional => "stray-conditional",
            Self::MissingField => "missing-field",
            Self::MalformedField => "malformed-field",
            Self::CrossReferenceMiss => "cross-reference-miss",
            Self::InvariantViolation => "invariant-violation",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File, record or stage the condition was observed in.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, source: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            variant: None,
            detail: detail.into(),
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.variant {
            Some(v) => write!(f, "[{}] {} ({}): {}", self.kind, self.source, v, self.detail),
            None => write!(f, "[{}] {}: {}", self.kind, self.source, self.detail),
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        source: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(Diagnostic::new(kind, source, detail));
    }

    /// Tag every entry that has no variant yet with `variant`.
    pub fn tag_variant(&mut self, variant: Variant) {
        for d in self.entries.iter_mut().filter(|d| d.variant.is_none()) {
            d.variant = Some(variant);
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Entry count per kind, in declaration order.
    pub fn summary(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.entries {
            *counts.entry(d.kind).or_insert(0) += 1;
        }
        counts
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_kind() {
        let mut d = Diagnostics::new();
        d.record(DiagnosticKind::MissingFile, "data/wild/fish.asm", "not found");
        d.record(DiagnosticKind::CrossReferenceMiss, "bulbasaur", "move tackel");
        d.record(DiagnosticKind::CrossReferenceMiss, "ivysaur", "move tackel");

        let summary = d.summary();
        assert_eq!(summary[&DiagnosticKind::CrossReferenceMiss], 2);
        assert_eq!(summary[&DiagnosticKind::MissingFile], 1);
        assert_eq!(d.count(DiagnosticKind::InvariantViolation), 0);
    }

    #[test]
    fn tag_variant_only_fills_untagged() {
        let mut d = Diagnostics::new();
        d.push(Diagnostic::new(DiagnosticKind::MissingField, "a", "x").with_variant(Variant::Polished));
        d.record(DiagnosticKind::MissingField, "b", "y");
        d.tag_variant(Variant::Faithful);

        let variants: Vec<_> = d.iter().map(|e| e.variant).collect();
        assert_eq!(variants, vec![Some(Variant::Polished), Some(Variant::Faithful)]);
    }

    #[test]
    fn serializes_kind_in_camel_case() {
        let d = Diagnostic::new(DiagnosticKind::UnterminatedConditional, "f.asm", "line 3");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "unterminatedConditional");
        assert!(json.get("variant").is_none());
    }
}
