//! Variant splitter.
//!
//! Source files interleave the two balance variants with
//! `if DEF(FAITHFUL)` / `else` / `endc` blocks (and the mirrored
//! `if !DEF(FAITHFUL)`). [`split_variants`] resolves them into one line
//! stream per variant. Marker lines are consumed; every other line lands in
//! one or both streams, in order.

use polished_dex_core::{Diagnostic, DiagnosticKind, Diagnostics, Variant, VariantMap};

use crate::error::ExtractError;

/// Options that control line normalization while splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Keep `@` characters. Trainer parties use `@` to separate a species
    /// from its held item, and text blocks use it as a terminator.
    pub keep_at: bool,
}

impl SplitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_at(mut self, keep_at: bool) -> Self {
        self.keep_at = keep_at;
        self
    }
}

/// Both variant streams of one source file.
#[derive(Debug, Clone, Default)]
pub struct SplitSource {
    pub polished: Vec<String>,
    pub faithful: Vec<String>,
    pub diagnostics: Diagnostics,
    /// Line of a conditional still open at end of input.
    pub unterminated_at: Option<usize>,
}

impl SplitSource {
    pub fn lines(&self, variant: Variant) -> &[String] {
        match variant {
            Variant::Polished => &self.polished,
            Variant::Faithful => &self.faithful,
        }
    }

    fn push(&mut self, variant: Variant, line: String) {
        match variant {
            Variant::Polished => self.polished.push(line),
            Variant::Faithful => self.faithful.push(line),
        }
    }

    fn push_both(&mut self, line: String) {
        self.faithful.push(line.clone());
        self.polished.push(line);
    }

    pub fn is_unterminated(&self) -> bool {
        self.unterminated_at.is_some()
    }

    pub fn into_variants(self) -> (VariantMap<Vec<String>>, Diagnostics) {
        let map = VariantMap {
            polished: Some(self.polished),
            faithful: Some(self.faithful),
        };
        (map, self.diagnostics)
    }
}

/// Trim a raw line and apply the display-string substitutions: `#` and
/// `Poke` become `Poké`, and `@` is dropped unless `keep_at` is set.
pub fn normalize_line(raw: &str, keep_at: bool) -> String {
    let line = raw.trim().replace('#', "Poké").replace("Poke", "Poké");
    if keep_at { line } else { line.replace('@', "") }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    If { faithful: bool, negated: bool },
    Else,
    Endc,
}

fn classify_marker(line: &str) -> Option<Marker> {
    let lower = line.to_lowercase();
    if lower.starts_with("if ") {
        return Some(Marker::If {
            faithful: lower.contains("faithful"),
            negated: lower.contains("!def"),
        });
    }
    match lower.as_str() {
        "else" => Some(Marker::Else),
        "endc" => Some(Marker::Endc),
        _ => None,
    }
}

/// An open variant conditional.
#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    /// Variant receiving lines right now.
    current: Variant,
    opened_at: usize,
    /// Depth of other conditionals opened inside this one. Their markers
    /// are ordinary lines of the current branch.
    inner_depth: usize,
}

/// Split `text` into its two variant streams.
///
/// Never fails. An unterminated block keeps its lines in the branch that was
/// open at end of input and records an `UnterminatedConditional`
/// diagnostic; a faithful conditional opened inside another records a
/// `NestedConditional` and is treated as an ordinary line.
pub fn split_variants(source_name: &str, text: &str, options: SplitOptions) -> SplitSource {
    let mut out = SplitSource::default();
    let mut block: Option<OpenBlock> = None;
    // Depth of non-variant conditionals outside any variant block.
    let mut outer_depth = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = normalize_line(raw, options.keep_at);
        let marker = classify_marker(&line);

        let Some(open) = block.as_mut() else {
            match marker {
                Some(Marker::If { faithful: true, negated }) => {
                    block = Some(OpenBlock {
                        current: if negated { Variant::Polished } else { Variant::Faithful },
                        opened_at: line_no,
                        inner_depth: 0,
                    });
                    continue;
                }
                Some(Marker::If { faithful: false, .. }) => outer_depth += 1,
                Some(Marker::Endc) if outer_depth > 0 => outer_depth -= 1,
                Some(Marker::Else | Marker::Endc) if outer_depth == 0 => {
                    out.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::StrayConditional,
                        source_name,
                        format!("line {line_no}: '{line}' without an open conditional"),
                    ));
                }
                _ => {}
            }
            out.push_both(line);
            continue;
        };

        match marker {
            Some(Marker::If { faithful, .. }) => {
                if faithful {
                    out.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::NestedConditional,
                        source_name,
                        format!(
                            "line {line_no}: conditional nested in block opened at line {}",
                            open.opened_at
                        ),
                    ));
                }
                open.inner_depth += 1;
            }
            Some(Marker::Else) if open.inner_depth == 0 => {
                open.current = open.current.other();
                continue;
            }
            Some(Marker::Endc) if open.inner_depth == 0 => {
                block = None;
                continue;
            }
            Some(Marker::Endc) => open.inner_depth -= 1,
            _ => {}
        }
        let current = open.current;
        out.push(current, line);
    }

    if let Some(open) = block {
        out.unterminated_at = Some(open.opened_at);
        log::warn!(
            "{source_name}: conditional opened at line {} is never closed",
            open.opened_at
        );
        out.diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnterminatedConditional,
            source_name,
            format!(
                "conditional opened at line {} reaches end of input in the {} branch",
                open.opened_at, open.current
            ),
        ));
    }

    out
}

/// Like [`split_variants`], but an unterminated block is an error.
pub fn split_strict(
    source_name: &str,
    text: &str,
    options: SplitOptions,
) -> Result<SplitSource, ExtractError> {
    let split = split_variants(source_name, text, options);
    if let Some(line) = split.unterminated_at {
        return Err(ExtractError::UnterminatedConditional {
            source_name: source_name.to_string(),
            line,
        });
    }
    Ok(split)
}

#[cfg(test)]
#[path = "tests/split_tests.rs"]
mod tests;
