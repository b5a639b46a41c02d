//! Species names and form tables.
//!
//! The name table fixes the species list and national index. Form constants
//! then attach alternate forms: `ext_const_def` blocks for species-specific
//! forms and `DEF <REGION>_FORM EQU n` blocks for regional ones.

use std::collections::HashMap;

use polished_dex_core::{
    Diagnostics, DiagnosticKind, Form, FormMap, Species, PLAIN_FORM, reduce,
};

use crate::cursor::LineCursor;
use crate::line::Line;

/// Name-table entries that are not species.
const SKIPPED_NAMES: &[&str] = &["?000?", "Egg", "?256?"];

/// Names cut short by the 10-character table limit.
const TRUNCATED_NAMES: &[(&str, &str)] = &[("Dudunsparc", "Dudunsparce")];

/// Species of one variant in national-index order, indexed by identity.
#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    species: Vec<Species>,
    index: HashMap<String, usize>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, species: Species) {
        self.index.insert(species.id.clone(), self.species.len());
        self.species.push(species);
    }

    pub fn get(&self, id: &str) -> Option<&Species> {
        self.index.get(id).map(|&i| &self.species[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Species> {
        self.index.get(id).map(|&i| &mut self.species[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Species> {
        self.species.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Species> {
        self.species.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn into_vec(self) -> Vec<Species> {
        self.species
    }
}

/// Build the species list from `rawchar "Name"` lines.
///
/// The national index counts accepted lines from 1. Every species starts
/// with a plain form.
pub fn extract_names(lines: &[Line<'_>]) -> SpeciesTable {
    let mut table = SpeciesTable::new();
    let mut dex_no: u16 = 1;

    for directive in lines.iter().filter_map(|l| l.directive_named("rawchar")) {
        let Some(raw) = directive.quoted() else {
            continue;
        };
        if SKIPPED_NAMES.iter().any(|skip| raw.contains(skip)) {
            continue;
        }
        let name = TRUNCATED_NAMES
            .iter()
            .find(|(short, _)| raw == *short)
            .map_or(raw, |(_, full)| full);

        let mut forms = FormMap::new();
        forms.insert(Form::new(PLAIN_FORM, 1));
        table.push(Species {
            id: reduce(name),
            name: name.to_string(),
            dex_no,
            forms,
        });
        dex_no += 1;
    }

    log::debug!("{} species in name table", table.len());
    table
}

/// Attach form constants to the species in `table`.
pub fn extract_forms(
    source_name: &str,
    lines: &[Line<'_>],
    table: &mut SpeciesTable,
    diagnostics: &mut Diagnostics,
) {
    let mut cursor = LineCursor::new(lines);
    while let Some(line) = cursor.advance() {
        let Some(directive) = line.directive() else {
            continue;
        };

        if directive.name == "ext_const_def" {
            let species = cursor.look_behind(1).and_then(|l| match l {
                Line::Comment(c) => Some(*c),
                _ => None,
            });
            let block = cursor.advance_while(|l| {
                l.directive().is_some_and(|d| d.name.starts_with("ext_const"))
            });
            let Some(species) = species else {
                diagnostics.record(
                    DiagnosticKind::MissingField,
                    source_name,
                    "ext_const_def block without a species comment",
                );
                continue;
            };
            for entry in block.iter().filter_map(Line::directive) {
                let Some(comment) = entry.comment else {
                    continue;
                };
                let Some((form_name, form_number)) = parse_ext_const(entry.body, comment) else {
                    diagnostics.record(
                        DiagnosticKind::MalformedField,
                        source_name,
                        format!("form constant '{} ; {comment}'", entry.body),
                    );
                    continue;
                };
                // Aliases of the default form share number 1.
                if form_number == 1 && form_name != PLAIN_FORM {
                    continue;
                }
                add_form(source_name, table, species, Form::new(form_name, form_number), diagnostics);
            }
            continue;
        }

        if directive.name == "DEF"
            && let Some((form_name, form_number)) = parse_regional_def(directive.body)
        {
            let block = cursor.advance_while(|l| l.is_directive("const_skip"));
            for entry in block.iter().filter_map(Line::directive) {
                let Some(species) = entry
                    .comment
                    .and_then(|c| c.split_once(' '))
                    .map(|(_, name)| name.trim())
                else {
                    continue;
                };
                add_form(
                    source_name,
                    table,
                    species,
                    Form::new(form_name.clone(), form_number),
                    diagnostics,
                );
            }
        }
    }
}

/// `UNOWN_A_FORM` with comment `A (01)` → (`a`, 1).
fn parse_ext_const(body: &str, comment: &str) -> Option<(String, u8)> {
    let constant = body.split_whitespace().next()?;
    let (_, rest) = constant.split_once('_')?;
    let name = rest.strip_suffix("_FORM")?;
    let open = comment.rfind('(')?;
    let close = comment[open..].find(')')? + open;
    let number = u8::from_str_radix(comment[open + 1..close].trim(), 16).ok()?;
    Some((reduce(name), number))
}

/// `ALOLAN_FORM EQU 2` → (`alolan`, 2).
fn parse_regional_def(body: &str) -> Option<(String, u8)> {
    let (constant, value) = body.split_once(" EQU ")?;
    let constant = constant.trim();
    if !constant.ends_with("_FORM") {
        return None;
    }
    let region = constant.split('_').next().filter(|r| !r.is_empty())?;
    let number = value.trim().parse().ok()?;
    Some((reduce(region), number))
}

fn add_form(
    source_name: &str,
    table: &mut SpeciesTable,
    species: &str,
    form: Form,
    diagnostics: &mut Diagnostics,
) {
    match table.get_mut(&reduce(species)) {
        Some(mon) => mon.forms.insert(form),
        None => diagnostics.record(
            DiagnosticKind::CrossReferenceMiss,
            source_name,
            format!("form '{}' names unknown species '{species}'", form.name),
        ),
    }
}

/// Give every species without a form-number-1 form a plain one, prepended,
/// and report species left with more than one.
pub fn ensure_plain_forms(table: &mut SpeciesTable, diagnostics: &mut Diagnostics) {
    for species in table.iter_mut() {
        match species.forms.plain_count() {
            0 => {
                diagnostics.record(
                    DiagnosticKind::InvariantViolation,
                    &species.id,
                    "no form-number-1 form; synthesized plain",
                );
                species.forms.prepend(Form::new(PLAIN_FORM, 1));
            }
            1 => {}
            n => diagnostics.record(
                DiagnosticKind::InvariantViolation,
                &species.id,
                format!("{n} forms carry form number 1"),
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/species_tests.rs"]
mod tests;
