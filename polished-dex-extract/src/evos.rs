//! Evolutions and level-up learnsets.
//!
//! `evos_attacks.asm` holds one section per species or form, opened by
//! `evos_attacks <Name>`; its `evo_data` lines are evolution edges and its
//! `learnset` lines the level-up moves.

use std::collections::BTreeMap;

use polished_dex_core::{
    DiagnosticKind, Diagnostics, Evolution, EvolutionMethod, EvolutionParameter, FormRef,
    LevelMove, Moveset, PLAIN_FORM, form_key, reduce, split_form_suffix,
};

use crate::cursor::LineCursor;
use crate::line::{Directive, Line};
use crate::species::SpeciesTable;

/// Level-up movesets keyed by reduced section name (`bulbasaur`,
/// `raticatealolan`, `raticateplain`).
pub type MovesetTable = BTreeMap<String, Moveset>;

/// Evolution edges of one variant in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvolutionGraph {
    edges: Vec<Evolution>,
}

impl EvolutionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: Evolution) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[Evolution] {
        &self.edges
    }

    /// Edges leaving `species`.
    pub fn from_species<'a>(&'a self, species: &'a str) -> impl Iterator<Item = &'a Evolution> {
        self.edges.iter().filter(move |e| e.from.name == species)
    }

    /// Species with outgoing edges, in order of first appearance.
    pub fn bases(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for e in &self.edges {
            if !seen.contains(&e.from.name.as_str()) {
                seen.push(e.from.name.as_str());
            }
        }
        seen
    }

    /// True if some edge ends at `species`.
    pub fn is_target(&self, species: &str) -> bool {
        self.edges.iter().any(|e| e.to.name == species)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvosAttacks {
    pub evolutions: EvolutionGraph,
    pub learnsets: MovesetTable,
}

pub fn extract_evos_attacks(
    source_name: &str,
    lines: &[Line<'_>],
    diagnostics: &mut Diagnostics,
) -> EvosAttacks {
    let is_header = |l: &Line<'_>| l.is_directive("evos_attacks");
    let mut out = EvosAttacks::default();
    let mut cursor = LineCursor::new(lines);

    while let Some(header) = cursor.seek(is_header).and_then(Line::directive) {
        let section = reduce(header.body);
        let (base, form) = split_form_suffix(&section);
        let (base, form) = (base.to_string(), form.to_string());
        let body = cursor.until_marker(is_header);

        let moveset = out.learnsets.entry(section.clone()).or_default();
        for directive in body.iter().filter_map(Line::directive) {
            match directive.name {
                "evo_data" => match parse_evo_data(&base, &form, directive) {
                    Some(edge) => out.evolutions.push(edge),
                    None => diagnostics.record(
                        DiagnosticKind::MalformedField,
                        source_name,
                        format!("{section}: evo_data {}", directive.body),
                    ),
                },
                "learnset" => match parse_learnset(directive) {
                    Some(entry) => moveset.level_up.push(entry),
                    None => diagnostics.record(
                        DiagnosticKind::MalformedField,
                        source_name,
                        format!("{section}: learnset {}", directive.body),
                    ),
                },
                _ => {}
            }
        }
    }

    log::debug!(
        "{source_name}: {} sections, {} evolutions",
        out.learnsets.len(),
        out.evolutions.len()
    );
    out
}

/// `evo_data EVOLVE_X, param, TARGET[, FORM]`.
fn parse_evo_data(base: &str, form: &str, d: &Directive<'_>) -> Option<Evolution> {
    let args = d.args();
    if args.len() < 3 {
        return None;
    }
    let kind = args[0];
    let action = reduce(kind.split_once("EVOLVE_")?.1);

    let (target, parameter) = if kind == "EVOLVE_STAT" {
        (*args.get(3)?, Some(EvolutionParameter::Named(reduce(args[2]))))
    } else {
        let target = if args[2].contains("TR_") { *args.get(3)? } else { args[2] };
        (target, parse_evolution_parameter(args[1]))
    };

    let target_form = args
        .get(3)
        .filter(|a| a.contains("_FORM") && !a.contains("NO_FORM"))
        .map_or_else(|| PLAIN_FORM.to_string(), |a| reduce(&a.replace("_FORM", "")));

    Some(Evolution {
        from: FormRef::new(base, form),
        to: FormRef::new(reduce(target), target_form),
        method: EvolutionMethod { action, parameter },
    })
}

/// Numeric parameters stay numbers (negative ones are dropped); anything
/// else is reduced. A `TR_` time-of-day prefix is removed first.
pub fn parse_evolution_parameter(raw: &str) -> Option<EvolutionParameter> {
    let raw = raw.replace("TR_", "");
    match raw.trim().parse::<i64>() {
        Ok(n) => u32::try_from(n).ok().map(EvolutionParameter::Number),
        Err(_) => Some(EvolutionParameter::Named(reduce(&raw))),
    }
}

fn parse_learnset(d: &Directive<'_>) -> Option<LevelMove> {
    let args = d.args();
    let level = args.first()?.parse().ok()?;
    let name = reduce(args.get(1)?);
    Some(LevelMove { name, level })
}

/// Forms without a learnset of their own (or with an empty one) copy the
/// plain form's, when the plain form has a dedicated `<Name>Plain` section.
pub fn inherit_plain_movesets(table: &SpeciesTable, movesets: &mut MovesetTable) {
    for species in table.iter() {
        let Some(plain) = movesets.get(&form_key(&species.name, PLAIN_FORM)).cloned() else {
            continue;
        };
        for form in species.forms.iter().filter(|f| f.name != PLAIN_FORM) {
            let key = form_key(&species.name, &form.name);
            let needs_copy = movesets.get(&key).is_none_or(|m| m.level_up.is_empty());
            if needs_copy {
                movesets.insert(key, plain.clone());
            }
        }
    }
}

/// Egg-move lists in source order, keyed by reduced section name.
pub fn extract_egg_moves(lines: &[Line<'_>]) -> Vec<(String, Vec<String>)> {
    let is_header = |l: &Line<'_>| l.label().is_some_and(|n| n.ends_with("EggSpeciesMoves"));
    let mut out = Vec::new();
    let mut cursor = LineCursor::new(lines);

    while let Some(name) = cursor.seek(is_header).and_then(Line::label) {
        let key = reduce(name.trim_end_matches("EggSpeciesMoves"));
        let moves = cursor
            .until_marker(is_header)
            .iter()
            .filter_map(|l| l.directive_named("db"))
            .filter(|d| !d.body.contains("$ff"))
            .map(|d| reduce(d.body))
            .collect();
        out.push((key, moves));
    }
    out
}

#[cfg(test)]
#[path = "tests/evos_tests.rs"]
mod tests;
