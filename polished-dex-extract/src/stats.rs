//! Base-stat files.
//!
//! One file per species or functional form. Lines are located by their
//! directive or trailing comment, never by position.

use std::collections::BTreeMap;

use polished_dex_core::{
    BaseStats, DiagnosticKind, Diagnostics, Field, Form, Variant, VariantMap, reduce, title_case,
};

use crate::line::{Directive, Line};
use crate::species::SpeciesTable;

/// TM/HM-compatible moves keyed by reduced `abilities_for` name.
pub type TmCompatibility = BTreeMap<String, Vec<String>>;

/// Fields parsed out of one base-stat file.
#[derive(Debug, Clone, PartialEq)]
pub struct StatBlock {
    /// First argument of `abilities_for` (`MEWTWO`, `ARBOK_JOHTO`).
    pub name_form: String,
    pub abilities: Vec<String>,
    pub types: Field<Vec<String>>,
    pub base_stats: Field<BaseStats>,
    /// Title-cased, e.g. `Medium Slow`.
    pub growth_rate: Field<String>,
    pub has_gender: Field<bool>,
    pub catch_rate: Field<u8>,
    pub egg_groups: Vec<String>,
    pub tm_moves: Option<Vec<String>>,
}

impl StatBlock {
    fn apply_to(&self, form: &mut Form) {
        if let Field::Found(types) = &self.types {
            form.types = types.clone();
        }
        form.abilities = self.abilities.clone();
        form.base_stats = self.base_stats.as_ref().found().copied();
        form.growth_rate = self.growth_rate.as_ref().found().cloned();
        form.has_gender = self.has_gender.as_ref().found().copied();
        form.catch_rate = self.catch_rate.as_ref().found().copied();
        form.egg_groups = self.egg_groups.clone();
    }

    fn is_armored_mewtwo(&self) -> bool {
        reduce(&self.name_form) == "mewtwo"
            && matches!(&self.types, Field::Found(t) if t == &["psychic", "steel"])
    }
}

/// Parse one base-stat file. Returns `None` when the file has no
/// `abilities_for` line, since nothing can be attributed without it.
pub fn parse_stat_block(
    source_name: &str,
    lines: &[Line<'_>],
    diagnostics: &mut Diagnostics,
) -> Option<StatBlock> {
    let directives: Vec<&Directive<'_>> = lines.iter().filter_map(Line::directive).collect();
    let with_comment = |suffix: &str| {
        directives
            .iter()
            .find(|d| d.comment.is_some_and(|c| c.ends_with(suffix)))
            .copied()
    };

    let Some(abilities_for) = directives.iter().find(|d| d.name == "abilities_for") else {
        diagnostics.record(DiagnosticKind::MissingField, source_name, "no abilities_for line");
        return None;
    };
    let args = abilities_for.args();
    let Some(name_form) = args.first().map(|s| s.to_string()) else {
        diagnostics.record(DiagnosticKind::MalformedField, source_name, "empty abilities_for line");
        return None;
    };
    let abilities = args[1..].iter().map(|a| reduce(a)).collect();

    let types = match with_comment("type") {
        Some(d) => {
            let mut types: Vec<String> = d.args().iter().map(|t| reduce(t)).collect();
            if types.len() == 2 && types[0] == types[1] {
                types.truncate(1);
            }
            if types.is_empty() || types.len() > 2 {
                Field::Malformed(d.body.to_string())
            } else {
                Field::Found(types)
            }
        }
        None => Field::Missing,
    };

    let base_stats = match with_comment("BST") {
        Some(d) => parse_base_stats(d),
        None => Field::Missing,
    };

    let growth_rate = Field::from_option(
        directives
            .iter()
            .find_map(|d| d.body.strip_prefix("GROWTH_").filter(|_| d.name == "db"))
            .map(title_case),
    );

    let has_gender = Field::from_option(
        directives
            .iter()
            .find_map(|d| d.arg(0).filter(|a| a.starts_with("GENDER")))
            .map(|g| g != "GENDER_UNKNOWN"),
    );

    let catch_rate = match with_comment("catch rate") {
        Some(d) => Field::parse_with(d.body, |s| s.parse::<u8>()),
        None => Field::Missing,
    };

    let egg_groups = with_comment("egg groups")
        .map(|d| {
            d.args()
                .iter()
                .map(|g| reduce(g.strip_prefix("EGG_").unwrap_or(g)))
                .collect()
        })
        .unwrap_or_default();

    let tm_moves = directives
        .iter()
        .find(|d| d.name == "tmhm")
        .map(|d| d.args().iter().map(|m| reduce(m)).collect());

    let block = StatBlock {
        name_form,
        abilities,
        types,
        base_stats,
        growth_rate,
        has_gender,
        catch_rate,
        egg_groups,
        tm_moves,
    };

    for (field, status) in [
        ("type", block.types.status()),
        ("base stats", block.base_stats.status()),
        ("growth rate", block.growth_rate.status()),
        ("gender", block.has_gender.status()),
    ] {
        match status {
            "missing" => diagnostics.record(
                DiagnosticKind::MissingField,
                source_name,
                format!("no {field} line"),
            ),
            "malformed" => diagnostics.record(
                DiagnosticKind::MalformedField,
                source_name,
                format!("unreadable {field} line"),
            ),
            _ => {}
        }
    }

    Some(block)
}

/// `db 45, 49, 49, 45, 65, 65 ; 318 BST` in hp/atk/def/spe/sat/sdf order.
fn parse_base_stats(d: &Directive<'_>) -> Field<BaseStats> {
    let values: Option<Vec<u16>> = d.args().iter().map(|v| v.parse().ok()).collect();
    let Some(values) = values.filter(|v| v.len() == 6) else {
        return Field::Malformed(d.body.to_string());
    };
    let mut stats = BaseStats {
        hp: values[0],
        attack: values[1],
        defense: values[2],
        speed: values[3],
        special_attack: values[4],
        special_defense: values[5],
        total: 0,
    };
    stats.total = d
        .comment
        .and_then(|c| c.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| stats.sum());
    Field::Found(stats)
}

/// Write `block` into the species tables.
///
/// A `mewtwo` block typed psychic/steel is the armored form and always lands
/// in the Polished table. Otherwise the block targets the form-number-1
/// form of the species named in full, or the functional form named by the
/// last `_` segment (`ARBOK_JOHTO` → arbok, `johto`).
pub fn apply_stat_block(
    source_name: &str,
    variant: Variant,
    block: &StatBlock,
    tables: &mut VariantMap<SpeciesTable>,
    tm: &mut TmCompatibility,
    diagnostics: &mut Diagnostics,
) {
    let key = reduce(&block.name_form);
    if let Some(moves) = &block.tm_moves {
        tm.insert(key.clone(), moves.clone());
    }

    if block.is_armored_mewtwo() {
        let armored = tables
            .get_mut(Variant::Polished)
            .and_then(|t| t.get_mut("mewtwo"))
            .and_then(|m| m.forms.get_mut("armored"));
        match armored {
            Some(form) => block.apply_to(form),
            None => diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                source_name,
                "armored stat block without a Polished armored mewtwo form",
            ),
        }
        return;
    }

    let Some(table) = tables.get_mut(variant) else {
        return;
    };

    if let Some(species) = table.get_mut(&key) {
        if let Some(form) = species.forms.plain_mut() {
            block.apply_to(form);
        }
        return;
    }

    let target = block
        .name_form
        .rsplit_once('_')
        .map(|(species, form)| (reduce(species), reduce(form)));
    let form = target.as_ref().and_then(|(species, form)| {
        table.get_mut(species).and_then(|s| s.forms.get_mut(form))
    });
    match form {
        Some(form) => block.apply_to(form),
        None => diagnostics.record(
            DiagnosticKind::CrossReferenceMiss,
            source_name,
            format!("no species or form for '{}'", block.name_form),
        ),
    }
}

/// Forms that received no stat block copy the plain form's data.
pub fn fill_cosmetic_forms(table: &mut SpeciesTable) {
    for species in table.iter_mut() {
        let Some(plain) = species.forms.plain().cloned() else {
            continue;
        };
        for form in species.forms.iter_mut() {
            if !form.is_plain() && form.lacks_stats() {
                form.copy_stats_from(&plain);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/stats_tests.rs"]
mod tests;
