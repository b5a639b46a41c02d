//! Default moves for trainer party members.
//!
//! A party member with no `tr_moves` line knows the last moves its species
//! learns by level at or below its own level. Species data is read back from
//! the species files written earlier in the run.

use std::collections::HashMap;

use polished_dex_core::{
    DiagnosticKind, Diagnostics, LevelMove, SpeciesRecord, TeamMember, TrainerRecord, Variant,
};
use polished_dex_extract::trainers::MAX_MOVES;

use crate::writer::{OutputWriter, POKEMON_DIR};

/// The up to four moves a species knows at `level`: the highest-level
/// eligible entries (ties keep source order), returned in ascending level
/// order. A move learned at several levels counts once.
pub fn moves_at_level(level_up: &[LevelMove], level: u8) -> Vec<String> {
    let mut eligible: Vec<(usize, &LevelMove)> = level_up
        .iter()
        .enumerate()
        .filter(|(_, m)| m.level <= level)
        .collect();
    eligible.sort_by(|a, b| b.1.level.cmp(&a.1.level));

    let mut picked: Vec<(usize, &LevelMove)> = Vec::with_capacity(MAX_MOVES);
    for (i, m) in eligible {
        if picked.len() == MAX_MOVES {
            break;
        }
        if !picked.iter().any(|(_, p)| p.name == m.name) {
            picked.push((i, m));
        }
    }
    picked.sort_by_key(|(i, m)| (m.level, *i));
    picked.into_iter().map(|(_, m)| m.name.clone()).collect()
}

/// Species files read so far; a missing file is remembered as `None`.
struct SpeciesCache<'a> {
    writer: &'a OutputWriter,
    loaded: HashMap<String, Option<SpeciesRecord>>,
}

impl<'a> SpeciesCache<'a> {
    fn new(writer: &'a OutputWriter) -> Self {
        Self {
            writer,
            loaded: HashMap::new(),
        }
    }

    fn get(&mut self, species: &str) -> Option<&SpeciesRecord> {
        let writer = self.writer;
        self.loaded
            .entry(species.to_string())
            .or_insert_with(|| match writer.read_record(POKEMON_DIR, species) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::debug!("no species record for '{species}': {e}");
                    None
                }
            })
            .as_ref()
    }
}

fn fill_member(
    member: &mut TeamMember,
    variant: Variant,
    cache: &mut SpeciesCache<'_>,
    source: &str,
    diagnostics: &mut Diagnostics,
) -> bool {
    let Some(record) = cache.get(&member.species) else {
        diagnostics.record(
            DiagnosticKind::CrossReferenceMiss,
            source,
            format!("no species file for party member '{}'", member.species),
        );
        return false;
    };
    let Some(version) = record.versions.get_or_other(variant) else {
        return false;
    };
    let form = member
        .form
        .as_deref()
        .and_then(|f| version.forms.get(f))
        .or_else(|| version.forms.plain());
    let Some(form) = form else {
        return false;
    };
    member.moves = moves_at_level(&form.movesets.level_up, member.level);
    true
}

/// Give every party member without explicit moves its level-up default.
/// Returns the number of members filled in.
pub fn backfill_trainer_moves(
    records: &mut [TrainerRecord],
    writer: &OutputWriter,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut cache = SpeciesCache::new(writer);
    let mut filled = 0;

    for record in records.iter_mut() {
        let source = record.file_stem();
        for &variant in Variant::all() {
            let Some(teams) = record.versions.get_mut(variant) else {
                continue;
            };
            let members = teams
                .teams
                .iter_mut()
                .flat_map(|t| t.pokemon.iter_mut())
                .filter(|m| m.moves.is_empty());
            for member in members {
                let mut local = Diagnostics::new();
                if fill_member(member, variant, &mut cache, &source, &mut local) {
                    filled += 1;
                }
                local.tag_variant(variant);
                diagnostics.extend(local);
            }
        }
    }

    log::debug!("backfilled moves for {filled} party members");
    filled
}

#[cfg(test)]
#[path = "tests/backfill_tests.rs"]
mod tests;
