//! Folding per-variant records into one record per identity.
//!
//! Identities keep the order in which they are first seen, Polished first.
//! A record carries a variant's data only when that variant defines it.

use std::collections::{BTreeMap, HashMap};

use polished_dex_core::{
    Ability, AbilityRecord, AbilityText, DiagnosticKind, Diagnostics, ItemData, ItemRecord,
    MoveRecord, MoveStats, PLAIN_FORM, SpeciesRecord, SpeciesVersion, TmInfo, Trainer,
    TrainerRecord, Variant, VariantMap, form_key, reduce, title_case,
};
use polished_dex_extract::curated::CuratedItem;
use polished_dex_extract::evos::MovesetTable;
use polished_dex_extract::items::ItemEntry;
use polished_dex_extract::species::SpeciesTable;
use polished_dex_extract::stats::TmCompatibility;
use polished_dex_extract::text::NO_DESCRIPTION;

use crate::resolver::{EggMoveTable, push_unique};

/// Ordered accumulator keyed by identity.
struct Merged<T> {
    order: Vec<String>,
    records: HashMap<String, T>,
}

impl<T> Merged<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
        }
    }

    fn entry(&mut self, id: &str, init: impl FnOnce() -> T) -> &mut T {
        if !self.records.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.records.entry(id.to_string()).or_insert_with(init)
    }

    fn into_vec(mut self) -> Vec<T> {
        self.order
            .iter()
            .filter_map(|id| self.records.remove(id))
            .collect()
    }
}

// ── Species ─────────────────────────────────────────────────────────────────

/// Write level-up, TM and egg moves into every form of `table`.
///
/// Level-up moves come from the form's own section, then the plain
/// section, then the species section. TM lists come from the form's stat
/// file, then the species'.
pub fn assemble_movesets(
    table: &mut SpeciesTable,
    learnsets: &MovesetTable,
    tm: &TmCompatibility,
    egg_moves: &EggMoveTable,
) {
    for species in table.iter_mut() {
        let species_key = reduce(&species.name);
        let plain_key = form_key(&species.name, PLAIN_FORM);
        for form in species.forms.iter_mut() {
            let own_key = form_key(&species.name, &form.name);

            if let Some(set) = learnsets
                .get(&own_key)
                .or_else(|| learnsets.get(&plain_key))
                .or_else(|| learnsets.get(&species_key))
            {
                form.movesets.level_up = set.level_up.clone();
            }
            if let Some(moves) = tm.get(&own_key).or_else(|| tm.get(&species_key)) {
                form.movesets.tm = moves.clone();
            }
            if let Some(moves) = egg_moves.get(&(species.id.clone(), form.name.clone())) {
                form.movesets.egg_moves = moves.clone();
            }
        }
    }
}

pub fn merge_species(tables: &VariantMap<SpeciesTable>) -> Vec<SpeciesRecord> {
    let mut merged = Merged::new();
    for (variant, table) in tables.iter() {
        for species in table.iter() {
            let record = merged.entry(&species.id, || SpeciesRecord {
                id: species.id.clone(),
                name: species.name.clone(),
                dex_no: species.dex_no,
                versions: VariantMap::new(),
            });
            record.versions.insert(
                variant,
                SpeciesVersion {
                    forms: species.forms.clone(),
                },
            );
        }
    }
    merged.into_vec()
}

// ── Abilities ───────────────────────────────────────────────────────────────

pub fn merge_abilities(abilities: &VariantMap<Vec<Ability>>) -> Vec<AbilityRecord> {
    let mut merged = Merged::new();
    for (variant, list) in abilities.iter() {
        for ability in list {
            let record = merged.entry(&ability.id, || AbilityRecord {
                id: ability.id.clone(),
                name: ability.name.clone(),
                versions: VariantMap::new(),
            });
            record.versions.insert(
                variant,
                AbilityText {
                    description: ability.description.clone(),
                },
            );
        }
    }
    merged.into_vec()
}

// ── Moves ───────────────────────────────────────────────────────────────────

/// Per-variant inputs of the move merge.
#[derive(Debug, Default)]
pub struct MoveSources {
    pub stats: BTreeMap<String, MoveStats>,
    pub descriptions: BTreeMap<String, String>,
    pub tmhm: BTreeMap<String, TmInfo>,
}

/// One record per named move.
///
/// `names` is the display-name table that decides which moves exist. A
/// named move with battle stats in neither variant is reported and left
/// out.
pub fn merge_moves(
    names: &[String],
    sources: &VariantMap<MoveSources>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, MoveRecord> {
    let mut out = BTreeMap::new();

    for name in names {
        let id = reduce(name);
        if id.is_empty() || out.contains_key(&id) {
            continue;
        }

        let mut versions = VariantMap::new();
        for (variant, source) in sources.iter() {
            if let Some(stats) = source.stats.get(&id) {
                let mut stats = stats.clone();
                stats.description = source.descriptions.get(&id).cloned();
                versions.insert(variant, stats);
            }
        }
        if versions.is_empty() {
            diagnostics.record(
                DiagnosticKind::MissingField,
                "data/moves/moves.asm",
                format!("move '{name}' has no battle stats"),
            );
            continue;
        }

        let description = Variant::all()
            .iter()
            .find_map(|&v| sources.get(v).and_then(|s| s.descriptions.get(&id)))
            .cloned()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        let tm = Variant::all()
            .iter()
            .find_map(|&v| sources.get(v).and_then(|s| s.tmhm.get(&id)))
            .cloned();

        out.insert(
            id.clone(),
            MoveRecord {
                id,
                name: name.clone(),
                description,
                versions,
                tm,
            },
        );
    }
    out
}

// ── Trainers ────────────────────────────────────────────────────────────────

/// Consolidate trainer definitions by class and name. Rematch definitions
/// append their teams; the first definition supplies the constant name.
pub fn merge_trainers(trainers: &VariantMap<Vec<Trainer>>) -> Vec<TrainerRecord> {
    let mut merged = Merged::new();
    for (variant, list) in trainers.iter() {
        for trainer in list {
            let id = reduce(&trainer.name);
            let key = format!("{}/{id}", trainer.class);
            let record = merged.entry(&key, || TrainerRecord {
                id: id.clone(),
                name: trainer.name.clone(),
                class: trainer.class.clone(),
                constant_name: trainer.constant_name.clone(),
                versions: VariantMap::new(),
            });
            record
                .versions
                .entry(variant)
                .teams
                .extend(trainer.teams.iter().cloned());
        }
    }
    merged.into_vec()
}

/// Every trainer constant mapped to the file stem of the record its
/// definition was consolidated into. Constants defined more than once map
/// to the first record.
pub fn trainer_constants(records: &[TrainerRecord], trainers: &VariantMap<Vec<Trainer>>) -> BTreeMap<String, String> {
    let stems: HashMap<(&str, String), String> = records
        .iter()
        .map(|r| ((r.class.as_str(), r.id.clone()), r.file_stem()))
        .collect();

    let mut out = BTreeMap::new();
    for (_, list) in trainers.iter() {
        for trainer in list {
            let key = (trainer.class.as_str(), reduce(&trainer.name));
            if let Some(stem) = stems.get(&key) {
                out.entry(trainer.constant_name.clone())
                    .or_insert_with(|| stem.clone());
            }
        }
    }
    out
}

// ── Items ───────────────────────────────────────────────────────────────────

/// Regular and key items of both variants. A later entry with an id seen
/// earlier in the same variant replaces it.
pub fn merge_items(entries: &VariantMap<Vec<ItemEntry>>) -> BTreeMap<String, ItemRecord> {
    let mut out: BTreeMap<String, ItemRecord> = BTreeMap::new();
    for (variant, list) in entries.iter() {
        for entry in list {
            out.entry(entry.id.clone())
                .or_insert_with(|| ItemRecord {
                    id: entry.id.clone(),
                    versions: VariantMap::new(),
                })
                .versions
                .insert(variant, entry.data.clone());
        }
    }
    out
}

/// Overlay hand-maintained entries. Names, descriptions and the key item
/// flag replace extracted values; locations are added. An entry for an
/// item the tables lack creates it.
pub fn apply_curated_items(items: &mut BTreeMap<String, ItemRecord>, curated: &[CuratedItem]) {
    for entry in curated {
        let id = entry.key();
        if id.is_empty() {
            continue;
        }
        let record = items.entry(id.clone()).or_insert_with(|| ItemRecord {
            id: id.clone(),
            versions: VariantMap::new(),
        });
        for &variant in Variant::all() {
            if !entry.applies_to(variant) {
                continue;
            }
            let data = record.versions.slot_mut(variant).get_or_insert_with(|| ItemData {
                name: title_case(&entry.id),
                description: NO_DESCRIPTION.to_string(),
                ..Default::default()
            });
            if let Some(name) = &entry.name {
                data.name = name.clone();
            }
            if let Some(description) = &entry.description {
                data.description = description.clone();
            }
            data.key_item |= entry.key_item;
            for location in &entry.locations {
                push_unique(&mut data.locations, location.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod tests;
