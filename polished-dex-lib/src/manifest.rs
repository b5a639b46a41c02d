//! Compact manifests: pure projections of the merged records.

use std::collections::{BTreeMap, BTreeSet};

use polished_dex_core::{
    ItemRecord, LocationRecord, MoveRecord, SpeciesRecord, TrainerRecord, VariantMap,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesEntry {
    pub id: String,
    pub name: String,
    pub dex_no: u16,
    /// Form name to types, per variant.
    pub versions: VariantMap<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "hasTM")]
    pub has_tm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub location_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub is_landmark: bool,
    pub connections: u8,
    pub encounter_count: usize,
    pub trainer_count: usize,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerEntry {
    pub id: String,
    pub name: String,
    pub class: String,
    pub constant_name: String,
}

pub fn species_manifest(records: &[SpeciesRecord]) -> Vec<SpeciesEntry> {
    records
        .iter()
        .map(|r| SpeciesEntry {
            id: r.id.clone(),
            name: r.name.clone(),
            dex_no: r.dex_no,
            versions: r.versions.map(|_, v| {
                v.forms
                    .iter()
                    .map(|f| (f.name.clone(), f.types.clone()))
                    .collect()
            }),
        })
        .collect()
}

/// Sorted by display name.
pub fn moves_manifest(records: &BTreeMap<String, MoveRecord>) -> Vec<MoveEntry> {
    let mut entries: Vec<MoveEntry> = records
        .values()
        .filter_map(|r| {
            let (_, stats) = r.versions.iter().next()?;
            Some(MoveEntry {
                id: r.id.clone(),
                name: r.name.clone(),
                move_type: stats.move_type.clone(),
                category: stats.category.clone(),
                description: r.description.clone(),
                has_tm: r.tm.is_some(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    entries
}

pub fn items_manifest(records: &BTreeMap<String, ItemRecord>) -> Vec<ItemEntry> {
    records
        .values()
        .filter_map(|r| {
            let (_, primary) = r.versions.iter().next()?;
            let areas: BTreeSet<&str> = r
                .versions
                .iter()
                .flat_map(|(_, d)| d.locations.iter().map(|l| l.area.as_str()))
                .collect();
            Some(ItemEntry {
                id: r.id.clone(),
                name: primary.name.clone(),
                category: primary.attributes.category.clone(),
                location_count: areas.len(),
            })
        })
        .collect()
}

/// Sorted by display name. Counts are distinct identities over both
/// variants.
pub fn locations_manifest(records: &BTreeMap<String, LocationRecord>) -> Vec<LocationEntry> {
    let mut entries: Vec<LocationEntry> = records
        .values()
        .map(|r| {
            let species: BTreeSet<&str> = r
                .versions
                .iter()
                .flat_map(|(_, d)| d.encounters.iter().map(|e| e.species.as_str()))
                .collect();
            let trainers: BTreeSet<&str> = r
                .versions
                .iter()
                .flat_map(|(_, d)| d.trainers.iter().map(String::as_str))
                .collect();
            let items: BTreeSet<&str> = r
                .versions
                .iter()
                .flat_map(|(_, d)| d.items.iter().map(|i| i.item.as_str()))
                .collect();
            LocationEntry {
                id: r.id.clone(),
                name: r.name.clone(),
                region: r.region.clone(),
                order: r.order,
                is_landmark: r.is_landmark,
                connections: r.connection_count,
                encounter_count: species.len(),
                trainer_count: trainers.len(),
                item_count: items.len(),
            }
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    entries
}

pub fn trainer_manifest(records: &[TrainerRecord]) -> Vec<TrainerEntry> {
    records
        .iter()
        .map(|r| TrainerEntry {
            id: r.id.clone(),
            name: r.name.clone(),
            class: r.class.clone(),
            constant_name: r.constant_name.clone(),
        })
        .collect()
}
