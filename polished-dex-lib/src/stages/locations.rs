//! Locations: landmarks, map attributes and headers, wild encounter
//! tables, map scripts and marts.
//!
//! Location records are only written by the finish stage, once trainers,
//! items and static encounters can be attached to them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use polished_dex_core::{
    DiagnosticKind, Diagnostics, Encounter, LocationData, LocationRecord, Variant, VariantMap,
    display_name, reduce,
};
use polished_dex_extract::events::extract_map_script;
use polished_dex_extract::locations::{
    Landmark, MapAttributes, MapHeader, WildTable, add_encounter, extract_landmarks,
    extract_map_attributes, extract_map_headers, extract_wild_encounters,
};
use polished_dex_extract::marts::extract_marts;

use super::classified;
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::progress::Stage;
use crate::source::{WILD_TABLES, paths};

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let landmarks_file = ctx.read(paths::LANDMARK_CONSTANTS, false).await;
    let attributes_file = ctx.read(paths::MAP_ATTRIBUTES, false).await;
    let headers_file = ctx.read(paths::MAP_HEADERS, false).await;
    let marts_file = ctx.read(paths::MARTS, false).await;

    let wild_paths: Vec<PathBuf> = WILD_TABLES
        .iter()
        .map(|(file, _, _)| ctx.source.path(&format!("{}/{file}", paths::WILD_DIR)))
        .collect();
    let wild_files = ctx.read_batch(Stage::Locations, wild_paths, false).await;

    for &variant in Variant::all() {
        let mut local = Diagnostics::new();

        let landmarks = extract_landmarks(&classified(landmarks_file.as_ref(), variant));
        let attributes = extract_map_attributes(&classified(attributes_file.as_ref(), variant));
        let headers = extract_map_headers(&classified(headers_file.as_ref(), variant));
        add_locations(&mut ctx.locations, variant, &attributes, &headers, &landmarks);

        let mut wild = WildTable::new();
        for file in &wild_files {
            let Some((_, keyword, method)) = WILD_TABLES
                .iter()
                .find(|(name, _, _)| file.name.ends_with(name))
            else {
                continue;
            };
            let lines = classified(Some(file), variant);
            for (constant, encounters) in extract_wild_encounters(&file.name, &lines, keyword, *method, &mut local) {
                let slots = wild.entry(constant).or_default();
                for encounter in encounters {
                    add_encounter(slots, encounter);
                }
            }
        }
        attach_encounters(ctx, variant, &attributes, wild, &mut local);

        ctx.marts
            .insert(variant, extract_marts(&classified(marts_file.as_ref(), variant)));
        ctx.absorb(local, Some(variant));
    }

    // ── Map scripts ─────────────────────────────────────────────────────
    let script_paths = ctx.source.list_asm(paths::MAPS_DIR);
    let map_files = ctx.read_batch(Stage::Locations, script_paths, false).await;
    for &variant in Variant::all() {
        let scripts = ctx.map_scripts.entry(variant);
        for file in &map_files {
            let script = extract_map_script(&classified(Some(file), variant));
            scripts.insert(reduce(&file.stem), script);
        }
    }
    ctx.map_sources = map_files;

    log::info!(
        "{} locations, {} map scripts",
        ctx.locations.len(),
        ctx.map_sources.len()
    );
    Ok(ctx.locations.len())
}

/// Create (or extend with `variant`) one record per map in the attribute
/// table. Landmark data comes from the map's own landmark constant; a map
/// inside another landmark gets that landmark as parent and inherits its
/// region.
fn add_locations(
    locations: &mut BTreeMap<String, LocationRecord>,
    variant: Variant,
    attributes: &[MapAttributes],
    headers: &[MapHeader],
    landmarks: &[Landmark],
) {
    let landmarks: HashMap<&str, &Landmark> = landmarks.iter().map(|l| (l.key.as_str(), l)).collect();
    let headers: HashMap<&str, &MapHeader> = headers.iter().map(|h| (h.name.as_str(), h)).collect();

    for attr in attributes {
        let id = reduce(&attr.name);
        if id.is_empty() {
            continue;
        }
        let record = locations.entry(id.clone()).or_insert_with(|| {
            let header = headers.get(attr.name.as_str());
            let own = landmarks.get(id.as_str());
            let parent = header
                .map(|h| h.landmark.as_str())
                .filter(|l| !l.is_empty() && *l != id && landmarks.contains_key(l));

            let mut tags = Vec::new();
            if let Some(h) = header.filter(|h| !h.environment.is_empty()) {
                tags.push(h.environment.clone());
            }
            if own.is_some() {
                tags.push("landmark".to_string());
            }

            LocationRecord {
                id: id.clone(),
                name: display_name(&attr.name),
                constant_name: Some(attr.constant.clone()),
                connection_count: attr.connection_count,
                tags,
                is_landmark: own.is_some(),
                order: own.map(|l| l.order),
                region: own
                    .or_else(|| parent.and_then(|p| landmarks.get(p)))
                    .map(|l| l.region.clone()),
                parent: parent.map(str::to_string),
                versions: VariantMap::new(),
            }
        });
        record.versions.entry(variant);
    }
}

/// Join wild tables to locations through the map constant. Species the
/// variant does not define are reported but kept.
fn attach_encounters(
    ctx: &mut PipelineContext,
    variant: Variant,
    attributes: &[MapAttributes],
    mut wild: WildTable,
    diagnostics: &mut Diagnostics,
) {
    let table = ctx.species.get(variant);
    for attr in attributes {
        let Some(encounters) = wild.remove(&attr.constant) else {
            continue;
        };
        let id = reduce(&attr.name);
        let unknown: BTreeSet<&str> = encounters
            .iter()
            .map(|e: &Encounter| e.species.as_str())
            .filter(|s| table.is_some_and(|t| !t.is_empty() && !t.contains(s)))
            .collect();
        for species in unknown {
            diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                &id,
                format!("wild encounter names unknown species {species}"),
            );
        }
        if let Some(record) = ctx.locations.get_mut(&id) {
            let data: &mut LocationData = record.versions.entry(variant);
            for encounter in encounters {
                add_encounter(&mut data.encounters, encounter);
            }
        }
    }
    for constant in wild.keys() {
        diagnostics.record(
            DiagnosticKind::CrossReferenceMiss,
            constant,
            "wild encounter table for a map with no attributes entry",
        );
    }
}
