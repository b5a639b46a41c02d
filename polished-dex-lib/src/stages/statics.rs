//! Static, gift and roaming encounters from the map scripts read by the
//! locations stage.

use polished_dex_core::{
    DiagnosticKind, Diagnostics, PrerequisiteKind, StaticEncounter, Variant, reduce,
};
use polished_dex_extract::statics::{
    dedup_encounters, extract_roam_maps, extract_static_encounters, is_debug_location,
    roaming_encounters,
};

use super::classified;
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::source::paths;
use crate::writer::STATIC_MANIFEST;

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let roam_file = ctx.read(paths::ROAM_MAPS, false).await;

    let mut encounters: Vec<StaticEncounter> = Vec::new();
    for &variant in Variant::all() {
        for file in &ctx.map_sources {
            if !ctx.options.keep_debug_locations && is_debug_location(&reduce(&file.stem)) {
                continue;
            }
            encounters.extend(extract_static_encounters(&file.stem, &classified(Some(file), variant)));
        }
    }

    let mut roam_maps = extract_roam_maps(&classified(roam_file.as_ref(), Variant::Polished));
    if roam_maps.is_empty() {
        roam_maps = extract_roam_maps(&classified(roam_file.as_ref(), Variant::Faithful));
    }
    if !roam_maps.is_empty() {
        encounters.extend(roaming_encounters(&roam_maps));
    }
    dedup_encounters(&mut encounters);

    let mut local = Diagnostics::new();
    check_references(ctx, &encounters, &mut local);
    ctx.absorb(local, None);

    ctx.writer.write_json(STATIC_MANIFEST, &encounters)?;
    ctx.statics = encounters;
    ctx.summary.static_encounters = ctx.statics.len();
    Ok(ctx.statics.len())
}

/// Species, held items and item prerequisites must name known records.
fn check_references(ctx: &PipelineContext, encounters: &[StaticEncounter], diagnostics: &mut Diagnostics) {
    let known_species = |id: &str| ctx.species.iter().any(|(_, t)| t.contains(id));
    let known_item = |id: &str| ctx.items.is_empty() || ctx.items.contains_key(id);

    for e in encounters {
        if !ctx.species.is_empty() && !known_species(e.species.as_str()) {
            diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                &e.id,
                format!("unknown species {}", e.species),
            );
        }
        let items = e.held_item.iter().chain(
            e.prerequisites
                .iter()
                .filter(|p| p.kind == PrerequisiteKind::Item)
                .map(|p| &p.id),
        );
        for item in items.filter(|i| !known_item(i.as_str())) {
            diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                &e.id,
                format!("unknown item {item}"),
            );
        }
    }
}
