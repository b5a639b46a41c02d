//! Species: names, forms, base stats, evolutions, movesets and abilities.
//!
//! Writes `pokemon/`, `evolution/`, the species, abilities and evolution
//! family manifests.

use std::collections::BTreeSet;

use polished_dex_core::{Diagnostics, EvolutionRecord, Variant, VariantMap};
use polished_dex_extract::abilities::extract_abilities;
use polished_dex_extract::classify_all;
use polished_dex_extract::evos::{extract_egg_moves, extract_evos_attacks, inherit_plain_movesets};
use polished_dex_extract::species::{ensure_plain_forms, extract_forms, extract_names};
use polished_dex_extract::stats::{
    TmCompatibility, apply_stat_block, fill_cosmetic_forms, parse_stat_block,
};

use super::{classified, name_of};
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::manifest::species_manifest;
use crate::merge::{assemble_movesets, merge_abilities, merge_species};
use crate::progress::Stage;
use crate::resolver::{
    chains_by_species, check_move_references, evolution_chains, evolution_families,
    explicit_egg_moves, propagate_egg_moves,
};
use crate::source::paths;
use crate::writer::{
    ABILITIES_MANIFEST, EVOLUTION_DIR, EVOLUTION_MANIFEST, POKEMON_DIR, POKEMON_MANIFEST,
};

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let names = ctx.read(paths::POKEMON_NAMES, false).await;
    let constants = ctx.read(paths::POKEMON_CONSTANTS, false).await;
    let evos = ctx.read(paths::EVOS_ATTACKS, false).await;
    let eggs = ctx.read(paths::EGG_MOVES, false).await;
    let ability_names = ctx.read(paths::ABILITY_NAMES, false).await;
    let ability_descriptions = ctx.read(paths::ABILITY_DESCRIPTIONS, true).await;

    // ── Names and forms ─────────────────────────────────────────────────
    for &variant in Variant::all() {
        let mut local = Diagnostics::new();
        let mut table = extract_names(&classified(names.as_ref(), variant));
        extract_forms(
            name_of(constants.as_ref(), paths::POKEMON_CONSTANTS),
            &classified(constants.as_ref(), variant),
            &mut table,
            &mut local,
        );
        ensure_plain_forms(&mut table, &mut local);
        ctx.species.insert(variant, table);
        ctx.absorb(local, Some(variant));
    }

    // ── Base stats ──────────────────────────────────────────────────────
    let stat_paths = ctx.source.list_asm(paths::BASE_STATS_DIR);
    let stat_files = ctx.read_batch(Stage::Species, stat_paths, false).await;
    let mut tm: VariantMap<TmCompatibility> = VariantMap::new();
    for file in &stat_files {
        for &variant in Variant::all() {
            let mut local = Diagnostics::new();
            let lines = classify_all(file.split.lines(variant));
            if let Some(block) = parse_stat_block(&file.name, &lines, &mut local) {
                apply_stat_block(
                    &file.name,
                    variant,
                    &block,
                    &mut ctx.species,
                    tm.entry(variant),
                    &mut local,
                );
            }
            ctx.absorb(local, Some(variant));
        }
    }
    for &variant in Variant::all() {
        if let Some(table) = ctx.species.get_mut(variant) {
            fill_cosmetic_forms(table);
        }
    }

    // ── Evolutions, learnsets and egg moves ─────────────────────────────
    let mut abilities = VariantMap::new();
    for &variant in Variant::all() {
        let mut local = Diagnostics::new();
        let evos_attacks = extract_evos_attacks(
            name_of(evos.as_ref(), paths::EVOS_ATTACKS),
            &classified(evos.as_ref(), variant),
            &mut local,
        );
        let graph = evos_attacks.evolutions;
        let mut learnsets = evos_attacks.learnsets;
        let mut egg_moves = explicit_egg_moves(extract_egg_moves(&classified(eggs.as_ref(), variant)));

        let table = ctx.species.entry(variant);
        inherit_plain_movesets(table, &mut learnsets);
        propagate_egg_moves(table, &graph, &mut egg_moves);
        assemble_movesets(table, &learnsets, tm.entry(variant), &egg_moves);
        check_move_references(table, &ctx.moves, &mut local);

        abilities.insert(
            variant,
            extract_abilities(
                &classified(ability_names.as_ref(), variant),
                &classified(ability_descriptions.as_ref(), variant),
            ),
        );
        ctx.evolutions.insert(variant, graph);
        ctx.absorb(local, Some(variant));
    }

    // ── Output ──────────────────────────────────────────────────────────
    let records = merge_species(&ctx.species);
    for record in &records {
        ctx.writer.write_record(POKEMON_DIR, &record.id, record)?;
    }
    ctx.writer.write_json(POKEMON_MANIFEST, &species_manifest(&records))?;

    let ability_records = merge_abilities(&abilities);
    ctx.writer.write_json(ABILITIES_MANIFEST, &ability_records)?;

    let chains = ctx.evolutions.map(|_, graph| chains_by_species(&evolution_chains(graph)));
    let evolving: BTreeSet<&String> = chains.iter().flat_map(|(_, by)| by.keys()).collect();
    for id in evolving {
        let record = EvolutionRecord {
            id: id.clone(),
            versions: chains.map(|_, by| by.get(id).cloned().unwrap_or_default()),
        };
        ctx.writer.write_record(EVOLUTION_DIR, id, &record)?;
    }

    let dex_order: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
    let families = evolution_families(&ctx.evolutions, &dex_order);
    ctx.writer.write_json(EVOLUTION_MANIFEST, &families)?;

    ctx.summary.species = records.len();
    ctx.summary.abilities = ability_records.len();
    ctx.summary.evolution_families = families.len();
    Ok(records.len())
}
