//! Moves: names, battle stats, descriptions and the TM/HM table.

use polished_dex_core::{Diagnostics, Variant, VariantMap};
use polished_dex_extract::classify_all;
use polished_dex_extract::moves::{extract_move_names, extract_move_stats, extract_tmhm};
use polished_dex_extract::text::collect_descriptions;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::manifest::moves_manifest;
use crate::merge::{MoveSources, merge_moves};
use crate::source::paths;
use crate::writer::{MOVES_DIR, MOVES_MANIFEST};

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let names = ctx.read(paths::MOVE_NAMES, false).await;
    let descriptions = ctx.read(paths::MOVE_DESCRIPTIONS, true).await;
    let stats = ctx.read(paths::MOVES, false).await;
    let tmhm = ctx.read(paths::TMHM_MOVES, false).await;

    // The Polished name table decides which moves exist.
    let name_list = |v: Variant| {
        names
            .as_ref()
            .map(|f| extract_move_names(&classify_all(f.split.lines(v))))
            .unwrap_or_default()
    };
    let mut master = name_list(Variant::Polished);
    if master.is_empty() {
        master = name_list(Variant::Faithful);
    }

    let mut sources: VariantMap<MoveSources> = VariantMap::new();
    for &variant in Variant::all() {
        let mut local = Diagnostics::new();
        let source = sources.entry(variant);
        if let Some(file) = &stats {
            let lines = classify_all(file.split.lines(variant));
            source.stats = extract_move_stats(&file.name, &lines, &mut local);
        }
        if let Some(file) = &descriptions {
            source.descriptions = collect_descriptions(&classify_all(file.split.lines(variant)), "Description");
        }
        if let Some(file) = &tmhm {
            source.tmhm = extract_tmhm(&classify_all(file.split.lines(variant)));
        }
        ctx.absorb(local, Some(variant));
    }

    let mut local = Diagnostics::new();
    ctx.moves = merge_moves(&master, &sources, &mut local);
    ctx.absorb(local, None);

    for record in ctx.moves.values() {
        ctx.writer.write_record(MOVES_DIR, &record.id, record)?;
    }
    ctx.writer.write_json(MOVES_MANIFEST, &moves_manifest(&ctx.moves))?;

    ctx.summary.moves = ctx.moves.len();
    Ok(ctx.moves.len())
}
