//! Items: attribute, name and description tables, key items, the curated
//! overlay and the reverse index of where each item can be obtained.

use std::collections::BTreeMap;

use polished_dex_core::{DiagnosticKind, Diagnostics, Variant, VariantMap};
use polished_dex_extract::curated::load_curated_items;
use polished_dex_extract::items::{extract_items, extract_key_items};

use super::{classified, name_of};
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::manifest::items_manifest;
use crate::merge::{apply_curated_items, merge_items};
use crate::resolver::{attach_item_locations, item_locations};
use crate::source::paths;
use crate::writer::{ITEMS_DIR, ITEMS_MANIFEST};

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let attributes = ctx.read(paths::ITEM_ATTRIBUTES, false).await;
    let names = ctx.read(paths::ITEM_NAMES, false).await;
    let descriptions = ctx.read(paths::ITEM_DESCRIPTIONS, true).await;
    let key_names = ctx.read(paths::KEY_ITEM_NAMES, false).await;
    let key_descriptions = ctx.read(paths::KEY_ITEM_DESCRIPTIONS, true).await;
    let source_name = name_of(attributes.as_ref(), paths::ITEM_ATTRIBUTES).to_string();

    let mut entries = VariantMap::new();
    for &variant in Variant::all() {
        let mut local = Diagnostics::new();
        let mut list = extract_items(
            &source_name,
            &classified(attributes.as_ref(), variant),
            &classified(names.as_ref(), variant),
            &classified(descriptions.as_ref(), variant),
            &mut local,
        );
        list.extend(extract_key_items(
            &classified(key_names.as_ref(), variant),
            &classified(key_descriptions.as_ref(), variant),
        ));
        entries.insert(variant, list);
        ctx.absorb(local, Some(variant));
    }
    ctx.items = merge_items(&entries);

    if let Some(dir) = ctx.options.curated_items.clone() {
        match load_curated_items(&dir) {
            Ok(curated) => {
                log::info!("Loaded {} curated item entries", curated.len());
                apply_curated_items(&mut ctx.items, &curated);
            }
            Err(e) => {
                ctx.warn(format!("curated items: {e}"));
                ctx.diagnostics.record(
                    DiagnosticKind::MissingFile,
                    dir.display().to_string(),
                    e.to_string(),
                );
            }
        }
    }

    let empty_scripts = BTreeMap::new();
    for &variant in Variant::all() {
        let scripts = ctx.map_scripts.get(variant).unwrap_or(&empty_scripts);
        let marts = ctx.marts.get(variant).map_or(&[][..], Vec::as_slice);
        let index = item_locations(scripts, marts, &ctx.locations);

        let mut local = Diagnostics::new();
        attach_item_locations(&mut ctx.items, variant, index, &ctx.moves, &mut local);
        ctx.absorb(local, Some(variant));
    }

    for record in ctx.items.values() {
        ctx.writer.write_record(ITEMS_DIR, &record.id, record)?;
    }
    ctx.writer.write_json(ITEMS_MANIFEST, &items_manifest(&ctx.items))?;

    ctx.summary.items = ctx.items.len();
    Ok(ctx.items.len())
}
