//! Trainers: parties of both variants, merged per trainer, with default
//! movesets filled in from the species records already on disk.

use polished_dex_core::{Diagnostics, Variant, VariantMap};
use polished_dex_extract::trainers::extract_trainers;

use super::{classified, name_of};
use crate::backfill::backfill_trainer_moves;
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::manifest::trainer_manifest;
use crate::merge::{merge_trainers, trainer_constants};
use crate::source::paths;
use crate::writer::{TRAINER_MANIFEST, TRAINERS_DIR};

pub async fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let parties = ctx.read(paths::PARTIES, true).await;
    let source_name = name_of(parties.as_ref(), paths::PARTIES).to_string();

    let mut trainers = VariantMap::new();
    for &variant in Variant::all() {
        let mut local = Diagnostics::new();
        let list = extract_trainers(&source_name, &classified(parties.as_ref(), variant), &mut local);
        log::debug!("{variant}: {} trainer definitions", list.len());
        trainers.insert(variant, list);
        ctx.absorb(local, Some(variant));
    }

    let mut records = merge_trainers(&trainers);
    ctx.trainer_constants = trainer_constants(&records, &trainers);

    let mut local = Diagnostics::new();
    let filled = backfill_trainer_moves(&mut records, &ctx.writer, &mut local);
    ctx.absorb(local, None);
    log::info!("Filled default moves for {filled} party members");

    for record in &records {
        ctx.writer.write_record(TRAINERS_DIR, &record.file_stem(), record)?;
    }
    ctx.writer.write_json(TRAINER_MANIFEST, &trainer_manifest(&records))?;

    ctx.trainers = records;
    ctx.summary.trainers = ctx.trainers.len();
    Ok(ctx.trainers.len())
}
