//! Attach trainers, events, items and static encounters to locations,
//! then write locations and the diagnostics report.

use polished_dex_core::Diagnostics;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::manifest::locations_manifest;
use crate::resolver::LocationIndex;
use crate::writer::{LOCATIONS_DIR, LOCATIONS_MANIFEST};

pub fn run(ctx: &mut PipelineContext) -> Result<usize, PipelineError> {
    let mut local = Diagnostics::new();
    let index = LocationIndex::build(
        &ctx.map_scripts,
        &ctx.marts,
        &ctx.trainer_constants,
        &ctx.statics,
        &ctx.locations,
        &mut local,
    );
    index.apply(&mut ctx.locations, &mut local);
    ctx.absorb(local, None);

    for record in ctx.locations.values() {
        ctx.writer.write_record(LOCATIONS_DIR, &record.id, record)?;
    }
    ctx.writer.write_json(LOCATIONS_MANIFEST, &locations_manifest(&ctx.locations))?;
    ctx.summary.locations = ctx.locations.len();

    let report = ctx.writer.write_diagnostics(&ctx.diagnostics)?;
    log::info!(
        "{} diagnostics written to {}",
        ctx.diagnostics.len(),
        report.display()
    );
    Ok(ctx.locations.len())
}
