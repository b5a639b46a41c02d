//! Map metadata and wild encounter tables.

use std::collections::BTreeMap;

use polished_dex_core::{
    DiagnosticKind, Diagnostics, Encounter, EncounterMethod, LevelRange, TimeSlot, reduce,
};

use crate::cursor::LineCursor;
use crate::line::{Directive, Line};

// ── Landmarks ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    /// Reduced constant (`newbarktown`).
    pub key: String,
    /// 1-based position in the landmark table.
    pub order: u32,
    pub region: String,
}

/// Landmark constants from `landmark_constants.asm`. The region switches
/// from Johto to Kanto at `KANTO_LANDMARK` and to Orange at
/// `SHAMOUTI_LANDMARK`; `SPECIAL_MAP` is not a landmark.
pub fn extract_landmarks(lines: &[Line<'_>]) -> Vec<Landmark> {
    let mut region = "Johto";
    let mut out = Vec::new();

    for d in lines.iter().filter_map(Line::directive) {
        let text = format!("{} {}", d.name, d.body);
        if text.contains("KANTO_LANDMARK EQU") {
            region = "Kanto";
            continue;
        }
        if text.contains("SHAMOUTI_LANDMARK EQU") {
            region = "Orange";
            continue;
        }
        if d.name != "const" || d.body.contains("SPECIAL_MAP") {
            continue;
        }
        let is_index = d
            .comment
            .is_some_and(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_hexdigit()));
        if !is_index {
            continue;
        }
        out.push(Landmark {
            key: reduce(d.body),
            order: out.len() as u32 + 1,
            region: region.to_string(),
        });
    }
    out
}

// ── Map attributes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAttributes {
    /// Map label (`NewBarkTown`).
    pub name: String,
    /// Map constant (`NEW_BARK_TOWN`), the key of wild encounter tables.
    pub constant: String,
    pub connection_count: u8,
}

/// `map_attributes Name, CONST, $border, DIRS`.
pub fn extract_map_attributes(lines: &[Line<'_>]) -> Vec<MapAttributes> {
    lines
        .iter()
        .filter_map(|l| l.directive_named("map_attributes"))
        .filter_map(|d| {
            let args = d.args();
            if args.len() < 4 {
                return None;
            }
            let dirs = args[3];
            let connection_count = ["NORTH", "SOUTH", "EAST", "WEST"]
                .iter()
                .filter(|dir| dirs.contains(*dir))
                .count() as u8;
            Some(MapAttributes {
                name: args[0].to_string(),
                constant: args[1].to_string(),
                connection_count,
            })
        })
        .collect()
}

// ── Map headers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    pub name: String,
    /// Reduced environment (`town`, `route`, `indoor`, `cave`, ...).
    pub environment: String,
    /// Reduced landmark the map belongs to.
    pub landmark: String,
}

/// `map Name, TILESET, ENVIRONMENT, LANDMARK, ...` from `maps.asm`.
pub fn extract_map_headers(lines: &[Line<'_>]) -> Vec<MapHeader> {
    lines
        .iter()
        .filter_map(|l| l.directive_named("map"))
        .filter_map(|d| {
            let args = d.args();
            if args.len() < 4 {
                return None;
            }
            Some(MapHeader {
                name: args[0].to_string(),
                environment: reduce(args[2]),
                landmark: reduce(args[3].trim_start_matches("LANDMARK_")),
            })
        })
        .collect()
}

// ── Wild encounters ─────────────────────────────────────────────────────────

/// Encounter slots keyed by map constant.
pub type WildTable = BTreeMap<String, Vec<Encounter>>;

/// Encounter rate credited to each table slot.
pub const SLOT_RATE: u16 = 10;

/// Parse `def_<keyword>_wildmons CONST` ... `end_<keyword>_wildmons` blocks.
///
/// The line after the header holds the table's encounter rates and is
/// skipped. Grass tables are split into morning/day/night by `; day` and
/// `; nite` markers; other tables carry no time slot.
pub fn extract_wild_encounters(
    source_name: &str,
    lines: &[Line<'_>],
    keyword: &str,
    method: EncounterMethod,
    diagnostics: &mut Diagnostics,
) -> WildTable {
    let header = format!("def_{keyword}_wildmons");
    let footer = format!("end_{keyword}_wildmons");
    let is_header = |l: &Line<'_>| l.is_directive(&header);
    let is_footer = |l: &Line<'_>| l.is_directive(&footer) || l.is_directive(&header);
    let timed = method == EncounterMethod::Grass;

    let mut out = WildTable::new();
    let mut cursor = LineCursor::new(lines);

    while let Some(map) = cursor.seek(is_header).and_then(Line::directive) {
        let constant = map.body.to_string();
        cursor.advance();

        let mut time = timed.then_some(TimeSlot::Morning);
        let slots = out.entry(constant.clone()).or_default();
        for line in cursor.until_marker(is_footer) {
            if timed && let Some(comment) = line.comment() {
                if comment.starts_with("day") {
                    time = Some(TimeSlot::Day);
                } else if comment.starts_with("nite") {
                    time = Some(TimeSlot::Night);
                }
            }
            let Some(d) = line.directive_named("wildmon") else {
                continue;
            };
            match parse_wildmon(d, method, time) {
                Some(encounter) => add_encounter(slots, encounter),
                None => diagnostics.record(
                    DiagnosticKind::MalformedField,
                    source_name,
                    format!("{constant}: wildmon {}", d.body),
                ),
            }
        }
    }

    log::debug!("{source_name}: {} {} tables", out.len(), method.as_str());
    out
}

/// `wildmon level, SPECIES[, X_FORM]`.
fn parse_wildmon(d: &Directive<'_>, method: EncounterMethod, time: Option<TimeSlot>) -> Option<Encounter> {
    let args = d.args();
    let level = args.first()?.parse().ok()?;
    let species = reduce(args.get(1)?);
    let form = args
        .get(2)
        .filter(|f| f.ends_with("_FORM") && !f.contains("PLAIN"))
        .map(|f| reduce(f.trim_end_matches("_FORM")));
    Some(Encounter {
        species,
        method,
        time,
        level: LevelRange::single(level),
        rate: SLOT_RATE,
        form,
    })
}

/// Fold a slot into a table: the same species, form, method and time slot
/// seen again widens the level range and adds its rate.
pub fn add_encounter(slots: &mut Vec<Encounter>, encounter: Encounter) {
    let existing = slots.iter_mut().find(|e| {
        e.species == encounter.species
            && e.form == encounter.form
            && e.method == encounter.method
            && e.time == encounter.time
    });
    match existing {
        Some(e) => {
            e.level.widen(encounter.level.min);
            e.level.widen(encounter.level.max);
            e.rate += encounter.rate;
        }
        None => slots.push(encounter),
    }
}

#[cfg(test)]
#[path = "tests/locations_tests.rs"]
mod tests;
