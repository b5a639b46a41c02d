//! Scripted encounters: static battles, gift Pokémon and the roaming beasts.

use polished_dex_core::{
    Prerequisite, PrerequisiteKind, StaticEncounter, StaticKind, display_name, reduce, title_case,
};

use crate::line::{Directive, Line};

/// Map scripts that only exist for testing and are never reachable.
pub const DEBUG_LOCATIONS: &[&str] = &["playershouse2f", "celadonuniversityhypertestroom"];

/// Lines after an encounter command still searched for its battle type.
const BLOCK_LOOKAHEAD: usize = 10;

/// The roaming beasts and their fixed level.
const ROAMERS: &[(&str, u8)] = &[("RAIKOU", 40), ("ENTEI", 40), ("SUICUNE", 40)];

/// Story events that gate a scripted encounter.
const GATING_EVENTS: &[&str] = &[
    "BEAT_ELITE_FOUR",
    "RESTORED_POWER_TO_KANTO",
    "GOT_RAINBOW_WING",
    "FOUGHT_",
];

pub fn is_debug_location(location: &str) -> bool {
    DEBUG_LOCATIONS.contains(&location)
}

/// `loadwildmon` and `givepoke` encounters of one map script. `map` is the
/// script's file stem (`SproutTower3F`).
pub fn extract_static_encounters(map: &str, lines: &[Line<'_>]) -> Vec<StaticEncounter> {
    let location = reduce(map);
    let location_name = display_name(map);
    let mut out = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(d) = line.directive() else {
            continue;
        };
        let parsed = match d.name {
            "loadwildmon" => parse_loadwildmon(d),
            "givepoke" => parse_givepoke(d),
            _ => continue,
        };
        let Some(mut encounter) = parsed else {
            continue;
        };

        let block = script_block(lines, i);
        if encounter.kind == StaticKind::Static {
            encounter.legendary = block
                .iter()
                .filter_map(Line::directive)
                .any(|d| d.body.contains("BATTLETYPE_LEGENDARY"));
        }
        encounter.prerequisites = prerequisites(block);
        encounter.id = encounter_id(&location, &encounter);
        encounter.location = location.clone();
        encounter.location_name = location_name.clone();
        out.push(encounter);
    }
    out
}

fn encounter_id(location: &str, e: &StaticEncounter) -> String {
    let gift = if e.kind == StaticKind::Gift { "_gift" } else { "" };
    let form = e.form.as_ref().map(|f| format!("_{f}")).unwrap_or_default();
    format!("{location}{gift}_{}{form}_{}", e.species, e.level)
}

fn blank(species: &str, level: u8, kind: StaticKind) -> StaticEncounter {
    StaticEncounter {
        id: String::new(),
        species: reduce(species),
        form: None,
        level,
        location: String::new(),
        location_name: String::new(),
        kind,
        legendary: false,
        held_item: None,
        prerequisites: Vec::new(),
        valid_maps: Vec::new(),
    }
}

fn form_arg(arg: &str) -> Option<Option<String>> {
    let form = arg.split('|').map(str::trim).find(|p| p.ends_with("_FORM"))?;
    Some((form != "PLAIN_FORM").then(|| reduce(form.trim_end_matches("_FORM"))))
}

/// `loadwildmon SPECIES[, X_FORM], LEVEL`.
fn parse_loadwildmon(d: &Directive<'_>) -> Option<StaticEncounter> {
    let args = d.args();
    let species = *args.first()?;
    let level = args.last()?.parse().ok()?;
    let mut encounter = blank(species, level, StaticKind::Static);
    if args.len() > 2 {
        encounter.form = form_arg(args[1]).flatten();
    }
    Some(encounter)
}

/// `givepoke SPECIES[, [GENDER |] X_FORM], LEVEL[, ITEM, ...]`. Lines
/// without a level are not gifts of a fixed Pokémon.
fn parse_givepoke(d: &Directive<'_>) -> Option<StaticEncounter> {
    let args = d.args();
    let species = *args.first()?;
    let mut rest = args[1..].iter().copied().peekable();

    let form = rest.peek().and_then(|a| form_arg(a)).flatten();
    if rest.peek().is_some_and(|a| form_arg(a).is_some()) {
        rest.next();
    }
    let level = rest.next()?.parse().ok()?;

    let mut encounter = blank(species, level, StaticKind::Gift);
    encounter.form = form;
    encounter.held_item = rest
        .next()
        .filter(|i| *i != "NO_ITEM" && i.starts_with(|c: char| c.is_ascii_uppercase()))
        .map(reduce);
    Some(encounter)
}

/// From the nearest preceding global label to a few lines past `at`.
fn script_block<'a, 'b>(lines: &'b [Line<'a>], at: usize) -> &'b [Line<'a>] {
    let start = lines[..=at]
        .iter()
        .rposition(|l| l.label().is_some_and(|name| !name.starts_with('.')))
        .unwrap_or(at);
    let end = lines.len().min(at + BLOCK_LOOKAHEAD);
    &lines[start..end]
}

fn prerequisites(block: &[Line<'_>]) -> Vec<Prerequisite> {
    let mut out: Vec<Prerequisite> = Vec::new();
    let mut push = |p: Prerequisite| {
        if !out.contains(&p) {
            out.push(p);
        }
    };

    for d in block.iter().filter_map(Line::directive) {
        match d.name {
            "checkkeyitem" => push(Prerequisite {
                kind: PrerequisiteKind::Item,
                id: reduce(d.body),
                name: title_case(d.body),
            }),
            "checkflag" => {
                if let Some(species) = d.body.strip_prefix("ENGINE_PLAYER_CAUGHT_") {
                    push(Prerequisite {
                        kind: PrerequisiteKind::Caught,
                        id: reduce(species),
                        name: title_case(species),
                    });
                }
            }
            "checkevent" => {
                if let Some(event) = d.body.strip_prefix("EVENT_")
                    && GATING_EVENTS.iter().any(|g| event.starts_with(g))
                {
                    push(Prerequisite {
                        kind: PrerequisiteKind::Event,
                        id: reduce(event),
                        name: title_case(event),
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// Map constants from `roam_map X, ...` lines of `roammon_maps.asm`.
pub fn extract_roam_maps(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.directive_named("roam_map"))
        .filter_map(|d| d.arg(0))
        .map(reduce)
        .collect()
}

/// One entry per roaming beast, each valid on every roaming map.
pub fn roaming_encounters(valid_maps: &[String]) -> Vec<StaticEncounter> {
    ROAMERS
        .iter()
        .map(|&(species, level)| {
            let mut encounter = blank(species, level, StaticKind::Roaming);
            encounter.id = format!("roaming_{}", encounter.species);
            encounter.location = "roaming".to_string();
            encounter.location_name = "Roaming (Johto Routes)".to_string();
            encounter.legendary = true;
            encounter.valid_maps = valid_maps.to_vec();
            encounter.prerequisites = vec![Prerequisite {
                kind: PrerequisiteKind::Event,
                id: "beatelitefourfoughtsuicune".to_string(),
                name: "Beat Elite Four & Fought Suicune".to_string(),
            }];
            encounter
        })
        .collect()
}

/// Keep the first encounter of every id.
pub fn dedup_encounters(encounters: &mut Vec<StaticEncounter>) {
    let mut seen = std::collections::HashSet::new();
    encounters.retain(|e| seen.insert(e.id.clone()));
}

#[cfg(test)]
#[path = "tests/statics_tests.rs"]
mod tests;
