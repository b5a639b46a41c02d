//! Map script contents: placed items, story flags and trainer occupants.

use polished_dex_core::{AcquisitionMethod, EventKind, LocationItem, MapEvent, reduce};

use crate::line::{Directive, Line};
use crate::trainers::trainer_constant_name;

/// Everything one map script contributes to its location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapScript {
    pub items: Vec<LocationItem>,
    pub events: Vec<MapEvent>,
    /// Trainer constant names (`SWIMMERF_KENDRA`), in script order.
    pub trainers: Vec<String>,
}

pub fn extract_map_script(lines: &[Line<'_>]) -> MapScript {
    let mut out = MapScript::default();

    for d in lines.iter().filter_map(Line::directive) {
        match d.name {
            "itemball_event" | "bg_event" | "fruittree_event" | "verbosegiveitem"
            | "verbosegivetmhm" => {
                if let Some(item) = parse_item_event(d) {
                    out.items.push(item);
                }
            }
            "setevent" => {
                if let Some(event) = parse_setevent(d.body)
                    && !out.events.iter().any(|e| e.id == event.id)
                {
                    out.events.push(event);
                }
            }
            "generictrainer" | "loadtrainer" => {
                if let Some(constant) = parse_trainer_occupant(d)
                    && !out.trainers.contains(&constant)
                {
                    out.trainers.push(constant);
                }
            }
            _ => {}
        }
    }
    out
}

fn located(item: &str, method: AcquisitionMethod) -> Option<LocationItem> {
    let item = reduce(item);
    (!item.is_empty()).then_some(LocationItem {
        item,
        method,
        price: None,
    })
}

fn parse_item_event(d: &Directive<'_>) -> Option<LocationItem> {
    let args = d.args();
    match d.name {
        // itemball_event x, y, ITEM, qty, EVENT
        "itemball_event" if args.len() >= 5 => located(args[2], AcquisitionMethod::Item),
        // bg_event x, y, BGEVENT_ITEM + ITEM, EVENT
        "bg_event" => {
            let (kind, item) = args.get(2)?.split_once('+')?;
            if kind.trim() != "BGEVENT_ITEM" {
                return None;
            }
            located(item.trim(), AcquisitionMethod::HiddenItem)
        }
        // fruittree_event x, y, ID, BERRY, PAL
        "fruittree_event" if args.len() >= 4 => located(args[3], AcquisitionMethod::Berry),
        // verbosegiveitem ITEM[, qty]
        "verbosegiveitem" => located(args.first()?, AcquisitionMethod::Gift),
        // verbosegivetmhm TM_MOVE
        "verbosegivetmhm" => located(args.first()?, AcquisitionMethod::Gift),
        _ => None,
    }
}

/// `setevent EVENT_X`. Security and switch flags are bookkeeping and are
/// dropped.
pub fn parse_setevent(body: &str) -> Option<MapEvent> {
    let (_, name) = body.trim().split_once("EVENT_")?;
    let description = name.replace('_', " ").to_lowercase();
    if name.to_lowercase().contains("security") || description.contains("switch") {
        return None;
    }

    let mut item = None;
    let kind = if name.contains("BEAT_") {
        EventKind::Battle
    } else if let Some((_, got)) = name.split_once("GOT_") {
        let got = got.split("_FROM_").next().unwrap_or(got);
        let got = got.split("_IN").next().unwrap_or(got);
        let got = if got.contains("TM") || got.contains("HM") {
            got.split('_').next().unwrap_or(got)
        } else {
            got
        };
        item = Some(reduce(got));
        EventKind::Gift
    } else if name.contains("PHONE_NUMBER") {
        EventKind::Phone
    } else {
        EventKind::Event
    };

    Some(MapEvent {
        id: reduce(name),
        kind,
        description,
        item,
    })
}

/// `generictrainer CLASS, ID, ...` or `loadtrainer CLASS, ID`, as the
/// constant name of the trainer definition it refers to.
fn parse_trainer_occupant(d: &Directive<'_>) -> Option<String> {
    let args = d.args();
    let class = *args.first()?;
    let id = *args.get(1)?;
    if class.is_empty() || id.is_empty() {
        return None;
    }
    Some(trainer_constant_name(class, id))
}
