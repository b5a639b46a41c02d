//! Shop inventories from `data/items/marts.asm`.
//!
//! A mart is a label followed by `db ITEM` lines (or `dbw TM_X, price`
//! for priced exchanges). Several labels may stand directly above one
//! list; they all sell it.

use polished_dex_core::{AcquisitionMethod, LocationItem, display_name, reduce};

use crate::line::{Directive, Line};

/// Label endings that open a mart list.
const MART_SUFFIXES: &[&str] = &["Mart", "Mart1", "Mart2", "Mart3", "TMMart", "Souvenir", "Eevee"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mart {
    pub label: String,
    /// Reduced area identity.
    pub area: String,
    pub area_name: String,
    pub items: Vec<LocationItem>,
}

pub fn is_mart_label(name: &str) -> bool {
    MART_SUFFIXES.iter().any(|s| name.ends_with(s))
}

pub fn extract_marts(lines: &[Line<'_>]) -> Vec<Mart> {
    let mut marts: Vec<Mart> = Vec::new();
    // Labels seen since the last item line; they share the next list.
    let mut pending: Vec<usize> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for line in lines {
        if let Some(label) = line.label() {
            if is_mart_label(label) {
                if !open.is_empty() && pending.is_empty() {
                    open.clear();
                }
                let area_name = format_mart_name(label);
                marts.push(Mart {
                    label: label.to_string(),
                    area: reduce(&area_name),
                    area_name,
                    items: Vec::new(),
                });
                pending.push(marts.len() - 1);
            } else {
                pending.clear();
                open.clear();
            }
            continue;
        }

        let Some(item) = line.directive().and_then(parse_mart_entry) else {
            continue;
        };
        if !pending.is_empty() {
            open = std::mem::take(&mut pending);
        }
        for &idx in &open {
            let mart = &mut marts[idx];
            if !mart.items.iter().any(|i| i.item == item.item) {
                mart.items.push(item.clone());
            }
        }
    }

    log::debug!("marts.asm: {} marts", marts.len());
    marts
}

/// `db ITEM`, `db ITEM, price` or `dbw TM_X, price`. Count bytes and the
/// `-1` terminator are not entries.
fn parse_mart_entry(d: &Directive<'_>) -> Option<LocationItem> {
    if !matches!(d.name, "db" | "dbw") {
        return None;
    }
    let args = d.args();
    let raw = *args.first()?;
    if raw.is_empty() || raw.starts_with('-') || raw.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let price = args.get(1).and_then(|p| p.parse().ok()).filter(|&p: &u32| p > 0);
    Some(LocationItem {
        item: reduce(raw),
        method: AcquisitionMethod::Purchase,
        price,
    })
}

/// Display name of a mart label: the `Mart`/`MartN` suffix is removed, the
/// rest is split like a map name, and shop-kind suffixes are spelled out.
///
/// ```
/// use polished_dex_extract::marts::format_mart_name;
/// assert_eq!(format_mart_name("VioletMart"), "Violet");
/// assert_eq!(format_mart_name("MahoganyMart2"), "Mahogany");
/// assert_eq!(format_mart_name("Goldenrod5FTMMart"), "Goldenrod 5F TM Shop");
/// assert_eq!(format_mart_name("LavenderSouvenir"), "Lavender Souvenir Shop");
/// ```
pub fn format_mart_name(label: &str) -> String {
    let stem = label.trim_end_matches(|c: char| c.is_ascii_digit());
    let stem = stem.strip_suffix("Mart").unwrap_or(stem);

    let (stem, suffix) = if let Some(s) = stem.strip_suffix("TM") {
        (s, Some("TM Shop"))
    } else if let Some(s) = stem.strip_suffix("Dept") {
        (s, Some("Department Store"))
    } else if let Some(s) = stem.strip_suffix("Souvenir") {
        (s, Some("Souvenir Shop"))
    } else if let Some(s) = stem.strip_suffix("Eevee") {
        (s, Some("(With Eevee)"))
    } else {
        (stem, None)
    };

    let base = display_name(stem);
    match suffix {
        Some(suffix) if base.is_empty() => suffix.to_string(),
        Some(suffix) => format!("{base} {suffix}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::classify_all;
    use crate::split::{SplitOptions, split_variants};

    fn marts(text: &str) -> Vec<Mart> {
        let lines = split_variants("marts.asm", text, SplitOptions::new()).polished;
        extract_marts(&classify_all(&lines))
    }

    #[test]
    fn shared_labels_sell_the_same_list() {
        let out = marts(
            "MahoganyMart1:\nMahoganyMart2:\n\tdb 2 ; # items\n\tdb POKE_BALL\n\tdb POTION\n\tdb -1\n\nVioletMart:\n\tdb 1\n\tdb ESCAPE_ROPE\n\tdb -1",
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].items, out[1].items);
        let ids: Vec<_> = out[0].items.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(ids, vec!["pokeball", "potion"]);
        assert_eq!(out[0].area, out[1].area);
        assert_eq!(out[2].items.len(), 1);
        assert_eq!(out[2].area, "violet");
    }

    #[test]
    fn priced_tm_entries() {
        let out = marts("Goldenrod5FTMMart:\n\tdbw TM_ICE_PUNCH, 3000\n\tdb -1");
        assert_eq!(out[0].area_name, "Goldenrod 5F TM Shop");
        assert_eq!(out[0].items[0].item, "tmicepunch");
        assert_eq!(out[0].items[0].price, Some(3000));
        assert_eq!(out[0].items[0].method, AcquisitionMethod::Purchase);
    }

    #[test]
    fn unrelated_label_closes_the_list() {
        let out = marts("AzaleaMart:\n\tdb CHARCOAL\nSomethingElse:\n\tdb POTION");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].items.len(), 1);
    }

    #[test]
    fn new_mart_after_items_starts_fresh() {
        let out = marts("OlivineMart:\n\tdb POTION\nEcruteakMart:\n\tdb REPEL");
        assert_eq!(out[0].items.len(), 1);
        assert_eq!(out[1].items[0].item, "repel");
    }
}
