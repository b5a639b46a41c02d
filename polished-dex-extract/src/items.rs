//! Regular and key items.
//!
//! `attributes.asm` lists one `item_attribute` line per item, each preceded
//! by a `; Item Name` comment that gives the identity. The name table is
//! parallel to the attribute table but carries one leading entry with no
//! attributes.

use polished_dex_core::{DiagnosticKind, Diagnostics, ItemAttributes, ItemData, reduce};

use crate::line::{Directive, Line};
use crate::text::{NO_DESCRIPTION, collect_descriptions};

/// One extracted item of a single variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    pub id: String,
    pub data: ItemData,
}

pub fn extract_items(
    source_name: &str,
    attributes: &[Line<'_>],
    names: &[Line<'_>],
    descriptions: &[Line<'_>],
    diagnostics: &mut Diagnostics,
) -> Vec<ItemEntry> {
    let descriptions = collect_descriptions(descriptions, "Desc");
    let names: Vec<&str> = names
        .iter()
        .filter_map(|l| l.directive_named("li"))
        .filter_map(|d| d.quoted())
        .skip(1)
        .collect();

    let rows = attribute_rows(attributes);
    if rows.len() != names.len() {
        log::warn!(
            "{source_name}: {} attribute rows but {} names",
            rows.len(),
            names.len()
        );
    }

    let mut out = Vec::new();
    for ((comment, directive), name) in rows.into_iter().zip(names) {
        let id = reduce(comment);
        let Some(attributes) = parse_attributes(directive) else {
            diagnostics.record(
                DiagnosticKind::MalformedField,
                source_name,
                format!("{id}: item_attribute {}", directive.body),
            );
            continue;
        };
        let description = descriptions
            .get(&id)
            .cloned()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        out.push(ItemEntry {
            id,
            data: ItemData {
                name: name.to_string(),
                description,
                attributes,
                ..Default::default()
            },
        });
    }
    out
}

/// `item_attribute` lines paired with the nearest preceding comment.
/// Lines that carry their own comment are table padding and are skipped.
fn attribute_rows<'a, 'b>(lines: &'b [Line<'a>]) -> Vec<(&'a str, &'b Directive<'a>)> {
    let mut rows = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(directive) = line.directive_named("item_attribute") else {
            continue;
        };
        if directive.comment.is_some() {
            continue;
        }
        let comment = lines[..i].iter().rev().find_map(|prev| match prev {
            Line::Comment(c) if c.len() > 1 => Some(Some(*c)),
            Line::Comment(_) | Line::Blank => None,
            _ => Some(None),
        });
        if let Some(Some(comment)) = comment {
            rows.push((comment, directive));
        }
    }
    rows
}

/// `price, effect, param, property, pocket, field menu, battle menu`.
fn parse_attributes(d: &Directive<'_>) -> Option<ItemAttributes> {
    let args = d.args();
    if args.len() < 6 {
        return None;
    }
    let non_zero = |s: &str| (s != "0").then(|| s.to_string());
    Some(ItemAttributes {
        price: args[0].parse().ok().filter(|&p: &u32| p > 0),
        effect: non_zero(args[1]),
        params: non_zero(args[2]),
        category: non_zero(args[4]),
    })
}

/// Key items: `li "Name"` table plus `<Name>Desc:` blocks.
pub fn extract_key_items(names: &[Line<'_>], descriptions: &[Line<'_>]) -> Vec<ItemEntry> {
    let descriptions = collect_descriptions(descriptions, "Desc");
    names
        .iter()
        .filter_map(|l| l.directive_named("li"))
        .filter_map(|d| d.quoted())
        .map(|name| {
            let id = reduce(name);
            let description = descriptions
                .get(&id)
                .cloned()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());
            ItemEntry {
                id,
                data: ItemData {
                    name: name.to_string(),
                    description,
                    key_item: true,
                    ..Default::default()
                },
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/items_tests.rs"]
mod tests;
