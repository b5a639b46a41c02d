//! Cross-references between record families.
//!
//! Everything here runs after forward extraction has finished, over
//! complete tables: egg moves spread across evolution families, evolution
//! chains and families, move references, TM/HM items and the reverse
//! indexes from items and locations to what points at them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use polished_dex_core::{
    AcquisitionMethod, Diagnostic, DiagnosticKind, Diagnostics, EvolutionChain, EvolutionFamily,
    FormRef, ItemAttributes, ItemData, ItemLocation, ItemRecord, LocationItem, LocationRecord,
    MapEvent, MoveRecord, PLAIN_FORM, StaticEncounter, Variant, VariantMap, reduce,
    split_form_suffix,
};
use polished_dex_extract::events::MapScript;
use polished_dex_extract::evos::EvolutionGraph;
use polished_dex_extract::marts::Mart;
use polished_dex_extract::species::SpeciesTable;
use polished_dex_extract::text::NO_DESCRIPTION;

// ── Egg moves ───────────────────────────────────────────────────────────────

/// Egg moves keyed by (species id, form name).
pub type EggMoveTable = BTreeMap<(String, String), Vec<String>>;

/// Key the extracted `…EggSpeciesMoves` sections by species and form.
pub fn explicit_egg_moves(sections: Vec<(String, Vec<String>)>) -> EggMoveTable {
    let mut table = EggMoveTable::new();
    for (section, moves) in sections {
        let (species, form) = split_form_suffix(&section);
        table.insert((species.to_string(), form.to_string()), moves);
    }
    table
}

/// Species reachable from `start` following evolution edges in either
/// direction, `start` included.
fn family_of(graph: &EvolutionGraph, start: &str) -> BTreeSet<String> {
    let mut family = BTreeSet::new();
    let mut stack = vec![start.to_string()];
    while let Some(species) = stack.pop() {
        if !family.insert(species.clone()) {
            continue;
        }
        for edge in graph.edges() {
            if edge.from.name == species && !family.contains(&edge.to.name) {
                stack.push(edge.to.name.clone());
            } else if edge.to.name == species && !family.contains(&edge.from.name) {
                stack.push(edge.from.name.clone());
            }
        }
    }
    family
}

/// Spread explicit egg-move lists over evolution families.
///
/// Every family member with the same form tag and no list of its own gets
/// a copy of the first explicit list found in its family, in national-index
/// order. Afterwards, non-plain forms still without moves take their plain
/// form's list.
pub fn propagate_egg_moves(table: &SpeciesTable, graph: &EvolutionGraph, egg_moves: &mut EggMoveTable) {
    let dex_order: HashMap<&str, usize> = table
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();
    let mut explicit: Vec<((String, String), Vec<String>)> = egg_moves
        .iter()
        .filter(|(_, moves)| !moves.is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    // Unknown species sort last.
    explicit.sort_by_key(|((species, _), _)| {
        dex_order.get(species.as_str()).copied().unwrap_or(usize::MAX)
    });

    for ((species, form), moves) in explicit {
        for member in family_of(graph, &species) {
            let has_form = form == PLAIN_FORM
                || table
                    .get(&member)
                    .is_some_and(|s| s.forms.contains(&form));
            if !has_form {
                continue;
            }
            let slot = egg_moves.entry((member, form.clone())).or_default();
            if slot.is_empty() {
                *slot = moves.clone();
            }
        }
    }

    for species in table.iter() {
        let plain_key = (species.id.clone(), PLAIN_FORM.to_string());
        let Some(plain) = egg_moves.get(&plain_key).filter(|m| !m.is_empty()).cloned() else {
            continue;
        };
        for form in species.forms.iter().filter(|f| f.name != PLAIN_FORM) {
            let slot = egg_moves
                .entry((species.id.clone(), form.name.clone()))
                .or_default();
            if slot.is_empty() {
                *slot = plain.clone();
            }
        }
    }
}

// ── Evolution chains and families ───────────────────────────────────────────

/// Every root-to-leaf path of the graph. Roots are the sources of edges
/// whose species is never an evolution target.
pub fn evolution_chains(graph: &EvolutionGraph) -> Vec<EvolutionChain> {
    let mut roots: Vec<&FormRef> = Vec::new();
    for edge in graph.edges() {
        if !graph.is_target(&edge.from.name) && !roots.contains(&&edge.from) {
            roots.push(&edge.from);
        }
    }

    let mut chains = Vec::new();
    for root in roots {
        let mut path = Vec::new();
        walk_chains(graph, root, &mut path, &mut chains);
    }
    chains
}

fn walk_chains(
    graph: &EvolutionGraph,
    from: &FormRef,
    path: &mut EvolutionChain,
    chains: &mut Vec<EvolutionChain>,
) {
    let next: Vec<_> = graph
        .edges()
        .iter()
        .filter(|e| e.from == *from)
        .filter(|e| !path.iter().any(|p| p.from == e.to))
        .collect();

    if next.is_empty() {
        if !path.is_empty() {
            chains.push(path.clone());
        }
        return;
    }
    for edge in next {
        path.push(edge.clone());
        walk_chains(graph, &edge.to, path, chains);
        path.pop();
    }
}

/// Chains indexed by every species that takes part in them.
pub fn chains_by_species(chains: &[EvolutionChain]) -> BTreeMap<String, Vec<EvolutionChain>> {
    let mut out: BTreeMap<String, Vec<EvolutionChain>> = BTreeMap::new();
    for chain in chains {
        let mut members: Vec<&str> = Vec::new();
        for edge in chain {
            for name in [edge.from.name.as_str(), edge.to.name.as_str()] {
                if !members.contains(&name) {
                    members.push(name);
                }
            }
        }
        for member in members {
            out.entry(member.to_string()).or_default().push(chain.clone());
        }
    }
    out
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

fn intern<'a>(name: &'a str, index: &mut HashMap<&'a str, usize>, names: &mut Vec<&'a str>) -> usize {
    *index.entry(name).or_insert_with(|| {
        names.push(name);
        names.len() - 1
    })
}

/// Connected components of the evolution graphs of both variants.
///
/// Members are ordered by `dex_order` (species missing from it sort last,
/// alphabetically) and the first member names the family. Species that
/// never evolve form no family.
pub fn evolution_families(graphs: &VariantMap<EvolutionGraph>, dex_order: &[String]) -> Vec<EvolutionFamily> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for (_, graph) in graphs.iter() {
        for edge in graph.edges() {
            let a = intern(&edge.from.name, &mut index, &mut names);
            let b = intern(&edge.to.name, &mut index, &mut names);
            edges.push((a, b));
        }
    }

    let mut set = DisjointSet::new(names.len());
    for (a, b) in edges {
        set.union(a, b);
    }

    let mut groups: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for i in 0..names.len() {
        let root = set.find(i);
        groups.entry(root).or_default().push(names[i]);
    }

    let position: HashMap<&str, usize> = dex_order
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let sort_key = |s: &&str| (position.get(s).copied().unwrap_or(usize::MAX), s.to_string());

    let mut families: Vec<EvolutionFamily> = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|mut members| {
            members.sort_by_key(sort_key);
            EvolutionFamily {
                id: members[0].to_string(),
                related_pokemon: members.into_iter().map(str::to_string).collect(),
            }
        })
        .collect();
    families.sort_by_key(|f| sort_key(&f.id.as_str()));
    families
}

// ── Move references ─────────────────────────────────────────────────────────

/// Report moveset entries of every form that name no known move. The
/// entries stay in place.
pub fn check_move_references(
    table: &SpeciesTable,
    moves: &BTreeMap<String, MoveRecord>,
    diagnostics: &mut Diagnostics,
) {
    if moves.is_empty() {
        return;
    }
    for species in table.iter() {
        let mut missing: BTreeSet<(&str, &str)> = BTreeSet::new();
        for form in species.forms.iter() {
            let set = &form.movesets;
            let level_up = set.level_up.iter().map(|m| ("level-up", m.name.as_str()));
            let tm = set.tm.iter().map(|m| ("tm", m.as_str()));
            let egg = set.egg_moves.iter().map(|m| ("egg", m.as_str()));
            for (list, name) in level_up.chain(tm).chain(egg) {
                if !moves.contains_key(name) {
                    missing.insert((list, name));
                }
            }
        }
        for (list, name) in missing {
            diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                &species.id,
                format!("unknown {list} move '{name}'"),
            );
        }
    }
}

// ── TM/HM items ─────────────────────────────────────────────────────────────

/// Find the move a TM/HM item id refers to: either by its number
/// (`tm01`) or by the move it carries (`tmdynamicpunch`).
pub fn tm_move<'a>(item_id: &str, moves: &'a BTreeMap<String, MoveRecord>) -> Option<&'a MoveRecord> {
    let rest = item_id
        .strip_prefix("tm")
        .or_else(|| item_id.strip_prefix("hm"))?;
    if let Some(record) = moves.get(rest).filter(|m| m.tm.is_some()) {
        return Some(record);
    }
    moves
        .values()
        .find(|m| m.tm.as_ref().is_some_and(|tm| tm.number == item_id))
}

/// Item data for a TM/HM that appears in scripts or marts but not in the
/// item tables.
pub fn synthesize_tm_item(record: &MoveRecord) -> Option<ItemData> {
    let tm = record.tm.as_ref()?;
    let description = if record.description.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        record.description.clone()
    };
    Some(ItemData {
        name: format!("{} {}", tm.number.to_uppercase(), record.name),
        description,
        attributes: ItemAttributes {
            category: Some("tmhm".to_string()),
            ..Default::default()
        },
        key_item: tm.number.starts_with("hm"),
        teaches: Some(record.id.clone()),
        locations: Vec::new(),
    })
}

// ── Item locations ──────────────────────────────────────────────────────────

/// The location a mart belongs to: its label names the map (`VioletMart`),
/// possibly with a floor or stock number (`MahoganyMart2`). Marts that
/// match no map keep their own area id.
pub fn mart_location(mart: &Mart, locations: &BTreeMap<String, LocationRecord>) -> Option<String> {
    let label = reduce(&mart.label);
    if locations.contains_key(&label) {
        return Some(label);
    }
    let trimmed = label.trim_end_matches(|c: char| c.is_ascii_digit());
    locations.contains_key(trimmed).then(|| trimmed.to_string())
}

pub(crate) fn push_unique(list: &mut Vec<ItemLocation>, entry: ItemLocation) {
    if !list.contains(&entry) {
        list.push(entry);
    }
}

/// Reverse index from item id to where it can be obtained, over every map
/// script item and every mart list of one variant.
pub fn item_locations(
    scripts: &BTreeMap<String, MapScript>,
    marts: &[Mart],
    locations: &BTreeMap<String, LocationRecord>,
) -> BTreeMap<String, Vec<ItemLocation>> {
    let mut index: BTreeMap<String, Vec<ItemLocation>> = BTreeMap::new();

    for (location, script) in scripts {
        for item in &script.items {
            push_unique(
                index.entry(item.item.clone()).or_default(),
                ItemLocation {
                    area: location.clone(),
                    method: item.method,
                    price: item.price,
                },
            );
        }
        for event in &script.events {
            let Some(item) = &event.item else {
                continue;
            };
            push_unique(
                index.entry(item.clone()).or_default(),
                ItemLocation {
                    area: location.clone(),
                    method: AcquisitionMethod::Gift,
                    price: None,
                },
            );
        }
    }

    for mart in marts {
        let area = mart_location(mart, locations).unwrap_or_else(|| mart.area.clone());
        for item in &mart.items {
            push_unique(
                index.entry(item.item.clone()).or_default(),
                ItemLocation {
                    area: area.clone(),
                    method: AcquisitionMethod::Purchase,
                    price: item.price,
                },
            );
        }
    }
    index
}

/// Attach one variant's reverse index to the item records. Ids with no
/// item entry in this variant borrow the other variant's entry, or become
/// a synthesized TM/HM item; anything else is a cross-reference miss.
pub fn attach_item_locations(
    items: &mut BTreeMap<String, ItemRecord>,
    variant: Variant,
    index: BTreeMap<String, Vec<ItemLocation>>,
    moves: &BTreeMap<String, MoveRecord>,
    diagnostics: &mut Diagnostics,
) {
    for (id, found) in index {
        let borrowed = items
            .get(&id)
            .and_then(|r| r.versions.get_or_other(variant))
            .map(|d| ItemData {
                locations: Vec::new(),
                ..d.clone()
            });
        let data = match borrowed.or_else(|| tm_move(&id, moves).and_then(synthesize_tm_item)) {
            Some(data) => data,
            None => {
                diagnostics.record(
                    DiagnosticKind::CrossReferenceMiss,
                    &id,
                    format!(
                        "item obtainable at {} but defined nowhere",
                        found.first().map_or("", |l| l.area.as_str())
                    ),
                );
                continue;
            }
        };

        let record = items.entry(id.clone()).or_insert_with(|| ItemRecord {
            id: id.clone(),
            versions: VariantMap::new(),
        });
        let slot = record.versions.slot_mut(variant).get_or_insert(data);
        for location in found {
            push_unique(&mut slot.locations, location);
        }
    }
}

// ── Location reverse indexes ────────────────────────────────────────────────

/// What points at each location, per variant. Built once after every
/// forward extractor has run and only read afterwards.
#[derive(Debug, Default)]
pub struct LocationIndex {
    trainers: BTreeMap<String, VariantMap<Vec<String>>>,
    events: BTreeMap<String, VariantMap<Vec<MapEvent>>>,
    items: BTreeMap<String, VariantMap<Vec<LocationItem>>>,
    statics: BTreeMap<String, Vec<String>>,
}

impl LocationIndex {
    pub fn build(
        scripts: &VariantMap<BTreeMap<String, MapScript>>,
        marts: &VariantMap<Vec<Mart>>,
        trainer_constants: &BTreeMap<String, String>,
        statics: &[StaticEncounter],
        locations: &BTreeMap<String, LocationRecord>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut index = Self::default();

        for (variant, scripts) in scripts.iter() {
            for (location, script) in scripts {
                for constant in &script.trainers {
                    match trainer_constants.get(constant) {
                        Some(stem) => {
                            let list = index.trainers.entry(location.clone()).or_default().entry(variant);
                            if !list.contains(stem) {
                                list.push(stem.clone());
                            }
                        }
                        None => diagnostics.push(
                            Diagnostic::new(
                                DiagnosticKind::CrossReferenceMiss,
                                location,
                                format!("trainer '{constant}' has no party definition"),
                            )
                            .with_variant(variant),
                        ),
                    }
                }
                if !script.events.is_empty() {
                    index
                        .events
                        .entry(location.clone())
                        .or_default()
                        .entry(variant)
                        .extend(script.events.iter().cloned());
                }
                if !script.items.is_empty() {
                    index
                        .items
                        .entry(location.clone())
                        .or_default()
                        .entry(variant)
                        .extend(script.items.iter().cloned());
                }
            }
        }

        for (variant, marts) in marts.iter() {
            for mart in marts {
                let Some(location) = mart_location(mart, locations) else {
                    continue;
                };
                let list = index.items.entry(location).or_default().entry(variant);
                for item in &mart.items {
                    if !list.contains(item) {
                        list.push(item.clone());
                    }
                }
            }
        }

        for encounter in statics {
            let places: Vec<&String> = if encounter.valid_maps.is_empty() {
                vec![&encounter.location]
            } else {
                encounter.valid_maps.iter().collect()
            };
            for place in places {
                let list = index.statics.entry(place.clone()).or_default();
                if !list.contains(&encounter.id) {
                    list.push(encounter.id.clone());
                }
            }
        }

        index
    }

    pub fn trainers_at(&self, location: &str, variant: Variant) -> &[String] {
        self.trainers
            .get(location)
            .and_then(|m| m.get(variant))
            .map_or(&[], Vec::as_slice)
    }

    pub fn statics_at(&self, location: &str) -> &[String] {
        self.statics.get(location).map_or(&[], Vec::as_slice)
    }

    /// Write the indexed relations into the location records. Relations
    /// that point at unknown locations are reported.
    pub fn apply(&self, locations: &mut BTreeMap<String, LocationRecord>, diagnostics: &mut Diagnostics) {
        for (id, record) in locations.iter_mut() {
            for &variant in Variant::all() {
                let trainers = self.trainers_at(id, variant);
                let events = self.events.get(id).and_then(|m| m.get(variant));
                let items = self.items.get(id).and_then(|m| m.get(variant));
                let statics = self.statics_at(id);
                let has_any = !trainers.is_empty() || events.is_some() || items.is_some();
                if !has_any && record.versions.get(variant).is_none() {
                    continue;
                }
                let data = record.versions.entry(variant);
                data.trainers = trainers.to_vec();
                data.events = events.cloned().unwrap_or_default();
                data.items = items.cloned().unwrap_or_default();
                data.static_encounters = statics.to_vec();
            }
        }

        let known = |id: &String| locations.contains_key(id);
        let orphaned: BTreeSet<&String> = self
            .trainers
            .keys()
            .chain(self.events.keys())
            .chain(self.items.keys())
            .filter(|id| !known(id))
            .collect();
        for id in orphaned {
            diagnostics.record(
                DiagnosticKind::CrossReferenceMiss,
                id.as_str(),
                "map script for a map with no attributes entry",
            );
        }
        for (id, encounters) in &self.statics {
            if !known(id) && id != "roaming" {
                diagnostics.record(
                    DiagnosticKind::CrossReferenceMiss,
                    id.as_str(),
                    format!("static encounters {} on an unknown map", encounters.join(", ")),
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
