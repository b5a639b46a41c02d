//! Data model for extracted and merged records.
//!
//! Per-variant records (`Species`, `Trainer`, ...) are what the extractors
//! build. `*Record` types are the merged, variant-keyed shapes written to
//! disk. All serialized field names are camelCase.

use serde::{Deserialize, Serialize};

use crate::variant::VariantMap;

// ── Species ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub total: u16,
}

impl BaseStats {
    pub fn sum(&self) -> u16 {
        self.hp + self.attack + self.defense + self.speed + self.special_attack + self.special_defense
    }
}

/// One level-up entry. `name` is a move identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMove {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moveset {
    #[serde(default)]
    pub level_up: Vec<LevelMove>,
    #[serde(default)]
    pub tm: Vec<String>,
    #[serde(default)]
    pub egg_moves: Vec<String>,
}

/// A species configuration. The name is the key in [`FormMap`] and is not
/// repeated in the serialized value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(skip)]
    pub name: String,
    pub form_number: u8,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_stats: Option<BaseStats>,
    /// Title-cased, e.g. `Medium Slow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_rate: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egg_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_gender: Option<bool>,
    #[serde(default)]
    pub movesets: Moveset,
}

impl Form {
    pub fn new(name: impl Into<String>, form_number: u8) -> Self {
        Self {
            name: name.into(),
            form_number,
            ..Default::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.form_number == 1
    }

    /// True until a base-stats block has been written into this form.
    pub fn lacks_stats(&self) -> bool {
        self.has_gender.is_none() && self.base_stats.is_none()
    }

    /// Copy stat-block data (not movesets) from `other`.
    pub fn copy_stats_from(&mut self, other: &Form) {
        self.types = other.types.clone();
        self.abilities = other.abilities.clone();
        self.base_stats = other.base_stats;
        self.growth_rate = other.growth_rate.clone();
        self.catch_rate = other.catch_rate;
        self.egg_groups = other.egg_groups.clone();
        self.has_gender = other.has_gender;
    }
}

/// Forms of one species in source order, serialized as a JSON object keyed
/// by form name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormMap(Vec<Form>);

impl FormMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Form> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Form> {
        self.0.iter_mut().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert `form`, replacing any form with the same name in place.
    pub fn insert(&mut self, form: Form) {
        match self.0.iter().position(|f| f.name == form.name) {
            Some(i) => self.0[i] = form,
            None => self.0.push(form),
        }
    }

    /// Insert `form` at the front.
    pub fn prepend(&mut self, form: Form) {
        self.0.retain(|f| f.name != form.name);
        self.0.insert(0, form);
    }

    /// The form holding form-number 1, if any.
    pub fn plain(&self) -> Option<&Form> {
        self.0.iter().find(|f| f.is_plain())
    }

    pub fn plain_mut(&mut self) -> Option<&mut Form> {
        self.0.iter_mut().find(|f| f.is_plain())
    }

    pub fn plain_count(&self) -> usize {
        self.0.iter().filter(|f| f.is_plain()).count()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Form> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Form> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormMap {
    type Item = &'a Form;
    type IntoIter = std::slice::Iter<'a, Form>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Form> for FormMap {
    fn from_iter<I: IntoIterator<Item = Form>>(iter: I) -> Self {
        let mut map = FormMap::new();
        for form in iter {
            map.insert(form);
        }
        map
    }
}

impl Serialize for FormMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for form in &self.0 {
            map.serialize_entry(&form.name, form)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FormMapVisitor;

        impl<'de> serde::de::Visitor<'de> for FormMapVisitor {
            type Value = FormMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of form name to form")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut access: A) -> Result<FormMap, A::Error> {
                let mut forms = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, mut form)) = access.next_entry::<String, Form>()? {
                    form.name = name;
                    forms.push(form);
                }
                Ok(FormMap(forms))
            }
        }

        deserializer.deserialize_map(FormMapVisitor)
    }
}

/// One species as seen by a single variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: String,
    pub name: String,
    pub dex_no: u16,
    pub forms: FormMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesVersion {
    pub forms: FormMap,
}

/// Merged species file: `pokemon/<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRecord {
    pub id: String,
    pub name: String,
    pub dex_no: u16,
    pub versions: VariantMap<SpeciesVersion>,
}

// ── Evolution ───────────────────────────────────────────────────────────────

/// Trigger argument of an evolution: a level or count, or an item, move,
/// stat comparison or time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvolutionParameter {
    Number(u32),
    Named(String),
}

/// A species in a specific form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRef {
    pub name: String,
    pub form_name: String,
}

impl FormRef {
    pub fn new(name: impl Into<String>, form_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form_name: form_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionMethod {
    /// Reduced trigger name (`level`, `item`, `happiness`, ...).
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<EvolutionParameter>,
}

/// One edge of the evolution graph, also used as a link in a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub from: FormRef,
    pub to: FormRef,
    pub method: EvolutionMethod,
}

/// Root-to-leaf path through the evolution graph.
pub type EvolutionChain = Vec<Evolution>;

/// `evolution/<id>.json`: every chain the species takes part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRecord {
    pub id: String,
    pub versions: VariantMap<Vec<EvolutionChain>>,
}

/// A connected component of the evolution graph over both variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionFamily {
    pub id: String,
    pub related_pokemon: Vec<String>,
}

// ── Abilities ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityText {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub id: String,
    pub name: String,
    pub versions: VariantMap<AbilityText>,
}

// ── Moves ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveStats {
    pub power: u16,
    #[serde(rename = "type")]
    pub move_type: String,
    pub accuracy: u16,
    pub pp: u8,
    pub effect_chance: u8,
    pub category: String,
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// TM/HM reference of a move. `number` is reduced (`tm01`, `hm03`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmInfo {
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub versions: VariantMap<MoveStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm: Option<TmInfo>,
}

// ── Items ───────────────────────────────────────────────────────────────────

/// How an item is obtained at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AcquisitionMethod {
    Purchase,
    HiddenItem,
    Gift,
    Battle,
    Berry,
    Item,
}

impl AcquisitionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::HiddenItem => "hiddenItem",
            Self::Gift => "gift",
            Self::Battle => "battle",
            Self::Berry => "berry",
            Self::Item => "item",
        }
    }
}

impl std::fmt::Display for AcquisitionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item placed on a map or sold in a mart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationItem {
    pub item: String,
    pub method: AcquisitionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
}

/// Reverse-index entry on an item: where it can be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLocation {
    pub area: String,
    pub method: AcquisitionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub attributes: ItemAttributes,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub key_item: bool,
    /// Move taught, for TM/HM items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaches: Option<String>,
    #[serde(default)]
    pub locations: Vec<ItemLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub versions: VariantMap<ItemData>,
}

// ── Locations ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterMethod {
    Grass,
    Surfing,
    Fishing,
    Headbutt,
}

impl EncounterMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Surfing => "surfing",
            Self::Fishing => "fishing",
            Self::Headbutt => "headbutt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Day,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: u8,
    pub max: u8,
}

impl LevelRange {
    pub fn single(level: u8) -> Self {
        Self { min: level, max: level }
    }

    pub fn widen(&mut self, level: u8) {
        self.min = self.min.min(level);
        self.max = self.max.max(level);
    }
}

impl std::fmt::Display for LevelRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub species: String,
    pub method: EncounterMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeSlot>,
    pub level: LevelRange,
    pub rate: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Battle,
    Gift,
    Phone,
    Event,
}

/// A story flag set by a map script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEvent {
    pub id: String,
    pub kind: EventKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// What one variant knows about a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub trainers: Vec<String>,
    #[serde(default)]
    pub events: Vec<MapEvent>,
    #[serde(default)]
    pub items: Vec<LocationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_encounters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_name: Option<String>,
    pub connection_count: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_landmark: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub versions: VariantMap<LocationData>,
}

// ── Trainers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shiny: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dvs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub match_count: u32,
    pub pokemon: Vec<TeamMember>,
}

/// One `def_trainer` entry as seen by a single variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    /// Raw id field of the definition (`1`, `FALKNER1`).
    pub id: String,
    pub name: String,
    pub class: String,
    pub constant_name: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerTeams {
    pub teams: Vec<Team>,
}

/// `trainers/<class>_<id>.json`: every rematch of one trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerRecord {
    pub id: String,
    pub name: String,
    pub class: String,
    pub constant_name: String,
    pub versions: VariantMap<TrainerTeams>,
}

impl TrainerRecord {
    /// File stem under `trainers/`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.class.to_lowercase(), self.id.to_lowercase())
    }
}

// ── Static encounters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticKind {
    Static,
    Gift,
    Roaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrerequisiteKind {
    Item,
    Caught,
    Event,
}

/// Something the player must have done before an encounter is available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prerequisite {
    pub kind: PrerequisiteKind,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticEncounter {
    pub id: String,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    pub level: u8,
    pub location: String,
    pub location_name: String,
    pub kind: StaticKind,
    pub legendary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_item: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<Prerequisite>,
    /// Maps a roaming encounter can appear on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_maps: Vec<String>,
}
