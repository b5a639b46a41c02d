use serde::{Deserialize, Serialize};

/// The two mutually exclusive balance configurations interleaved in the
/// source tree.
///
/// `Polished` is the rebalanced game and the primary stream; `Faithful`
/// stays closer to the original Crystal data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Polished,
    Faithful,
}

/// Both variants, primary first.
const ALL_VARIANTS: &[Variant] = &[Variant::Polished, Variant::Faithful];

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polished => "polished",
            Self::Faithful => "faithful",
        }
    }

    /// The opposite variant.
    pub fn other(&self) -> Self {
        match self {
            Self::Polished => Self::Faithful,
            Self::Faithful => Self::Polished,
        }
    }

    pub fn all() -> &'static [Variant] {
        ALL_VARIANTS
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed into a `Variant`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown variant: '{0}'")]
pub struct VariantParseError(pub String);

impl std::str::FromStr for Variant {
    type Err = VariantParseError;

    /// Case-insensitive; accepts `p`/`f` shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polished" | "p" => Ok(Self::Polished),
            "faithful" | "f" => Ok(Self::Faithful),
            _ => Err(VariantParseError(s.to_string())),
        }
    }
}

/// A value held separately for each variant.
///
/// Either side may be absent (an item that only exists in one balance
/// configuration). Absent sides are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantMap<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polished: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faithful: Option<T>,
}

impl<T> Default for VariantMap<T> {
    fn default() -> Self {
        Self {
            polished: None,
            faithful: None,
        }
    }
}

impl<T> VariantMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map with a value for both variants.
    pub fn from_fn(mut f: impl FnMut(Variant) -> T) -> Self {
        Self {
            polished: Some(f(Variant::Polished)),
            faithful: Some(f(Variant::Faithful)),
        }
    }

    pub fn get(&self, variant: Variant) -> Option<&T> {
        match variant {
            Variant::Polished => self.polished.as_ref(),
            Variant::Faithful => self.faithful.as_ref(),
        }
    }

    pub fn get_mut(&mut self, variant: Variant) -> Option<&mut T> {
        match variant {
            Variant::Polished => self.polished.as_mut(),
            Variant::Faithful => self.faithful.as_mut(),
        }
    }

    pub fn slot_mut(&mut self, variant: Variant) -> &mut Option<T> {
        match variant {
            Variant::Polished => &mut self.polished,
            Variant::Faithful => &mut self.faithful,
        }
    }

    pub fn insert(&mut self, variant: Variant, value: T) -> Option<T> {
        self.slot_mut(variant).replace(value)
    }

    /// Value for `variant`, falling back to the other variant.
    pub fn get_or_other(&self, variant: Variant) -> Option<&T> {
        self.get(variant).or_else(|| self.get(variant.other()))
    }

    /// Iterate over present values, primary variant first.
    pub fn iter(&self) -> impl Iterator<Item = (Variant, &T)> {
        Variant::all()
            .iter()
            .filter_map(move |&v| self.get(v).map(|t| (v, t)))
    }

    pub fn is_empty(&self) -> bool {
        self.polished.is_none() && self.faithful.is_none()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Variant, &T) -> U) -> VariantMap<U> {
        VariantMap {
            polished: self.polished.as_ref().map(|t| f(Variant::Polished, t)),
            faithful: self.faithful.as_ref().map(|t| f(Variant::Faithful, t)),
        }
    }
}

impl<T: Default> VariantMap<T> {
    /// Mutable access to `variant`, inserting a default value if absent.
    pub fn entry(&mut self, variant: Variant) -> &mut T {
        self.slot_mut(variant).get_or_insert_with(T::default)
    }
}
