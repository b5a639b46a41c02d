/// Outcome of pulling one field out of a source block.
///
/// Extractors locate lines by prefix or suffix rather than position, so a
/// field can be absent from a block or present but unreadable. Keeping the
/// two apart lets the caller decide what gets reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Found(T),
    Missing,
    /// The line was present but its value could not be parsed; carries the
    /// raw text.
    Malformed(String),
}

impl<T> Field<T> {
    /// Parse `raw` with `f`, mapping failure to `Malformed(raw)`.
    pub fn parse_with<E>(raw: &str, f: impl FnOnce(&str) -> Result<T, E>) -> Self {
        match f(raw) {
            Ok(v) => Self::Found(v),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }

    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Self::Found)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Found(v) => Field::Found(v),
            Self::Missing => Field::Missing,
            Self::Malformed(raw) => Field::Malformed(raw.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Found(v) => Field::Found(f(v)),
            Self::Missing => Field::Missing,
            Self::Malformed(raw) => Field::Malformed(raw),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Short label for reports: `found`, `missing` or `malformed`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Missing => "missing",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_keeps_raw_text_on_failure() {
        let f: Field<u8> = Field::parse_with("12x", |s| s.parse());
        assert_eq!(f, Field::Malformed("12x".into()));
        assert_eq!(f.status(), "malformed");

        let ok: Field<u8> = Field::parse_with("12", |s| s.parse());
        assert_eq!(ok.found(), Some(12));
    }

    #[test]
    fn map_preserves_missing() {
        let f: Field<u8> = Field::Missing;
        assert_eq!(f.map(|v| v * 2), Field::Missing);
    }
}
