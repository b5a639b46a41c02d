//! Identity normalization.
//!
//! Every entity in the source tree is spelled several ways: as a raw
//! constant (`NIDORAN_M`), as a quoted display string (`"Nidoran♂"`), as a
//! label (`NidoranMDescription:`) and as a file stem (`nidoranm.json`).
//! [`reduce`] collapses all of them to one lowercase key. [`display_name`]
//! goes the other way for terse map labels.

/// Regional form suffixes recognised on section headers such as
/// `evos_attacks RaticateAlolan`.
pub const FORM_SUFFIXES: &[&str] = &["plain", "alolan", "galarian", "hisuian", "paldean"];

/// Name of the default form every species must carry.
pub const PLAIN_FORM: &str = "plain";

/// Canonical cross-reference key for any textual identifier.
///
/// Lowercases, drops spaces, underscores, hyphens, apostrophes, periods and
/// angle brackets, and folds `♂`/`♀`/`é` to `m`/`f`/`e`. The mapping is
/// per-character, so it is idempotent and commutes with concatenation.
///
/// ```
/// use polished_dex_core::identity::reduce;
/// assert_eq!(reduce("Mr. Mime"), "mrmime");
/// assert_eq!(reduce("NIDORAN_M"), "nidoranm");
/// assert_eq!(reduce("Nidoran♂"), "nidoranm");
/// assert_eq!(reduce("Poké Ball"), "pokeball");
/// ```
pub fn reduce(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        for lower in c.to_lowercase() {
            match lower {
                ' ' | '<' | '>' | '_' | '-' | '\'' | '.' => {}
                '♂' => out.push('m'),
                '♀' => out.push('f'),
                'é' => out.push('e'),
                other => out.push(other),
            }
        }
    }
    out
}

/// Human-readable label for a terse map or landmark constant.
///
/// The source naming is irregular, so a fixed sequence of boundary rules is
/// applied rather than one universal split:
///
/// ```
/// use polished_dex_core::identity::display_name;
/// assert_eq!(display_name("Route32"), "Route 32");
/// assert_eq!(display_name("RadioTower5F"), "Radio Tower 5F");
/// assert_eq!(display_name("MtMortarB1F"), "Mt Mortar B1F");
/// assert_eq!(display_name("Route34IlexForestGate"), "Route 34 Ilex Forest Gate");
/// assert_eq!(display_name("NEW_BARK_TOWN"), "NEW BARK TOWN");
/// ```
pub fn display_name(s: &str) -> String {
    let s = split_route_number(s);
    let s = split_gate_suffix(&s);
    let s = split_floor_direction(&s);
    let s = split_floor_suffix(&s);
    let s = split_digit_letter(&s);
    let s = split_camel_case(&s);
    s.replace('_', " ")
}

/// `SOME_CONSTANT` → `Some Constant`.
pub fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut word: String = first.to_uppercase().collect();
                    word.push_str(&chars.as_str().to_lowercase());
                    word
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first character (`alolan` → `Alolan`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove a trailing rematch number from a constant (`LANCE_2` → `LANCE`).
///
/// With `underscore_only` set, only one `_?\d+` run is removed; otherwise any
/// remaining trailing digits are removed as well.
pub fn strip_numeric_suffix(s: &str, underscore_only: bool) -> String {
    let once = strip_one_numeric_run(s);
    if underscore_only {
        once.to_string()
    } else {
        once.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
    }
}

fn strip_one_numeric_run(s: &str) -> &str {
    let without_digits = s.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == s.len() {
        return s;
    }
    without_digits.strip_suffix('_').unwrap_or(without_digits)
}

/// Split a reduced key into (species, form) using [`FORM_SUFFIXES`].
///
/// Keys without a recognised suffix belong to the plain form.
///
/// ```
/// use polished_dex_core::identity::split_form_suffix;
/// assert_eq!(split_form_suffix("raticatealolan"), ("raticate", "alolan"));
/// assert_eq!(split_form_suffix("bulbasaur"), ("bulbasaur", "plain"));
/// ```
pub fn split_form_suffix(key: &str) -> (&str, &str) {
    for suffix in FORM_SUFFIXES {
        if let Some(base) = key.strip_suffix(suffix)
            && !base.is_empty()
        {
            return (base, suffix);
        }
    }
    (key, PLAIN_FORM)
}

/// Reduced key for a species section header naming a specific form
/// (`raticate` + `alolan` → `raticatealolan`).
pub fn form_key(species: &str, form: &str) -> String {
    reduce(&format!("{}{}", species, capitalize(form)))
}

// ---------------------------------------------------------------------------
// display_name boundary rules
// ---------------------------------------------------------------------------

fn split_route_number(s: &str) -> String {
    match s.strip_prefix("Route") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => format!("Route {rest}"),
        _ => s.to_string(),
    }
}

fn split_gate_suffix(s: &str) -> String {
    if let Some(head) = s.strip_suffix("Gate")
        && head.ends_with(|c: char| c.is_ascii_alphabetic())
    {
        return format!("{head} Gate");
    }
    s.to_string()
}

fn split_floor_direction(s: &str) -> String {
    for dir in ["North", "South"] {
        if let Some(head) = s.strip_suffix(dir)
            && head.ends_with('F')
        {
            return format!("{head} {dir}");
        }
    }
    s.to_string()
}

/// Letter followed by a trailing `B?\d+F` floor marker.
fn split_floor_suffix(s: &str) -> String {
    let Some(head) = s.strip_suffix('F') else {
        return s.to_string();
    };
    let without_digits = head.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == head.len() {
        return s.to_string();
    }
    let floor_start = match without_digits.strip_suffix('B') {
        Some(before_b) if before_b.ends_with(|c: char| c.is_ascii_alphabetic()) => before_b.len(),
        _ => without_digits.len(),
    };
    let (prefix, floor) = s.split_at(floor_start);
    if prefix.ends_with(|c: char| c.is_ascii_alphabetic()) {
        format!("{prefix} {floor}")
    } else {
        s.to_string()
    }
}

/// Digit followed by a letter, unless that letter is a standalone floor `F`.
fn split_digit_letter(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        if c.is_ascii_digit()
            && let Some(&next) = chars.get(i + 1)
            && next.is_ascii_alphabetic()
        {
            let floor_marker =
                next == 'F' && !chars.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic());
            if !floor_marker {
                out.push(' ');
                out.push(next);
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    out
}

fn split_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if let Some(p) = prev
            && p.is_ascii_lowercase()
            && c.is_ascii_uppercase()
        {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
