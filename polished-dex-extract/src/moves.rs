//! Move names, battle stats and the TM/HM table.

use std::collections::BTreeMap;

use polished_dex_core::{DiagnosticKind, Diagnostics, Field, MoveStats, TmInfo, reduce};

use crate::line::Line;

/// Display names from `li "Name"` lines, in table order.
pub fn extract_move_names(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.directive_named("li"))
        .filter_map(|d| d.quoted())
        .map(str::to_string)
        .collect()
}

/// Battle stats from `move NAME, EFFECT, POWER, TYPE, ACC, PP, CHANCE,
/// CATEGORY` lines, keyed by move identity. Descriptions are left empty.
pub fn extract_move_stats(
    source_name: &str,
    lines: &[Line<'_>],
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, MoveStats> {
    let mut out = BTreeMap::new();

    for d in lines.iter().filter_map(|l| l.directive_named("move")) {
        let args = d.args();
        if args.len() < 8 {
            diagnostics.record(
                DiagnosticKind::MalformedField,
                source_name,
                format!("move {}: expected 8 fields", d.body),
            );
            continue;
        }
        let id = reduce(args[0]);

        let power = match Field::parse_with(args[2], |s| s.parse::<u16>()) {
            Field::Found(p) => p,
            _ => {
                diagnostics.record(
                    DiagnosticKind::MalformedField,
                    source_name,
                    format!("{id}: power '{}'", args[2]),
                );
                0
            }
        };
        let accuracy = match args[4] {
            "-1" => 100,
            raw => raw.parse().unwrap_or(100),
        };

        out.insert(
            id,
            MoveStats {
                power,
                move_type: reduce(args[3]),
                accuracy,
                pp: args[5].parse().unwrap_or(0),
                effect_chance: args[6].parse().unwrap_or(0),
                category: reduce(args[7]),
                effect: reduce(args[1].strip_prefix("EFFECT_").unwrap_or(args[1])),
                description: None,
            },
        );
    }

    out
}

/// `db MOVE ; TM01 (Location)` lines, keyed by move identity.
pub fn extract_tmhm(lines: &[Line<'_>]) -> BTreeMap<String, TmInfo> {
    let mut out = BTreeMap::new();
    for d in lines.iter().filter_map(|l| l.directive_named("db")) {
        let Some(comment) = d.comment else {
            continue;
        };
        let Some(number) = parse_tm_number(comment) else {
            continue;
        };
        let location = comment
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(inner, _)| reduce(inner));
        out.insert(reduce(d.body), TmInfo { number, location });
    }
    out
}

/// First `TMnn`/`HMnn` token of a comment, zero-padded to two digits and
/// reduced (`TM1` → `tm01`).
fn parse_tm_number(comment: &str) -> Option<String> {
    for prefix in ["TM", "HM"] {
        let mut rest = comment;
        while let Some(at) = rest.find(prefix) {
            let after = &rest[at + prefix.len()..];
            let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
            if !digits.is_empty() {
                return Some(reduce(&format!("{prefix}{digits:0>2}")));
            }
            rest = after;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::classify_all;
    use crate::split::{SplitOptions, split_variants};

    fn lines(text: &str) -> Vec<String> {
        split_variants("moves.asm", text, SplitOptions::new()).polished
    }

    #[test]
    fn acrobatics_stats() {
        let src = lines("\tmove ACROBATICS, EFFECT_CONDITIONAL_BOOST, 55, FLYING, 100, 15, 0, PHYSICAL");
        let mut diags = Diagnostics::new();
        let stats = extract_move_stats("moves.asm", &classify_all(&src), &mut diags);
        let acrobatics = &stats["acrobatics"];
        assert_eq!(acrobatics.power, 55);
        assert_eq!(acrobatics.move_type, "flying");
        assert_eq!(acrobatics.accuracy, 100);
        assert_eq!(acrobatics.pp, 15);
        assert_eq!(acrobatics.category, "physical");
        assert_eq!(acrobatics.effect, "conditionalboost");
        assert!(diags.is_empty());
    }

    #[test]
    fn never_miss_accuracy_and_bad_power() {
        let src = lines("move SWIFT, EFFECT_ALWAYS_HIT, ??, NORMAL, -1, 20, 0, SPECIAL");
        let mut diags = Diagnostics::new();
        let stats = extract_move_stats("moves.asm", &classify_all(&src), &mut diags);
        assert_eq!(stats["swift"].accuracy, 100);
        assert_eq!(stats["swift"].power, 0);
        assert_eq!(diags.count(DiagnosticKind::MalformedField), 1);
    }

    #[test]
    fn names_in_table_order() {
        let src = lines("MoveNames::\n\tli \"Pound\"\n\tli \"Karate Chop\"");
        assert_eq!(extract_move_names(&classify_all(&src)), vec!["Pound", "Karate Chop"]);
    }

    #[test]
    fn tm_numbers_and_locations() {
        let src = lines("\tdb DYNAMICPUNCH ; TM01 (Cianwood City)\n\tdb CUT ; HM1\n\tdb 0 ; end");
        let tm = extract_tmhm(&classify_all(&src));
        assert_eq!(tm["dynamicpunch"].number, "tm01");
        assert_eq!(tm["dynamicpunch"].location.as_deref(), Some("cianwoodcity"));
        assert_eq!(tm["cut"].number, "hm01");
        assert_eq!(tm["cut"].location, None);
        assert_eq!(tm.len(), 2);
    }
}
