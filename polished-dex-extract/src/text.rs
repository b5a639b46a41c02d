//! Description text blocks.
//!
//! Move, ability and item descriptions share one layout: one or more
//! consecutive labels ending in a fixed suffix, followed by `text`/`next`
//! (or quoted `db`) lines up to an `@` terminator or `done`. Every label of
//! a group receives the same text.

use std::collections::BTreeMap;

use polished_dex_core::reduce;

use crate::cursor::LineCursor;
use crate::line::Line;

/// Placeholder for entities whose description is missing.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Word endings that mark a hyphen at a line join as a soft break.
const SOFT_BREAK_TAILS: &[&str] = &[
    "able", "al", "ed", "er", "ers", "es", "est", "ful", "ible", "ing", "ive", "less", "ly",
    "ment", "mon", "ness", "ous", "sion", "tion",
];

/// Join-aware cleanup of description text. A hyphen at a line join is
/// dropped when the continuation is a word ending (`catch- ing` →
/// `catching`, `Poké- mon` → `Pokémon`); otherwise it stays and the words
/// close up (`critical- hit` → `critical-hit`). Runs of whitespace collapse.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let tail: String = chars.clone().take_while(|n| n.is_alphabetic()).collect();
            if !SOFT_BREAK_TAILS.contains(&tail.as_str()) {
                out.push(c);
            }
            continue;
        }
        out.push(c);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect description blocks whose labels end in `suffix`, keyed by the
/// reduced label stem.
pub fn collect_descriptions<'a>(lines: &[Line<'a>], suffix: &str) -> BTreeMap<String, String> {
    let stem_of = |line: &Line<'a>| line.label().and_then(|name| name.strip_suffix(suffix));

    let mut cursor = LineCursor::new(lines);
    let mut out = BTreeMap::new();

    while let Some(line) = cursor.advance() {
        let Some(first) = stem_of(line) else {
            continue;
        };
        let mut group = vec![first];
        while let Some(stem) = cursor.peek().and_then(stem_of) {
            group.push(stem);
            cursor.advance();
        }

        let mut parts = Vec::new();
        while let Some(next) = cursor.peek() {
            if next.label().is_some() {
                break;
            }
            cursor.advance();
            if next.is_directive("done") {
                break;
            }
            if let Some(fragment) = next.directive().and_then(|d| d.text_fragment()) {
                if !fragment.body.is_empty() {
                    parts.push(fragment.body);
                }
                if fragment.terminated {
                    break;
                }
            }
        }

        if parts.is_empty() {
            continue;
        }
        let text = clean_text(&parts.join(" "));
        for stem in group {
            out.insert(reduce(stem), text.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::classify_all;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(|l| l.trim().to_string()).collect()
    }

    #[test]
    fn grouped_labels_share_text() {
        let src = lines(
            "\
PoundDescription:
ScratchDescription:
\ttext \"A physical\"
\tnext \"attack.@\"
KarateChopDescription:
\ttext \"High critical-\"
\tnext \"hit ratio.@\"",
        );
        let classified = classify_all(&src);
        let d = collect_descriptions(&classified, "Description");
        assert_eq!(d["pound"], "A physical attack.");
        assert_eq!(d["scratch"], "A physical attack.");
        assert_eq!(d["karatechop"], "High critical-hit ratio.");
    }

    #[test]
    fn done_ends_block() {
        let src = lines("StenchDescription:\ntext \"May cause\"\nnext \"flinching.\"\ndone\ntext \"ignored\"");
        let classified = classify_all(&src);
        let d = collect_descriptions(&classified, "Description");
        assert_eq!(d["stench"], "May cause flinching.");
    }

    #[test]
    fn item_descriptions_use_db_strings() {
        let src = lines("PokéBallDesc:\ndb \"An item for\"\nnext \"catching Pokémon.@\"");
        let classified = classify_all(&src);
        let d = collect_descriptions(&classified, "Desc");
        assert_eq!(d["pokeball"], "An item for catching Pokémon.");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a   b- c "), "a b-c");
    }

    #[test]
    fn soft_break_hyphens_join_words() {
        assert_eq!(clean_text("Makes catch- ing easier."), "Makes catching easier.");
        assert_eq!(clean_text("Poké- mon"), "Pokémon");
        assert_eq!(clean_text("High critical- hit ratio."), "High critical-hit ratio.");
        assert_eq!(clean_text("Boosts X- Scissor."), "Boosts X-Scissor.");
    }
}
