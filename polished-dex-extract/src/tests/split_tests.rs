use super::*;

fn split(text: &str) -> SplitSource {
    split_variants("test.asm", text, SplitOptions::new())
}

#[test]
fn common_lines_reach_both_streams() {
    let s = split("a\nb\n");
    assert_eq!(s.polished, vec!["a", "b"]);
    assert_eq!(s.faithful, vec!["a", "b"]);
    assert!(s.diagnostics.is_empty());
}

#[test]
fn faithful_block_with_else() {
    let text = "\
db 1
if DEF(FAITHFUL)
db FAITHFUL_ONLY
else
db POLISHED_ONLY
db POLISHED_TOO
endc
db 2";
    let s = split(text);
    assert_eq!(s.faithful, vec!["db 1", "db FAITHFUL_ONLY", "db 2"]);
    assert_eq!(s.polished, vec!["db 1", "db POLISHED_ONLY", "db POLISHED_TOO", "db 2"]);
}

#[test]
fn negated_block_is_mirrored() {
    let text = "if !DEF(FAITHFUL)\nnew\nelse\nold\nendc";
    let s = split(text);
    assert_eq!(s.polished, vec!["new"]);
    assert_eq!(s.faithful, vec!["old"]);
}

#[test]
fn block_without_else_ends_at_endc() {
    let text = "if DEF(FAITHFUL)\nonly_faithful\nendc\nshared";
    let s = split(text);
    assert_eq!(s.faithful, vec!["only_faithful", "shared"]);
    assert_eq!(s.polished, vec!["shared"]);
}

#[test]
fn markers_are_case_insensitive() {
    let text = "IF DEF(faithful)\nf\nELSE\np\nENDC";
    let s = split(text);
    assert_eq!(s.faithful, vec!["f"]);
    assert_eq!(s.polished, vec!["p"]);
}

#[test]
fn line_accounting_holds() {
    // 3 common, 2 faithful-only, 1 polished-only.
    let text = "\
c1
if DEF(FAITHFUL)
f1
f2
else
p1
endc
c2
c3";
    let s = split(text);
    let common = 3;
    assert_eq!(s.polished.len() + s.faithful.len(), 2 * common + 2 + 1);
}

#[test]
fn unrelated_conditionals_pass_through() {
    let text = "if DEF(DEBUG)\ndebug_line\nelse\nrelease_line\nendc";
    let s = split(text);
    assert_eq!(s.polished, s.faithful);
    assert_eq!(s.polished.len(), 5);
    assert!(s.diagnostics.is_empty());
}

#[test]
fn inner_conditional_stays_in_branch() {
    let text = "\
if DEF(FAITHFUL)
if DEF(DEBUG)
x
endc
y
else
z
endc";
    let s = split(text);
    assert_eq!(s.faithful, vec!["if DEF(DEBUG)", "x", "endc", "y"]);
    assert_eq!(s.polished, vec!["z"]);
}

#[test]
fn unterminated_block_is_reported() {
    let text = "shared\nif DEF(FAITHFUL)\nf1\nelse\np1\np2";
    let s = split(text);
    assert_eq!(s.unterminated_at, Some(2));
    assert_eq!(s.diagnostics.count(DiagnosticKind::UnterminatedConditional), 1);
    // Lines stay in the branch that was open.
    assert_eq!(s.polished, vec!["shared", "p1", "p2"]);
    assert_eq!(s.faithful, vec!["shared", "f1"]);
}

#[test]
fn strict_split_rejects_unterminated_block() {
    let err = split_strict("parties.asm", "if DEF(FAITHFUL)\nx", SplitOptions::new()).unwrap_err();
    match err {
        ExtractError::UnterminatedConditional { source_name, line } => {
            assert_eq!(source_name, "parties.asm");
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nested_faithful_conditional_is_diagnosed() {
    let text = "if DEF(FAITHFUL)\nif DEF(FAITHFUL)\nx\nendc\nendc";
    let s = split(text);
    assert_eq!(s.diagnostics.count(DiagnosticKind::NestedConditional), 1);
    assert!(s.unterminated_at.is_none());
    assert_eq!(s.faithful, vec!["if DEF(FAITHFUL)", "x", "endc"]);
    assert!(s.polished.is_empty());
}

#[test]
fn stray_endc_is_diagnosed() {
    let s = split("a\nendc\nb");
    assert_eq!(s.diagnostics.count(DiagnosticKind::StrayConditional), 1);
    assert_eq!(s.polished, vec!["a", "endc", "b"]);
}

#[test]
fn normalization_rewrites_glyphs() {
    assert_eq!(normalize_line("  rawchar \"Bulbasaur@\"  ", false), "rawchar \"Bulbasaur\"");
    assert_eq!(normalize_line("text \"A #mon@\"", true), "text \"A Pokémon@\"");
    assert_eq!(normalize_line("PokeBallDesc:", false), "PokéBallDesc:");
}

#[test]
fn keep_at_preserves_item_separator() {
    let s = split_variants(
        "parties.asm",
        "tr_mon 60, MEGANIUM @ SITRUS_BERRY",
        SplitOptions::new().keep_at(true),
    );
    assert_eq!(s.polished, vec!["tr_mon 60, MEGANIUM @ SITRUS_BERRY"]);
}
