use super::*;

use crate::line::classify_all;
use crate::split::{SplitOptions, split_variants};

const PARTIES: &str = "\
\tdef_trainer_class FALKNER
\tdef_trainer 1, \"Falkner\"
\ttr_mon 9, PIDGEY @ ORAN_BERRY
\ttr_moves TACKLE, MUD_SLAP, NO_MOVE, NO_MOVE
\ttr_mon 11, PIDGEOTTO
\ttr_extra KEEN_EYE, JOLLY
\tend_trainer

\tdef_trainer 2, \"Falkner\"
\ttr_mon 40, PIDGEOT @ SHARP_BEAK
\tend_trainer

\tdef_trainer_class YOUNGSTER
\tdef_trainer JOEY1, \"Joey\"
if DEF(FAITHFUL)
\ttr_mon 4, RATTATA
else
\ttr_mon 4, RATTATA, ALOLAN_FORM
endc
\tend_trainer

\tdef_trainer MIKEY, \"Mikey\"
\ttr_mon 2, \"Ratty@\", RATTATA
\ttr_extra SHINY
\ttr_dvs 15, 15, 15, 15, 15, 15
\tend_trainer
";

fn parse(text: &str) -> (Vec<Trainer>, Vec<Trainer>, Diagnostics) {
    let split = split_variants("parties.asm", text, SplitOptions::new().keep_at(true));
    let mut diags = Diagnostics::new();
    let polished = extract_trainers("parties.asm", &classify_all(&split.polished), &mut diags);
    let faithful = extract_trainers("parties.asm", &classify_all(&split.faithful), &mut diags);
    (polished, faithful, diags)
}

#[test]
fn members_with_items_and_moves() {
    let (trainers, _, diags) = parse(PARTIES);
    assert!(diags.is_empty());
    assert_eq!(trainers.len(), 4);

    let falkner = &trainers[0];
    assert_eq!(falkner.class, "FALKNER");
    assert_eq!(falkner.constant_name, "FALKNER");
    let team = &falkner.teams[0];
    assert_eq!(team.pokemon.len(), 2);
    assert_eq!(team.pokemon[0].species, "pidgey");
    assert_eq!(team.pokemon[0].item.as_deref(), Some("oranberry"));
    assert_eq!(team.pokemon[0].moves, vec!["tackle", "mudslap"]);
    assert_eq!(team.pokemon[1].ability.as_deref(), Some("keeneye"));
    assert_eq!(team.pokemon[1].nature.as_deref(), Some("jolly"));
}

#[test]
fn rematches_count_up() {
    let (trainers, _, _) = parse(PARTIES);
    assert_eq!(trainers[0].teams[0].match_count, 1);
    assert_eq!(trainers[1].teams[0].match_count, 2);
    assert_eq!(trainers[1].constant_name, "FALKNER");
    assert_eq!(trainers[2].teams[0].match_count, 1);
}

#[test]
fn variant_specific_forms() {
    let (polished, faithful, _) = parse(PARTIES);
    assert_eq!(polished[2].teams[0].pokemon[0].form.as_deref(), Some("alolan"));
    assert_eq!(faithful[2].teams[0].pokemon[0].form, None);
    assert_eq!(polished[2].constant_name, "YOUNGSTER_JOEY");
}

#[test]
fn nickname_shiny_and_dvs() {
    let (trainers, _, _) = parse(PARTIES);
    let mikey = &trainers[3].teams[0].pokemon[0];
    assert_eq!(mikey.nickname.as_deref(), Some("Ratty"));
    assert_eq!(mikey.species, "rattata");
    assert_eq!(mikey.shiny, Some(true));
    assert_eq!(mikey.dvs.as_deref(), Some("15, 15, 15, 15, 15, 15"));
}

#[test]
fn five_moves_is_an_invariant_violation() {
    let (_, _, diags) = parse(
        "\tdef_trainer_class LASS\n\tdef_trainer DANA, \"Dana\"\n\ttr_mon 20, FLAAFFY\n\ttr_moves TACKLE, GROWL, SPARK, CHARGE, THUNDER_WAVE\n\tend_trainer",
    );
    assert_eq!(diags.count(DiagnosticKind::InvariantViolation), 2);
}

#[test]
fn extra_moves_are_dropped_after_the_fourth() {
    let (trainers, _, diags) = parse(
        "\tdef_trainer_class BIRD_KEEPER\n\tdef_trainer ABE, \"Abe\"\n\ttr_mon 9, SPEAROW\n\ttr_moves TACKLE, MUD_SLAP, GUST, SAND_ATTACK, QUICK_ATTACK\n\tend_trainer",
    );
    assert_eq!(
        trainers[0].teams[0].pokemon[0].moves,
        vec!["tackle", "mudslap", "gust", "sandattack"]
    );
    assert!(diags.count(DiagnosticKind::InvariantViolation) > 0);
}

#[test]
fn badge_levels() {
    assert_eq!(parse_level("LEVEL_FROM_BADGES + 4"), Some(24));
    assert_eq!(parse_level("LEVEL_FROM_BADGES - 2"), Some(18));
    assert_eq!(parse_level("LEVEL_FROM_BADGES"), Some(20));
    assert_eq!(parse_level("??"), None);
}

#[test]
fn special_classes_use_the_id() {
    assert_eq!(trainer_constant_name("RIVAL1", "RIVAL1_1_TOTODILE"), "RIVAL1_1_TOTODILE");
    assert_eq!(trainer_constant_name("KAREN", "1"), "KAREN");
}
