use super::*;
use polished_dex_core::{Form, FormMap, Species};

use crate::line::classify_all;
use crate::split::{SplitOptions, split_variants};

const EVOS: &str = "\
\tevos_attacks Bulbasaur
\tevo_data EVOLVE_LEVEL, 16, IVYSAUR
\tlearnset 1, TACKLE
\tlearnset 3, GROWL
\tlearnset 7, LEECH_SEED

\tevos_attacks Tyrogue
\tevo_data EVOLVE_STAT, 20, ATK_LT_DEF, HITMONCHAN
\tevo_data EVOLVE_STAT, 20, ATK_GT_DEF, HITMONLEE
\tlearnset 1, TACKLE

\tevos_attacks Eevee
\tevo_data EVOLVE_HAPPINESS, TR_MORNDAY, ESPEON
\tevo_data EVOLVE_ITEM, THUNDERSTONE, JOLTEON

\tevos_attacks Growlithe
\tevo_data EVOLVE_ITEM, FIRE_STONE, ARCANINE, PLAIN_FORM
\tlearnset 1, BITE

\tevos_attacks GrowlitheHisuian
\tevo_data EVOLVE_ITEM, FIRE_STONE, ARCANINE, HISUIAN_FORM

\tevos_attacks RaticatePlain
\tlearnset 1, SCRATCH
\tlearnset 20, HYPER_FANG

\tevos_attacks RaticateAlolan";

fn parse(text: &str) -> (EvosAttacks, Diagnostics) {
    let lines = split_variants("evos_attacks.asm", text, SplitOptions::new()).polished;
    let mut diags = Diagnostics::new();
    let out = extract_evos_attacks("evos_attacks.asm", &classify_all(&lines), &mut diags);
    (out, diags)
}

#[test]
fn level_evolution_edge() {
    let (out, diags) = parse(EVOS);
    assert!(diags.is_empty());
    let edge = out.evolutions.from_species("bulbasaur").next().unwrap();
    assert_eq!(edge.from, FormRef::new("bulbasaur", "plain"));
    assert_eq!(edge.to, FormRef::new("ivysaur", "plain"));
    assert_eq!(edge.method.action, "level");
    assert_eq!(edge.method.parameter, Some(EvolutionParameter::Number(16)));
}

#[test]
fn stat_evolution_takes_comparison() {
    let (out, _) = parse(EVOS);
    let edges: Vec<_> = out.evolutions.from_species("tyrogue").collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].to.name, "hitmonchan");
    assert_eq!(
        edges[0].method.parameter,
        Some(EvolutionParameter::Named("atkltdef".into()))
    );
}

#[test]
fn time_prefix_is_removed() {
    let (out, _) = parse(EVOS);
    let espeon = out.evolutions.from_species("eevee").next().unwrap();
    assert_eq!(espeon.to.name, "espeon");
    assert_eq!(espeon.method.action, "happiness");
    assert_eq!(espeon.method.parameter, Some(EvolutionParameter::Named("mornday".into())));
}

#[test]
fn regional_section_and_target_form() {
    let (out, _) = parse(EVOS);
    let edges: Vec<_> = out.evolutions.from_species("growlithe").collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].to.form_name, "plain");
    assert_eq!(edges[1].from.form_name, "hisuian");
    assert_eq!(edges[1].to, FormRef::new("arcanine", "hisuian"));
    assert_eq!(out.evolutions.bases(), vec!["bulbasaur", "tyrogue", "eevee", "growlithe"]);
    assert!(out.evolutions.is_target("arcanine"));
}

#[test]
fn learnsets_keyed_by_section() {
    let (out, _) = parse(EVOS);
    let bulbasaur = &out.learnsets["bulbasaur"];
    let names: Vec<_> = bulbasaur.level_up.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["tackle", "growl", "leechseed"]);
    assert_eq!(bulbasaur.level_up[2].level, 7);
    assert!(out.learnsets["raticatealolan"].level_up.is_empty());
}

#[test]
fn malformed_learnset_is_reported() {
    let (out, diags) = parse("evos_attacks Pidgey\nlearnset ??, TACKLE");
    assert!(out.learnsets["pidgey"].level_up.is_empty());
    assert_eq!(diags.count(DiagnosticKind::MalformedField), 1);
}

#[test]
fn negative_parameter_is_dropped() {
    assert_eq!(parse_evolution_parameter("-1"), None);
    assert_eq!(parse_evolution_parameter("30"), Some(EvolutionParameter::Number(30)));
}

#[test]
fn forms_inherit_plain_learnset() {
    let (mut out, _) = parse(EVOS);
    let mut table = SpeciesTable::new();
    table.push(Species {
        id: "raticate".into(),
        name: "Raticate".into(),
        dex_no: 20,
        forms: [Form::new("plain", 1), Form::new("alolan", 2)]
            .into_iter()
            .collect::<FormMap>(),
    });
    inherit_plain_movesets(&table, &mut out.learnsets);
    assert_eq!(
        out.learnsets["raticatealolan"].level_up,
        out.learnsets["raticateplain"].level_up
    );
}

#[test]
fn egg_moves_skip_terminator() {
    let text = "\
BulbasaurEggSpeciesMoves:
\tdb CHARM
\tdb CURSE ; polished only
\tdb $ff
GrowlitheHisuianEggSpeciesMoves:
\tdb DOUBLE_EDGE
\tdb $ff";
    let lines = split_variants("egg_moves.asm", text, SplitOptions::new()).polished;
    let eggs = extract_egg_moves(&classify_all(&lines));
    assert_eq!(eggs.len(), 2);
    assert_eq!(eggs[0], ("bulbasaur".to_string(), vec!["charm".to_string(), "curse".to_string()]));
    assert_eq!(eggs[1].0, "growlithehisuian");
}
