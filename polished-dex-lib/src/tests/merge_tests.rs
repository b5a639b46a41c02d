use super::*;
use polished_dex_core::{
    AcquisitionMethod, Form, FormMap, ItemLocation, LevelMove, Moveset, Species, Team, TeamMember,
};

fn species(id: &str, name: &str, dex_no: u16, forms: &[(&str, u8)]) -> Species {
    Species {
        id: id.into(),
        name: name.into(),
        dex_no,
        forms: forms.iter().map(|&(f, n)| Form::new(f, n)).collect::<FormMap>(),
    }
}

fn table(list: Vec<Species>) -> SpeciesTable {
    let mut table = SpeciesTable::new();
    for s in list {
        table.push(s);
    }
    table
}

fn stats(power: u16) -> MoveStats {
    MoveStats {
        power,
        move_type: "normal".into(),
        accuracy: 100,
        pp: 35,
        effect_chance: 0,
        category: "physical".into(),
        effect: "normalhit".into(),
        description: None,
    }
}

// ── Species ──────────────────────────────────────────────────────────────

#[test]
fn species_only_in_one_variant_has_one_version() {
    let mut tables = VariantMap::new();
    tables.insert(
        Variant::Polished,
        table(vec![
            species("bulbasaur", "Bulbasaur", 1, &[("plain", 1)]),
            species("wyrdeer", "Wyrdeer", 254, &[("plain", 1)]),
        ]),
    );
    tables.insert(
        Variant::Faithful,
        table(vec![species("bulbasaur", "Bulbasaur", 1, &[("plain", 1)])]),
    );

    let records = merge_species(&tables);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "bulbasaur");
    assert_eq!(records[0].versions.iter().count(), 2);
    assert!(records[1].versions.get(Variant::Faithful).is_none());
    assert!(records[1].versions.get(Variant::Polished).is_some());
}

#[test]
fn movesets_fall_back_from_form_to_plain_section() {
    let mut t = table(vec![species(
        "raticate",
        "Raticate",
        20,
        &[("plain", 1), ("alolan", 2)],
    )]);
    let mut learnsets = MovesetTable::new();
    learnsets.insert(
        "raticateplain".into(),
        Moveset {
            level_up: vec![LevelMove {
                name: "tackle".into(),
                level: 1,
            }],
            ..Default::default()
        },
    );
    let mut tm = TmCompatibility::new();
    tm.insert("raticatealolan".into(), vec!["shadowball".into()]);
    tm.insert("raticate".into(), vec!["toxic".into()]);
    let mut eggs = EggMoveTable::new();
    eggs.insert(("raticate".into(), "alolan".into()), vec!["counter".into()]);

    assemble_movesets(&mut t, &learnsets, &tm, &eggs);

    let r = t.get("raticate").unwrap();
    let plain = r.forms.get("plain").unwrap();
    let alolan = r.forms.get("alolan").unwrap();
    assert_eq!(plain.movesets.level_up.len(), 1);
    assert_eq!(alolan.movesets.level_up[0].name, "tackle");
    assert_eq!(plain.movesets.tm, vec!["toxic"]);
    assert_eq!(alolan.movesets.tm, vec!["shadowball"]);
    assert!(plain.movesets.egg_moves.is_empty());
    assert_eq!(alolan.movesets.egg_moves, vec!["counter"]);
}

// ── Moves ────────────────────────────────────────────────────────────────

#[test]
fn move_without_stats_is_reported_and_skipped() {
    let mut polished = MoveSources::default();
    polished.stats.insert("tackle".into(), stats(40));
    polished
        .descriptions
        .insert("tackle".into(), "A physical attack.".into());
    let mut faithful = MoveSources::default();
    faithful.stats.insert("tackle".into(), stats(35));
    faithful.tmhm.insert(
        "tackle".into(),
        TmInfo {
            number: "tm99".into(),
            location: None,
        },
    );

    let mut sources = VariantMap::new();
    sources.insert(Variant::Polished, polished);
    sources.insert(Variant::Faithful, faithful);

    let names = vec!["Tackle".to_string(), "Struggle".to_string(), "Tackle".to_string()];
    let mut diags = Diagnostics::new();
    let moves = merge_moves(&names, &sources, &mut diags);

    assert_eq!(moves.len(), 1);
    let tackle = &moves["tackle"];
    assert_eq!(tackle.name, "Tackle");
    assert_eq!(tackle.description, "A physical attack.");
    assert_eq!(tackle.versions.get(Variant::Polished).unwrap().power, 40);
    assert_eq!(tackle.versions.get(Variant::Faithful).unwrap().power, 35);
    assert_eq!(tackle.versions.get(Variant::Faithful).unwrap().description, None);
    assert_eq!(tackle.tm.as_ref().unwrap().number, "tm99");

    assert_eq!(diags.count(DiagnosticKind::MissingField), 1);
}

#[test]
fn extracted_name_and_stats_lines_meet_on_one_id() {
    use polished_dex_extract::line::classify_all;
    use polished_dex_extract::moves::{extract_move_names, extract_move_stats};
    use polished_dex_extract::split::{SplitOptions, split_variants};

    let names_text = "MoveNames::\n\tli \"Acrobatics\"\n";
    let stats_text = "Moves:\n\tmove ACROBATICS, EFFECT_CONDITIONAL_BOOST, 55, FLYING, 100, 15, 0, PHYSICAL\n";
    let names_lines = split_variants("names.asm", names_text, SplitOptions::new()).polished;
    let stats_lines = split_variants("moves.asm", stats_text, SplitOptions::new()).polished;

    let mut diags = Diagnostics::new();
    let names = extract_move_names(&classify_all(&names_lines));
    let mut polished = MoveSources::default();
    polished.stats = extract_move_stats("moves.asm", &classify_all(&stats_lines), &mut diags);
    let mut sources = VariantMap::new();
    sources.insert(Variant::Polished, polished);

    let moves = merge_moves(&names, &sources, &mut diags);
    assert!(diags.is_empty());
    let acrobatics = &moves["acrobatics"];
    assert_eq!(acrobatics.id, "acrobatics");
    assert_eq!(acrobatics.name, "Acrobatics");
    let stats = acrobatics.versions.get(Variant::Polished).unwrap();
    assert_eq!(stats.power, 55);
    assert_eq!(stats.move_type, "flying");
    assert_eq!(stats.accuracy, 100);
    assert_eq!(stats.pp, 15);
    assert_eq!(stats.category, "physical");
    assert_eq!(stats.effect, "conditionalboost");
}

// ── Trainers ─────────────────────────────────────────────────────────────

fn def(class: &str, name: &str, constant: &str, level: u8) -> Trainer {
    Trainer {
        id: constant.rsplit('_').next().unwrap_or_default().to_string(),
        name: name.into(),
        class: class.into(),
        constant_name: constant.into(),
        teams: vec![Team {
            match_count: 1,
            pokemon: vec![TeamMember {
                species: "rattata".into(),
                level,
                ..Default::default()
            }],
        }],
    }
}

#[test]
fn rematches_consolidate_into_one_record() {
    let mut trainers = VariantMap::new();
    trainers.insert(
        Variant::Polished,
        vec![
            def("YOUNGSTER", "Joey", "YOUNGSTER_JOEY1", 4),
            def("YOUNGSTER", "Joey", "YOUNGSTER_JOEY2", 15),
            def("YOUNGSTER", "Mikey", "YOUNGSTER_MIKEY", 5),
        ],
    );
    trainers.insert(
        Variant::Faithful,
        vec![def("YOUNGSTER", "Joey", "YOUNGSTER_JOEY1", 4)],
    );

    let records = merge_trainers(&trainers);
    assert_eq!(records.len(), 2);
    let joey = &records[0];
    assert_eq!(joey.id, "joey");
    assert_eq!(joey.constant_name, "YOUNGSTER_JOEY1");
    assert_eq!(joey.file_stem(), "youngster_joey");
    assert_eq!(joey.versions.get(Variant::Polished).unwrap().teams.len(), 2);
    assert_eq!(joey.versions.get(Variant::Faithful).unwrap().teams.len(), 1);

    let constants = trainer_constants(&records, &trainers);
    assert_eq!(constants["YOUNGSTER_JOEY2"], "youngster_joey");
    assert_eq!(constants["YOUNGSTER_MIKEY"], "youngster_mikey");
}

// ── Items ────────────────────────────────────────────────────────────────

fn item(id: &str, name: &str) -> ItemEntry {
    ItemEntry {
        id: id.into(),
        data: ItemData {
            name: name.into(),
            description: "?".into(),
            ..Default::default()
        },
    }
}

#[test]
fn items_keep_variant_specific_data() {
    let mut entries = VariantMap::new();
    entries.insert(Variant::Polished, vec![item("potion", "Potion"), item("bottlecap", "Bottle Cap")]);
    entries.insert(Variant::Faithful, vec![item("potion", "Potion")]);

    let items = merge_items(&entries);
    assert_eq!(items.len(), 2);
    assert!(items["bottlecap"].versions.get(Variant::Faithful).is_none());
    assert_eq!(items["potion"].versions.iter().count(), 2);
}

#[test]
fn curated_entries_overlay_and_create_items() {
    let mut entries = VariantMap::new();
    entries.insert(Variant::Polished, vec![item("potion", "Potion")]);
    let mut items = merge_items(&entries);

    let gift = ItemLocation {
        area: "goldenrodpokecenter1f".into(),
        method: AcquisitionMethod::Gift,
        price: None,
    };
    let curated = vec![
        CuratedItem {
            id: "GS_BALL".into(),
            name: None,
            description: Some("A mysterious Ball.".into()),
            key_item: true,
            locations: vec![gift.clone()],
            variant: Some(Variant::Faithful),
        },
        CuratedItem {
            id: "potion".into(),
            name: Some("Potion+".into()),
            description: None,
            key_item: false,
            locations: vec![gift.clone(), gift.clone()],
            variant: Some(Variant::Polished),
        },
    ];
    apply_curated_items(&mut items, &curated);

    let gs = &items["gsball"];
    assert!(gs.versions.get(Variant::Polished).is_none());
    let faithful = gs.versions.get(Variant::Faithful).unwrap();
    assert_eq!(faithful.name, "Gs Ball");
    assert!(faithful.key_item);
    assert_eq!(faithful.locations, vec![gift.clone()]);

    let potion = items["potion"].versions.get(Variant::Polished).unwrap();
    assert_eq!(potion.name, "Potion+");
    assert_eq!(potion.description, "?");
    assert_eq!(potion.locations.len(), 1);
}
