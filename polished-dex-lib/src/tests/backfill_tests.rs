use super::*;
use polished_dex_core::{Form, FormMap, SpeciesVersion, Team, TrainerTeams, VariantMap};

fn lm(name: &str, level: u8) -> LevelMove {
    LevelMove {
        name: name.into(),
        level,
    }
}

fn pidgey_moves() -> Vec<LevelMove> {
    vec![
        lm("tackle", 1),
        lm("sandattack", 5),
        lm("gust", 9),
        lm("quickattack", 13),
        lm("whirlwind", 17),
        lm("twister", 21),
    ]
}

#[test]
fn takes_last_four_in_ascending_order() {
    let moves = moves_at_level(&pidgey_moves(), 20);
    assert_eq!(moves, vec!["sandattack", "gust", "quickattack", "whirlwind"]);
}

#[test]
fn low_level_knows_fewer_moves() {
    assert_eq!(moves_at_level(&pidgey_moves(), 6), vec!["tackle", "sandattack"]);
    assert!(moves_at_level(&pidgey_moves(), 0).is_empty());
}

#[test]
fn same_level_ties_keep_source_order() {
    let level_up = vec![
        lm("a", 1),
        lm("b", 1),
        lm("c", 1),
        lm("d", 1),
        lm("e", 1),
    ];
    // Five moves at one level: the stable descending sort keeps a-d.
    assert_eq!(moves_at_level(&level_up, 10), vec!["a", "b", "c", "d"]);
}

#[test]
fn relearned_move_counts_once() {
    let level_up = vec![
        lm("tackle", 1),
        lm("growl", 3),
        lm("ember", 7),
        lm("tackle", 9),
        lm("smokescreen", 11),
    ];
    assert_eq!(
        moves_at_level(&level_up, 11),
        vec!["growl", "ember", "tackle", "smokescreen"]
    );
}

fn species_record(id: &str, level_up: Vec<LevelMove>) -> SpeciesRecord {
    let mut plain = Form::new("plain", 1);
    plain.movesets.level_up = level_up;
    let mut forms = FormMap::new();
    forms.insert(plain);
    let mut versions = VariantMap::new();
    versions.insert(Variant::Polished, SpeciesVersion { forms });
    SpeciesRecord {
        id: id.into(),
        name: id.into(),
        dex_no: 16,
        versions,
    }
}

fn trainer(members: Vec<TeamMember>) -> TrainerRecord {
    let mut versions = VariantMap::new();
    versions.insert(
        Variant::Faithful,
        TrainerTeams {
            teams: vec![Team {
                match_count: 1,
                pokemon: members,
            }],
        },
    );
    TrainerRecord {
        id: "joey".into(),
        name: "Joey".into(),
        class: "YOUNGSTER".into(),
        constant_name: "YOUNGSTER_JOEY1".into(),
        versions,
    }
}

fn member(species: &str, level: u8, moves: &[&str]) -> TeamMember {
    TeamMember {
        species: species.into(),
        level,
        moves: moves.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn fills_members_from_written_species_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = OutputWriter::new(dir.path());
    writer.prepare().unwrap();
    writer
        .write_record(POKEMON_DIR, "pidgey", &species_record("pidgey", pidgey_moves()))
        .unwrap();

    let mut records = vec![trainer(vec![
        member("pidgey", 10, &[]),
        member("pidgey", 10, &["tackle"]),
        member("rattata", 4, &[]),
    ])];
    let mut diags = Diagnostics::new();
    let filled = backfill_trainer_moves(&mut records, &writer, &mut diags);

    assert_eq!(filled, 1);
    let team = &records[0].versions.get(Variant::Faithful).unwrap().teams[0];
    // Faithful reads the Polished data when the species has no Faithful entry.
    assert_eq!(team.pokemon[0].moves, vec!["tackle", "sandattack", "gust"]);
    assert_eq!(team.pokemon[1].moves, vec!["tackle"]);
    assert!(team.pokemon[2].moves.is_empty());

    assert_eq!(diags.len(), 1);
    let miss = diags.iter().next().unwrap();
    assert_eq!(miss.kind, DiagnosticKind::CrossReferenceMiss);
    assert_eq!(miss.variant, Some(Variant::Faithful));
}
