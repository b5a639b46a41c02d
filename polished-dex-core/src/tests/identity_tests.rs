use super::*;

/// Identifiers in every spelling the source tree uses.
const SAMPLES: &[&str] = &[
    "BULBASAUR",
    "Bulbasaur",
    "bulbasaur.json",
    "NIDORAN_M",
    "Nidoran♂",
    "Nidoran♀",
    "Mr. Mime",
    "MR__MIME",
    "Farfetch'd",
    "Porygon-Z",
    "Ho-Oh",
    "Poké Ball",
    "<PLAYER>",
    "TM_FOCUS_PUNCH",
    "RadioTower5F",
    "MtMortarB1F",
    "Route34IlexForestGate",
    "EVENT_GOT_TM30_SHADOW_BALL",
    "",
    "   ",
];

#[test]
fn reduce_strips_separators() {
    assert_eq!(reduce("Mr. Mime"), "mrmime");
    assert_eq!(reduce("Farfetch'd"), "farfetchd");
    assert_eq!(reduce("Porygon-Z"), "porygonz");
    assert_eq!(reduce("<RIVAL>"), "rival");
    assert_eq!(reduce("TM_FOCUS_PUNCH"), "tmfocuspunch");
}

#[test]
fn reduce_folds_glyphs() {
    assert_eq!(reduce("Nidoran♂"), "nidoranm");
    assert_eq!(reduce("Nidoran♀"), "nidoranf");
    assert_eq!(reduce("Poké Ball"), "pokeball");
    assert_eq!(reduce("POKÉ BALL"), "pokeball");
}

#[test]
fn reduce_matches_across_spellings() {
    assert_eq!(reduce("NIDORAN_M"), reduce("Nidoran♂"));
    assert_eq!(reduce("MR__MIME"), reduce("Mr. Mime"));
    assert_eq!(reduce("PORYGON_Z"), reduce("Porygon-Z"));
}

#[test]
fn reduce_is_idempotent() {
    for s in SAMPLES {
        let once = reduce(s);
        assert_eq!(reduce(&once), once, "not idempotent for {s:?}");
    }
}

#[test]
fn reduce_ignores_casing() {
    for s in SAMPLES {
        assert_eq!(reduce(&s.to_uppercase()), reduce(s), "casing changed {s:?}");
        assert_eq!(reduce(&s.to_lowercase()), reduce(s), "casing changed {s:?}");
    }
}

#[test]
fn reduce_commutes_with_concatenation() {
    for a in SAMPLES {
        for b in SAMPLES {
            let joined = format!("{a}{b}");
            assert_eq!(reduce(&joined), format!("{}{}", reduce(a), reduce(b)));
        }
    }
}

#[test]
fn display_name_route_numbers() {
    assert_eq!(display_name("Route1"), "Route 1");
    assert_eq!(display_name("Route29"), "Route 29");
    assert_eq!(display_name("Route32Pokecenter1F"), "Route 32 Pokecenter 1F");
}

#[test]
fn display_name_floors() {
    assert_eq!(display_name("RadioTower5F"), "Radio Tower 5F");
    assert_eq!(display_name("MtMortarB1F"), "Mt Mortar B1F");
    assert_eq!(display_name("BurnedTowerB1F"), "Burned Tower B1F");
    assert_eq!(display_name("DragonsDenB1F"), "Dragons Den B1F");
    assert_eq!(display_name("SilverCave2F"), "Silver Cave 2F");
}

#[test]
fn display_name_floor_directions() {
    // The floor rule only fires at the end of the label, so a directional
    // suffix keeps the floor glued to the preceding word.
    assert_eq!(display_name("GoldenrodUnderground1FNorth"), "Goldenrod Underground1F North");
    assert_eq!(display_name("TinTower1FSouth"), "Tin Tower1F South");
}

#[test]
fn display_name_gates() {
    assert_eq!(display_name("Route29Route46Gate"), "Route 29 Route46 Gate");
    assert_eq!(display_name("IlexForestAzaleaGate"), "Ilex Forest Azalea Gate");
}

#[test]
fn display_name_plain_labels() {
    assert_eq!(display_name("NewBarkTown"), "New Bark Town");
    assert_eq!(display_name("NEW_BARK_TOWN"), "NEW BARK TOWN");
    assert_eq!(display_name(""), "");
}

#[test]
fn reduce_of_display_name_keeps_identity() {
    for s in SAMPLES {
        assert_eq!(reduce(&display_name(s)), reduce(s), "identity drifted for {s:?}");
    }
}

#[test]
fn display_name_is_lossy_after_reduce() {
    // Casing is gone after reduce, so floor markers can no longer be recognised.
    let original = "RadioTower5F";
    assert_eq!(display_name(original), "Radio Tower 5F");
    assert_eq!(display_name(&reduce(original)), "radiotower5 f");
    assert_ne!(display_name(&reduce(original)), display_name(original));
}

#[test]
fn title_case_constants() {
    assert_eq!(title_case("MASTER_BALL"), "Master Ball");
    assert_eq!(title_case("RAIKOU"), "Raikou");
    assert_eq!(title_case("BEAT_ELITE_FOUR"), "Beat Elite Four");
    assert_eq!(title_case("__"), "");
}

#[test]
fn strip_numeric_suffix_variants() {
    assert_eq!(strip_numeric_suffix("LANCE_2", true), "LANCE");
    assert_eq!(strip_numeric_suffix("LANCE2", true), "LANCE");
    assert_eq!(strip_numeric_suffix("RIVAL1_1", false), "RIVAL");
    assert_eq!(strip_numeric_suffix("RIVAL1_1", true), "RIVAL1");
    assert_eq!(strip_numeric_suffix("FALKNER", false), "FALKNER");
}

#[test]
fn split_form_suffix_regional() {
    assert_eq!(split_form_suffix("raticatealolan"), ("raticate", "alolan"));
    assert_eq!(split_form_suffix("meowthgalarian"), ("meowth", "galarian"));
    assert_eq!(split_form_suffix("raticateplain"), ("raticate", "plain"));
    assert_eq!(split_form_suffix("plain"), ("plain", "plain"));
    assert_eq!(split_form_suffix("porygon2"), ("porygon2", "plain"));
}

#[test]
fn form_key_joins_species_and_form() {
    assert_eq!(form_key("Raticate", "alolan"), "raticatealolan");
    assert_eq!(form_key("Mr. Mime", "galarian"), "mrmimegalarian");
    assert_eq!(form_key("Bulbasaur", "plain"), "bulbasaurplain");
}
