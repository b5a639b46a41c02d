//! Trainer parties from `data/trainers/parties.asm`.
//!
//! The file must be split with `@` kept: it separates a party member's
//! species from its held item.

use polished_dex_core::{
    DiagnosticKind, Diagnostics, Team, TeamMember, Trainer, reduce, strip_numeric_suffix,
};

use crate::line::{Directive, Line};

/// Classes whose trainer ids already name the trainer (`loadtrainer
/// RIVAL1, RIVAL1_1_TOTODILE`).
pub const SPECIAL_TRAINER_CLASSES: &[&str] = &["GIOVANNI", "LYRA1", "RIVAL1", "ARCHER", "ARIANA"];

/// Moves a party member can know.
pub const MAX_MOVES: usize = 4;

/// Level assumed for `LEVEL_FROM_BADGES` before its offset is applied.
const BADGE_LEVEL_BASE: i32 = 20;

/// Constant shared by a trainer definition and the map scripts that load
/// it: `CLASS_ID` (or `ID` for special classes) without a rematch number.
///
/// ```
/// use polished_dex_extract::trainers::trainer_constant_name;
/// assert_eq!(trainer_constant_name("FALKNER", "1"), "FALKNER");
/// assert_eq!(trainer_constant_name("SCHOOLBOY", "SAMUEL"), "SCHOOLBOY_SAMUEL");
/// assert_eq!(trainer_constant_name("ARCHER", "ARCHER2"), "ARCHER");
/// ```
pub fn trainer_constant_name(class: &str, id: &str) -> String {
    let raw = if SPECIAL_TRAINER_CLASSES.contains(&class) {
        id.to_string()
    } else {
        format!("{class}_{id}")
    };
    strip_numeric_suffix(&raw, true)
}

/// Builder state while walking one variant's parties.
#[derive(Default)]
struct PartyWalker {
    class: String,
    last_name: Option<String>,
    match_count: u32,
    current: Option<Trainer>,
    member: Option<TeamMember>,
    out: Vec<Trainer>,
}

impl PartyWalker {
    fn flush_member(&mut self) {
        if let Some(member) = self.member.take()
            && let Some(trainer) = self.current.as_mut()
            && let Some(team) = trainer.teams.last_mut()
        {
            team.pokemon.push(member);
        }
    }

    fn flush_trainer(&mut self) {
        self.flush_member();
        if let Some(mut trainer) = self.current.take() {
            trainer.teams.retain(|t| !t.pokemon.is_empty());
            if !trainer.teams.is_empty() {
                self.out.push(trainer);
            }
        }
    }

    fn start_trainer(&mut self, id: &str, name: &str) {
        self.flush_trainer();
        if self.last_name.as_deref() == Some(name) {
            self.match_count += 1;
        } else {
            self.match_count = 1;
            self.last_name = Some(name.to_string());
        }
        self.current = Some(Trainer {
            id: id.to_string(),
            name: name.to_string(),
            class: self.class.clone(),
            constant_name: trainer_constant_name(&self.class, id),
            teams: vec![Team {
                match_count: self.match_count,
                pokemon: Vec::new(),
            }],
        });
    }
}

pub fn extract_trainers(
    source_name: &str,
    lines: &[Line<'_>],
    diagnostics: &mut Diagnostics,
) -> Vec<Trainer> {
    let mut walker = PartyWalker {
        class: "TRAINER".to_string(),
        ..Default::default()
    };

    for d in lines.iter().filter_map(Line::directive) {
        match d.name {
            "def_trainer_class" => {
                walker.flush_trainer();
                walker.class = d.body.to_string();
            }
            "def_trainer" => {
                let args = d.args();
                let (Some(id), Some(name)) = (args.first(), d.quoted()) else {
                    diagnostics.record(
                        DiagnosticKind::MalformedField,
                        source_name,
                        format!("def_trainer {}", d.body),
                    );
                    continue;
                };
                walker.start_trainer(id, name.trim_end_matches('@'));
            }
            "tr_mon" => {
                walker.flush_member();
                if walker.current.is_none() {
                    continue;
                }
                match parse_tr_mon(d) {
                    Some(member) => walker.member = Some(member),
                    None => diagnostics.record(
                        DiagnosticKind::MalformedField,
                        source_name,
                        format!("tr_mon {}", d.body),
                    ),
                }
            }
            "tr_moves" => {
                if let Some(member) = walker.member.as_mut() {
                    member.moves = d
                        .args()
                        .into_iter()
                        .filter(|m| !m.is_empty() && *m != "NO_MOVE")
                        .map(reduce)
                        .collect();
                    if member.moves.len() > MAX_MOVES {
                        let trainer = walker.current.as_ref().map_or("?", |t| t.name.as_str());
                        diagnostics.record(
                            DiagnosticKind::InvariantViolation,
                            source_name,
                            format!(
                                "{trainer}: {} knows {} moves",
                                member.species,
                                member.moves.len()
                            ),
                        );
                        member.moves.truncate(MAX_MOVES);
                    }
                }
            }
            "tr_extra" => {
                if let Some(member) = walker.member.as_mut() {
                    apply_extra(member, d);
                }
            }
            "tr_dvs" => {
                if let Some(member) = walker.member.as_mut() {
                    member.dvs = Some(d.body.to_string());
                }
            }
            "tr_evs" => {
                if let Some(member) = walker.member.as_mut() {
                    member.evs = Some(d.body.to_string());
                }
            }
            "end_trainer" => walker.flush_member(),
            _ => {}
        }
    }
    walker.flush_trainer();

    log::debug!("{source_name}: {} trainer definitions", walker.out.len());
    walker.out
}

/// `tr_mon LEVEL, ["Nickname",] SPECIES[ @ ITEM][, GENDER | X_FORM]`.
fn parse_tr_mon(d: &Directive<'_>) -> Option<TeamMember> {
    let args = d.args();
    let mut args = args.iter().copied();
    let level = parse_level(args.next()?)?;

    let mut next = args.next()?;
    let mut nickname = None;
    if next.starts_with('"') {
        nickname = Some(next.trim_matches('"').trim_end_matches('@').to_string());
        next = args.next()?;
    }

    let (species, item) = match next.split_once('@') {
        Some((species, item)) => (species.trim(), Some(reduce(item.trim()))),
        None => (next, None),
    };
    if species.is_empty() {
        return None;
    }

    let form = args
        .flat_map(|a| a.split('|'))
        .map(str::trim)
        .find(|p| p.ends_with("_FORM") && *p != "PLAIN_FORM")
        .map(|p| reduce(p.trim_end_matches("_FORM")));

    Some(TeamMember {
        species: reduce(species),
        nickname,
        level,
        form,
        item: item.filter(|i| !i.is_empty() && i != "noitem"),
        ..Default::default()
    })
}

/// A level number, or `LEVEL_FROM_BADGES [+|- n]`.
fn parse_level(raw: &str) -> Option<u8> {
    let Some(offset) = raw.strip_prefix("LEVEL_FROM_BADGES") else {
        return raw.trim().parse().ok();
    };
    let offset: String = offset.chars().filter(|c| !c.is_whitespace()).collect();
    let offset: i32 = if offset.is_empty() {
        0
    } else {
        offset.trim_start_matches('+').parse().ok()?
    };
    u8::try_from((BADGE_LEVEL_BASE + offset).clamp(1, 100)).ok()
}

/// `tr_extra ABILITY, NATURE[, SHINY]`; any slot may be empty.
fn apply_extra(member: &mut TeamMember, d: &Directive<'_>) {
    let mut positional = 0;
    for arg in d.args() {
        if arg.eq_ignore_ascii_case("SHINY") {
            member.shiny = Some(true);
            continue;
        }
        let value = (!arg.is_empty() && arg != "0").then(|| reduce(arg));
        match positional {
            0 => member.ability = value,
            1 => member.nature = value,
            _ => {}
        }
        positional += 1;
    }
}

#[cfg(test)]
#[path = "tests/trainers_tests.rs"]
mod tests;
