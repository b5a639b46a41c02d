use polished_dex_core::{Ability, reduce};

use crate::line::Line;
use crate::text::{NO_DESCRIPTION, collect_descriptions};

/// Label of the placeholder entry in the ability name table.
const NO_ABILITY: &str = "NoAbility";

/// Pair `Label: rawchar "Name"` entries with `<Label>Description:` blocks.
pub fn extract_abilities(names: &[Line<'_>], descriptions: &[Line<'_>]) -> Vec<Ability> {
    let descriptions = collect_descriptions(descriptions, "Description");

    names
        .iter()
        .filter_map(|line| match line {
            Line::Label { name, .. } if *name == NO_ABILITY => None,
            Line::Label { name, .. } => {
                let display = line.inline_directive().filter(|d| d.name == "rawchar")?.quoted()?;
                let id = reduce(name);
                let description = descriptions
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string());
                Some(Ability {
                    id,
                    name: display.trim().to_string(),
                    description,
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::classify_all;
    use crate::split::{SplitOptions, split_variants};

    #[test]
    fn names_pair_with_descriptions() {
        let names = split_variants(
            "names.asm",
            "NoAbility: rawchar \"No Ability@\"\nStench: rawchar \"Stench@\"\nDrizzle: rawchar \"Drizzle@\"",
            SplitOptions::new(),
        )
        .polished;
        let descriptions = split_variants(
            "descriptions.asm",
            "StenchDescription:\n\ttext \"May cause a foe\"\n\tnext \"to flinch.@\"",
            SplitOptions::new().keep_at(true),
        )
        .polished;

        let abilities = extract_abilities(&classify_all(&names), &classify_all(&descriptions));
        assert_eq!(abilities.len(), 2);
        assert_eq!(abilities[0].id, "stench");
        assert_eq!(abilities[0].description, "May cause a foe to flinch.");
        assert_eq!(abilities[1].name, "Drizzle");
        assert_eq!(abilities[1].description, NO_DESCRIPTION);
    }
}
