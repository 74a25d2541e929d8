//! Quick-reply suggestion ranking and proactive tips.

use crate::assistant::sections::SectionConfig;
use crate::site::Section;

pub const CHIP_LAYOUT: &str = "Le layout";
pub const CHIP_COLORS: &str = "Les couleurs";
pub const CHIP_TEXT: &str = "Le texte";
pub const CHIP_BUTTON: &str = "Le bouton";
pub const CHIP_THEME: &str = "Le thème";
pub const CHIP_PERFECT: &str = "✨ Parfait !";
pub const CHIP_NEXT_SECTION: &str = "➡️ Section suivante";
pub const CHIP_HELP: &str = "Aide";

/// Chip count cap.
const MAX_SUGGESTIONS: usize = 6;

/// Item count past which the "add one" chip stops being offered.
const ADD_CHIP_ITEM_LIMIT: usize = 4;

/// Derive the quick-reply chips for a section: the base category chips plus
/// the kind-specific affordance, with a closing affirmation after 3
/// modifications and a next-section nudge after 5.
pub fn smart_suggestions(
    config: &SectionConfig,
    section: Option<&Section>,
    mod_count: u32,
) -> Vec<String> {
    let mut chips: Vec<String> = vec![
        CHIP_LAYOUT.to_string(),
        CHIP_COLORS.to_string(),
        CHIP_TEXT.to_string(),
    ];

    if config.has_button {
        chips.push(CHIP_BUTTON.to_string());
    } else if let Some(item) = &config.item {
        let count = section.map(|s| s.items.len()).unwrap_or(0);
        if count < ADD_CHIP_ITEM_LIMIT {
            chips.push(format!("Ajouter {}", item.with_article()));
        }
    } else {
        chips.push(CHIP_THEME.to_string());
    }

    if mod_count >= 3 {
        chips[2] = CHIP_PERFECT.to_string();
    }
    if mod_count >= 5 {
        if chips.len() > 3 {
            chips[3] = CHIP_NEXT_SECTION.to_string();
        } else {
            chips.push(CHIP_NEXT_SECTION.to_string());
        }
    }

    clean_suggestions(chips)
}

/// De-duplicate (keeping first occurrences) and cap the chip list.
pub fn clean_suggestions(chips: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    chips
        .into_iter()
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// First proactive tip whose condition holds for the section, if any.
pub fn proactive_tip(config: &SectionConfig, section: &Section) -> Option<String> {
    config
        .tips
        .iter()
        .find(|tip| tip.when.applies(section))
        .map(|tip| tip.text.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
