//! Input detectors: pure scans over a lowercased, trimmed message.
//!
//! Each detector returns `Option` — no match is a normal outcome, never an
//! error — and mutates nothing. Matching is substring-based over the loaded
//! vocabulary; color names are tried longest-first (see `vocab`).

use crate::assistant::sections::section_config;
use crate::assistant::vocab::{vocab, IconInfo, SynonymGroup};
use crate::site::SectionKind;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A detected color: the surface name (or hex literal) and its hex value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedColor {
    pub name: String,
    pub hex: String,
}

/// Detect a color in the message: a `#rgb`/`#rrggbb` literal first, else the
/// longest matching color name.
///
/// Names must start at a word boundary — "or" never fires inside "export" —
/// but may end mid-word, so inflected forms ("bleue", "verte") still match.
pub fn detect_color(msg: &str) -> Option<NamedColor> {
    if let Some(hex) = find_hex_literal(msg) {
        return Some(NamedColor {
            name: hex.clone(),
            hex,
        });
    }
    for (name, hex) in &vocab().colors {
        if contains_word_start(msg, name) {
            return Some(NamedColor {
                name: name.clone(),
                hex: hex.clone(),
            });
        }
    }
    None
}

/// True if `needle` occurs in `haystack` starting at a word boundary.
fn contains_word_start(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(i, _)| {
        haystack[..i]
            .chars()
            .next_back()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true)
    })
}

/// First `#` followed by exactly 3, or at least 6, hex digits. A run of 6+
/// is cut to 6.
fn find_hex_literal(msg: &str) -> Option<String> {
    let bytes = msg.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'#' {
            continue;
        }
        let digits: String = msg[i + 1..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect();
        if digits.len() >= 6 {
            return Some(format!("#{}", &digits[..6]));
        }
        if digits.len() == 3 {
            return Some(format!("#{}", digits));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// A detected layout variant, scoped to a section kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMatch {
    pub id: String,
    pub label: String,
}

/// Detect a layout variant of the given section kind by trigger keyword.
/// First matching variant wins, in configuration order.
pub fn detect_layout(msg: &str, kind: SectionKind) -> Option<LayoutMatch> {
    let config = section_config(kind);
    for layout in &config.layouts {
        if layout.keywords.iter().any(|k| msg.contains(k.as_str())) {
            return Some(LayoutMatch {
                id: layout.id.clone(),
                label: layout.label.clone(),
            });
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Icon
// ---------------------------------------------------------------------------

/// Detect an icon by keyword against the fixed catalog.
pub fn detect_icon(msg: &str) -> Option<&'static IconInfo> {
    vocab()
        .icons
        .iter()
        .find(|icon| icon.keywords.iter().any(|k| msg.contains(k.as_str())))
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// Detect a count or ordinal: the first digit run, else a French number
/// word. "dernier"/"dernière" yield the -1 "last item" sentinel. Number
/// words obey the same word-start rule as colors ("un" never fires inside
/// "lundi").
pub fn detect_number(msg: &str) -> Option<i64> {
    let digits: String = msg
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if !digits.is_empty() {
        if let Ok(n) = digits.parse::<i64>() {
            return Some(n);
        }
    }
    for (word, value) in &vocab().numbers {
        if contains_word_start(msg, word) {
            return Some(*value);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Named element
// ---------------------------------------------------------------------------

/// Resolve a named content element. Title keywords only fire when "sous" is
/// absent, so "sous-titre" never resolves to the title.
pub fn detect_element(msg: &str) -> Option<&'static str> {
    let v = vocab();
    if v.matches(msg, SynonymGroup::Title) && !msg.contains("sous") {
        return Some("title");
    }
    if v.matches(msg, SynonymGroup::Subtitle)
        || msg.contains("sous-titre")
        || msg.contains("sous titre")
    {
        return Some("subtitle");
    }
    if v.matches(msg, SynonymGroup::Badge) {
        return Some("badge");
    }
    if v.matches(msg, SynonymGroup::Button) {
        return Some("ctaPrimary");
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Color --

    #[test]
    fn test_detect_color_hex_six() {
        let c = detect_color("mets #ff00aa ici").unwrap();
        assert_eq!(c.hex, "#ff00aa");
    }

    #[test]
    fn test_detect_color_hex_three() {
        let c = detect_color("#f0a").unwrap();
        assert_eq!(c.hex, "#f0a");
    }

    #[test]
    fn test_detect_color_hex_invalid_run_ignored() {
        // 4 hex digits is neither a short nor a long literal
        assert_eq!(detect_color("#abcd"), None);
    }

    #[test]
    fn test_detect_color_named() {
        let c = detect_color("met le titre en rose").unwrap();
        assert_eq!(c.name, "rose");
        assert_eq!(c.hex, "#F472B6");
    }

    #[test]
    fn test_detect_color_longest_match_wins() {
        // "orange" contains "or" — longest-first ordering must pick orange
        let c = detect_color("je veux du orange").unwrap();
        assert_eq!(c.name, "orange");
        assert_eq!(c.hex, "#FB923C");
    }

    #[test]
    fn test_detect_color_or_alone() {
        let c = detect_color("plutôt or").unwrap();
        assert_eq!(c.hex, "#FBBF24");
    }

    #[test]
    fn test_detect_color_none() {
        assert_eq!(detect_color("bonjour"), None);
    }

    #[test]
    fn test_detect_color_requires_word_start() {
        // "export" embeds "or" but must not read as gold
        assert_eq!(detect_color("on exporte le site"), None);
        assert_eq!(detect_color("adorable"), None);
    }

    #[test]
    fn test_detect_color_inflected_forms() {
        assert_eq!(detect_color("en bleue").unwrap().hex, "#3B82F6");
        assert_eq!(detect_color("verte").unwrap().hex, "#34D399");
    }

    // -- Layout --

    #[test]
    fn test_detect_layout_scoped_to_kind() {
        let m = detect_layout("passe en 2 colonnes", SectionKind::Features).unwrap();
        assert_eq!(m.id, "grid-2");
        // Hero has no grid variants
        assert_eq!(detect_layout("passe en 2 colonnes", SectionKind::Hero), None);
    }

    #[test]
    fn test_detect_layout_hero_centered() {
        let m = detect_layout("centré stp", SectionKind::Hero).unwrap();
        assert_eq!(m.id, "centered");
        assert_eq!(m.label, "Centré");
    }

    // -- Icon --

    #[test]
    fn test_detect_icon_by_keyword() {
        assert_eq!(detect_icon("une fusée").unwrap().name, "Rocket");
        assert_eq!(detect_icon("un bouclier").unwrap().name, "Shield");
        assert!(detect_icon("rien").is_none());
    }

    // -- Number --

    #[test]
    fn test_detect_number_digits() {
        assert_eq!(detect_number("ajoute 3 features"), Some(3));
        assert_eq!(detect_number("12"), Some(12));
    }

    #[test]
    fn test_detect_number_words() {
        assert_eq!(detect_number("ajoute deux features"), Some(2));
        assert_eq!(detect_number("supprime la dernière"), Some(-1));
        assert_eq!(detect_number("le dernier"), Some(-1));
    }

    #[test]
    fn test_detect_number_none() {
        assert_eq!(detect_number("aucun chiffre"), None);
    }

    // -- Element --

    #[test]
    fn test_detect_element_title() {
        assert_eq!(detect_element("le titre"), Some("title"));
        assert_eq!(detect_element("change the title"), Some("title"));
    }

    #[test]
    fn test_detect_element_subtitle_not_title() {
        assert_eq!(detect_element("le sous-titre"), Some("subtitle"));
        assert_eq!(detect_element("le sous titre"), Some("subtitle"));
    }

    #[test]
    fn test_detect_element_badge_and_button() {
        assert_eq!(detect_element("le badge"), Some("badge"));
        assert_eq!(detect_element("le bouton"), Some("ctaPrimary"));
        assert_eq!(detect_element("the cta"), Some("ctaPrimary"));
    }

    #[test]
    fn test_detect_element_none() {
        assert_eq!(detect_element("la couleur"), None);
    }
}
