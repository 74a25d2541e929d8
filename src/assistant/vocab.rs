//! Assistant vocabulary loader — word lists from YAML.
//!
//! Single consolidated loader for all matcher data: color names, synonym
//! groups, the icon catalog, French number words, greetings and
//! acknowledgements. Uses the standard disk-first + `include_str!` fallback
//! pattern. Color names are sorted longest-first at load so a message
//! containing "orange" can never resolve to "or".

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_VOCAB: &str = include_str!("../../data/assistant/assistant_vocab.yaml");

// ---------------------------------------------------------------------------
// YAML schema types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VocabYaml {
    colors: Vec<ColorEntry>,
    synonyms: SynonymsYaml,
    icons: Vec<IconEntry>,
    numbers: Vec<NumberEntry>,
    greetings: Vec<String>,
    acknowledgements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ColorEntry {
    name: String,
    hex: String,
}

#[derive(Debug, Deserialize)]
struct SynonymsYaml {
    layout: Vec<String>,
    colors: Vec<String>,
    text: Vec<String>,
    title: Vec<String>,
    subtitle: Vec<String>,
    badge: Vec<String>,
    button: Vec<String>,
    change: Vec<String>,
    add: Vec<String>,
    delete: Vec<String>,
    affirmative: Vec<String>,
    negative: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IconEntry {
    name: String,
    label: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NumberEntry {
    word: String,
    value: i64,
}

// ---------------------------------------------------------------------------
// Runtime vocabulary
// ---------------------------------------------------------------------------

/// A synonym category the matcher can test for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynonymGroup {
    Layout,
    Colors,
    Text,
    Title,
    Subtitle,
    Badge,
    Button,
    Change,
    Add,
    Delete,
    Affirmative,
    Negative,
}

/// An icon catalog entry.
#[derive(Debug, Clone)]
pub struct IconInfo {
    /// Icon identifier as consumed by the renderer ("Zap", "Star", …).
    pub name: String,
    /// Display label for suggestion chips.
    pub label: String,
    /// Trigger keywords (substring match).
    pub keywords: Vec<String>,
}

/// Loaded assistant vocabulary, indexed for matching.
#[derive(Debug)]
pub struct AssistantVocab {
    /// (name, hex) pairs, sorted by name length descending.
    pub colors: Vec<(String, String)>,
    /// Synonym lists per group.
    synonyms: HashMap<SynonymGroup, Vec<String>>,
    /// Icon catalog, in YAML order.
    pub icons: Vec<IconInfo>,
    /// Number words in match order ("dernière" before "un").
    pub numbers: Vec<(String, i64)>,
    /// Greeting words (prefix match).
    pub greetings: Vec<String>,
    /// Canned acknowledgement replies, cycled.
    pub acknowledgements: Vec<String>,
}

impl AssistantVocab {
    /// True if any synonym of the group is a substring of `text`.
    /// `text` is expected lowercased.
    pub fn matches(&self, text: &str, group: SynonymGroup) -> bool {
        self.synonyms
            .get(&group)
            .map(|list| list.iter().any(|s| text.contains(s.as_str())))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static VOCAB: OnceLock<AssistantVocab> = OnceLock::new();

/// Get the loaded vocabulary (singleton, loaded on first call).
pub fn vocab() -> &'static AssistantVocab {
    VOCAB.get_or_init(load_vocab)
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

fn load_vocab() -> AssistantVocab {
    // Disk-first, embedded fallback
    let yaml_str = std::fs::read_to_string("data/assistant/assistant_vocab.yaml")
        .ok()
        .unwrap_or_else(|| EMBEDDED_VOCAB.to_string());

    parse_vocab(&yaml_str).unwrap_or_else(|e| {
        eprintln!(
            "WARN: failed to parse assistant_vocab.yaml from disk ({}), using embedded",
            e
        );
        parse_vocab(EMBEDDED_VOCAB).expect("embedded assistant_vocab.yaml must parse")
    })
}

fn parse_vocab(yaml_str: &str) -> Result<AssistantVocab, String> {
    let raw: VocabYaml =
        serde_yaml::from_str(yaml_str).map_err(|e| format!("YAML parse error: {}", e))?;

    // Color names sorted longest-first (longest-match precedence).
    let mut colors: Vec<(String, String)> = raw
        .colors
        .into_iter()
        .map(|c| (c.name, c.hex))
        .collect();
    colors.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    let mut synonyms = HashMap::new();
    synonyms.insert(SynonymGroup::Layout, raw.synonyms.layout);
    synonyms.insert(SynonymGroup::Colors, raw.synonyms.colors);
    synonyms.insert(SynonymGroup::Text, raw.synonyms.text);
    synonyms.insert(SynonymGroup::Title, raw.synonyms.title);
    synonyms.insert(SynonymGroup::Subtitle, raw.synonyms.subtitle);
    synonyms.insert(SynonymGroup::Badge, raw.synonyms.badge);
    synonyms.insert(SynonymGroup::Button, raw.synonyms.button);
    synonyms.insert(SynonymGroup::Change, raw.synonyms.change);
    synonyms.insert(SynonymGroup::Add, raw.synonyms.add);
    synonyms.insert(SynonymGroup::Delete, raw.synonyms.delete);
    synonyms.insert(SynonymGroup::Affirmative, raw.synonyms.affirmative);
    synonyms.insert(SynonymGroup::Negative, raw.synonyms.negative);

    let icons = raw
        .icons
        .into_iter()
        .map(|i| IconInfo {
            name: i.name,
            label: i.label,
            keywords: i.keywords,
        })
        .collect();

    let numbers = raw.numbers.into_iter().map(|n| (n.word, n.value)).collect();

    Ok(AssistantVocab {
        colors,
        synonyms,
        icons,
        numbers,
        greetings: raw.greetings,
        acknowledgements: raw.acknowledgements,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
