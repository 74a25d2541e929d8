//! Per-section-kind configuration loader.
//!
//! Loads `data/assistant/sections.yaml`: for each section kind, the elements
//! that can be colored or text-edited (with their display labels and edit
//! prompts), the layout variants with their trigger keywords, the owned item
//! collection and its wizard field order, the next-section pointer and the
//! proactive tips. Extending a section's vocabulary is a YAML edit, not a
//! code change.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::site::{Item, ItemKind, Section, SectionKind};

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_SECTIONS: &str = include_str!("../../data/assistant/sections.yaml");

// ---------------------------------------------------------------------------
// YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SectionsYaml {
    sections: HashMap<String, SectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    label: String,
    has_button: bool,
    color_elements: Vec<ElementEntry>,
    text_elements: Vec<TextElementEntry>,
    layouts: Vec<LayoutEntry>,
    #[serde(default)]
    next_section: Option<String>,
    #[serde(default)]
    item: Option<ItemEntry>,
    #[serde(default)]
    tips: Vec<TipEntry>,
}

#[derive(Debug, Deserialize)]
struct ElementEntry {
    id: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct TextElementEntry {
    id: String,
    label: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct LayoutEntry {
    id: String,
    label: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    kind: String,
    name: String,
    name_plural: String,
    article: String,
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    id: String,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct TipEntry {
    when: TipCondition,
    text: String,
}

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// A colorable element: id + chip label.
#[derive(Debug, Clone)]
pub struct ElementInfo {
    pub id: String,
    pub label: String,
}

/// A text-editable element: id + chip label + edit prompt.
#[derive(Debug, Clone)]
pub struct TextElementInfo {
    pub id: String,
    pub label: String,
    pub prompt: String,
}

/// A layout variant: id + chip label + trigger keywords.
#[derive(Debug, Clone)]
pub struct LayoutInfo {
    pub id: String,
    pub label: String,
    pub keywords: Vec<String>,
}

/// One wizard field of an item kind.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub id: String,
    pub prompt: String,
}

/// Configuration of a section's item collection.
#[derive(Debug, Clone)]
pub struct ItemConfig {
    pub kind: ItemKind,
    /// Singular display name ("feature", "étape", …).
    pub name: String,
    pub name_plural: String,
    /// French article, "un" or "une" — drives gender agreement in replies.
    pub article: String,
    /// Ordered wizard fields.
    pub fields: Vec<FieldInfo>,
}

impl ItemConfig {
    /// "une feature" / "un plan".
    pub fn with_article(&self) -> String {
        format!("{} {}", self.article, self.name)
    }

    pub fn feminine(&self) -> bool {
        self.article == "une"
    }
}

/// Condition under which a proactive tip fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCondition {
    /// The section has no badge text.
    MissingBadge,
    /// The title runs past 50 characters.
    LongTitle,
    /// The item collection has fewer than 3 entries.
    FewItems,
    /// No pricing plan is highlighted.
    NoHighlightedPlan,
}

impl TipCondition {
    pub fn applies(self, section: &Section) -> bool {
        match self {
            TipCondition::MissingBadge => section
                .content_field("badge")
                .map(str::is_empty)
                .unwrap_or(true),
            TipCondition::LongTitle => section
                .content_field("title")
                .map(|t| t.chars().count() > 50)
                .unwrap_or(false),
            TipCondition::FewItems => section.items.len() < 3,
            TipCondition::NoHighlightedPlan => !section
                .items
                .iter()
                .any(|i| matches!(i, Item::Plan { highlighted: true, .. })),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TipInfo {
    pub when: TipCondition,
    pub text: String,
}

/// Full configuration of one section kind.
#[derive(Debug)]
pub struct SectionConfig {
    pub kind: SectionKind,
    pub label: String,
    pub has_button: bool,
    pub color_elements: Vec<ElementInfo>,
    pub text_elements: Vec<TextElementInfo>,
    pub layouts: Vec<LayoutInfo>,
    pub next_section: Option<SectionKind>,
    pub item: Option<ItemConfig>,
    pub tips: Vec<TipInfo>,
}

impl SectionConfig {
    pub fn has_color_element(&self, id: &str) -> bool {
        self.color_elements.iter().any(|e| e.id == id)
    }

    pub fn has_text_element(&self, id: &str) -> bool {
        self.text_elements.iter().any(|e| e.id == id)
    }

    /// Chip label of a colorable element; falls back to the raw id.
    pub fn color_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.color_elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
            .unwrap_or(id)
    }

    pub fn text_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.text_elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
            .unwrap_or(id)
    }

    pub fn text_prompt<'a>(&'a self, id: &'a str) -> &'a str {
        self.text_elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.prompt.as_str())
            .unwrap_or(id)
    }

    /// Display label of a layout variant; falls back to the raw variant id.
    pub fn layout_label<'a>(&'a self, variant: &'a str) -> &'a str {
        self.layouts
            .iter()
            .find(|l| l.id == variant)
            .map(|l| l.label.as_str())
            .unwrap_or(variant)
    }

    pub fn layout_labels(&self) -> Vec<String> {
        self.layouts.iter().map(|l| l.label.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static CONFIGS: OnceLock<HashMap<SectionKind, SectionConfig>> = OnceLock::new();

/// Configuration of a section kind.
pub fn section_config(kind: SectionKind) -> &'static SectionConfig {
    let configs = CONFIGS.get_or_init(load_configs);
    configs
        .get(&kind)
        .expect("every section kind has a configuration entry")
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

fn load_configs() -> HashMap<SectionKind, SectionConfig> {
    let yaml_str = std::fs::read_to_string("data/assistant/sections.yaml")
        .ok()
        .unwrap_or_else(|| EMBEDDED_SECTIONS.to_string());

    parse_configs(&yaml_str).unwrap_or_else(|e| {
        eprintln!(
            "WARN: failed to parse sections.yaml from disk ({}), using embedded",
            e
        );
        parse_configs(EMBEDDED_SECTIONS).expect("embedded sections.yaml must parse")
    })
}

fn parse_configs(yaml_str: &str) -> Result<HashMap<SectionKind, SectionConfig>, String> {
    let raw: SectionsYaml =
        serde_yaml::from_str(yaml_str).map_err(|e| format!("YAML parse error: {}", e))?;

    let mut configs = HashMap::new();
    for (key, entry) in raw.sections {
        let kind = SectionKind::parse(&key)
            .ok_or_else(|| format!("unknown section kind in sections.yaml: {}", key))?;
        configs.insert(kind, build_config(kind, entry)?);
    }

    for kind in SectionKind::ALL {
        if !configs.contains_key(&kind) {
            return Err(format!("sections.yaml misses kind: {}", kind.as_str()));
        }
    }
    Ok(configs)
}

fn build_config(kind: SectionKind, entry: SectionEntry) -> Result<SectionConfig, String> {
    let item = match entry.item {
        Some(item) => {
            let item_kind = match item.kind.as_str() {
                "feature" => ItemKind::Feature,
                "step" => ItemKind::Step,
                "plan" => ItemKind::Plan,
                "faq" => ItemKind::Faq,
                other => return Err(format!("unknown item kind: {}", other)),
            };
            Some(ItemConfig {
                kind: item_kind,
                name: item.name,
                name_plural: item.name_plural,
                article: item.article,
                fields: item
                    .fields
                    .into_iter()
                    .map(|f| FieldInfo {
                        id: f.id,
                        prompt: f.prompt,
                    })
                    .collect(),
            })
        }
        None => None,
    };

    let next_section = match entry.next_section {
        Some(next) => Some(
            SectionKind::parse(&next)
                .ok_or_else(|| format!("unknown next_section: {}", next))?,
        ),
        None => None,
    };

    Ok(SectionConfig {
        kind,
        label: entry.label,
        has_button: entry.has_button,
        color_elements: entry
            .color_elements
            .into_iter()
            .map(|e| ElementInfo {
                id: e.id,
                label: e.label,
            })
            .collect(),
        text_elements: entry
            .text_elements
            .into_iter()
            .map(|e| TextElementInfo {
                id: e.id,
                label: e.label,
                prompt: e.prompt,
            })
            .collect(),
        layouts: entry
            .layouts
            .into_iter()
            .map(|l| LayoutInfo {
                id: l.id,
                label: l.label,
                keywords: l.keywords,
            })
            .collect(),
        next_section,
        item,
        tips: entry
            .tips
            .into_iter()
            .map(|t| TipInfo {
                when: t.when,
                text: t.text,
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
