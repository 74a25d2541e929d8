//! Site data model: sections, layouts, themes and the item union.
//!
//! A site is an ordered set of typed sections (hero, features, steps,
//! pricing, FAQ). Each section carries free-form `content` fields, a layout
//! (variant + spacing), a sparse `colors` map (absent entries fall back to
//! the theme) and, for item-bearing kinds, a collection of items.
//!
//! Items are a tagged union — one variant per owning section kind — with the
//! collection key, display label, default synthesis and patch application
//! implemented per kind rather than as scattered type-string checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A loose bag of item field values, as collected by the add-item wizard or
/// received from a structured action batch.
pub type ItemSeed = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Section kinds
// ---------------------------------------------------------------------------

/// The closed set of section types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Hero,
    Features,
    HowItWorks,
    Pricing,
    Faq,
}

impl SectionKind {
    /// All kinds, in canonical page order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Hero,
        SectionKind::Features,
        SectionKind::HowItWorks,
        SectionKind::Pricing,
        SectionKind::Faq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Features => "features",
            SectionKind::HowItWorks => "howItWorks",
            SectionKind::Pricing => "pricing",
            SectionKind::Faq => "faq",
        }
    }

    pub fn parse(s: &str) -> Option<SectionKind> {
        match s {
            "hero" => Some(SectionKind::Hero),
            "features" => Some(SectionKind::Features),
            "howItWorks" => Some(SectionKind::HowItWorks),
            "pricing" => Some(SectionKind::Pricing),
            "faq" => Some(SectionKind::Faq),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Vertical spacing of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Normal,
    Spacious,
}

impl Spacing {
    pub fn parse(s: &str) -> Option<Spacing> {
        match s {
            "compact" => Some(Spacing::Compact),
            "normal" => Some(Spacing::Normal),
            "spacious" => Some(Spacing::Spacious),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Spacing::Compact => "compact",
            Spacing::Normal => "normal",
            Spacing::Spacious => "spacious",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Layout variant id, scoped to the section kind ("grid-3", "centered"…).
    /// The store does not cross-check it against the kind's allowed set.
    pub variant: String,
    pub spacing: Spacing,
}

impl Layout {
    pub fn new(variant: &str) -> Self {
        Layout {
            variant: variant.to_string(),
            spacing: Spacing::Normal,
        }
    }
}

/// A partial layout update: only the present fields are written.
#[derive(Debug, Clone, Default)]
pub struct LayoutPatch {
    pub variant: Option<String>,
    pub spacing: Option<Spacing>,
}

impl LayoutPatch {
    pub fn variant(v: &str) -> Self {
        LayoutPatch {
            variant: Some(v.to_string()),
            spacing: None,
        }
    }

    pub fn spacing(s: Spacing) -> Self {
        LayoutPatch {
            variant: None,
            spacing: Some(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// The fixed set of site-wide themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Aurora,
    Corporate,
    Pastel,
    Neon,
    Minimal,
}

/// Preview palette of a theme: page background plus three accents.
#[derive(Debug, Clone, Copy)]
pub struct ThemePreview {
    pub background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub tertiary: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Aurora,
        Theme::Corporate,
        Theme::Pastel,
        Theme::Neon,
        Theme::Minimal,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Theme::Aurora => "aurora",
            Theme::Corporate => "corporate",
            Theme::Pastel => "pastel",
            Theme::Neon => "neon",
            Theme::Minimal => "minimal",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Aurora => "Aurora",
            Theme::Corporate => "Corporate",
            Theme::Pastel => "Pastel",
            Theme::Neon => "Néon",
            Theme::Minimal => "Minimal",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "aurora" => Some(Theme::Aurora),
            "corporate" => Some(Theme::Corporate),
            "pastel" => Some(Theme::Pastel),
            "neon" => Some(Theme::Neon),
            "minimal" => Some(Theme::Minimal),
            _ => None,
        }
    }

    pub fn preview(self) -> ThemePreview {
        match self {
            Theme::Aurora => ThemePreview {
                background: "#0a0a0f",
                primary: "#A78BFA",
                secondary: "#F472B6",
                tertiary: "#22D3EE",
            },
            Theme::Corporate => ThemePreview {
                background: "#0f172a",
                primary: "#3B82F6",
                secondary: "#06B6D4",
                tertiary: "#8B5CF6",
            },
            Theme::Pastel => ThemePreview {
                background: "#FDF2F8",
                primary: "#F472B6",
                secondary: "#A78BFA",
                tertiary: "#34D399",
            },
            Theme::Neon => ThemePreview {
                background: "#030712",
                primary: "#22D3EE",
                secondary: "#84CC16",
                tertiary: "#F472B6",
            },
            Theme::Minimal => ThemePreview {
                background: "#FFFFFF",
                primary: "#111827",
                secondary: "#6B7280",
                tertiary: "#9CA3AF",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Which item union variant a section kind owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Feature,
    Step,
    Plan,
    Faq,
}

impl ItemKind {
    /// The collection key of this kind in the exported site JSON.
    pub fn collection_key(self) -> &'static str {
        match self {
            ItemKind::Feature => "items",
            ItemKind::Step => "steps",
            ItemKind::Plan => "plans",
            ItemKind::Faq => "items",
        }
    }

    /// The field that serves as an item's display label.
    pub fn label_field(self) -> &'static str {
        match self {
            ItemKind::Feature => "title",
            ItemKind::Step => "title",
            ItemKind::Plan => "name",
            ItemKind::Faq => "question",
        }
    }

    /// The item kind a section kind owns, if any.
    pub fn for_section(kind: SectionKind) -> Option<ItemKind> {
        match kind {
            SectionKind::Hero => None,
            SectionKind::Features => Some(ItemKind::Feature),
            SectionKind::HowItWorks => Some(ItemKind::Step),
            SectionKind::Pricing => Some(ItemKind::Plan),
            SectionKind::Faq => Some(ItemKind::Faq),
        }
    }
}

/// A repeatable sub-entity of a section. Untagged on the wire — the variants
/// are distinguished by their field sets, matching the exported site JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Plan {
        id: String,
        name: String,
        price: String,
        period: String,
        description: String,
        features: Vec<String>,
        cta: String,
        highlighted: bool,
        badge: String,
    },
    Feature {
        id: String,
        icon: String,
        color: String,
        title: String,
        description: String,
    },
    Step {
        id: String,
        number: u32,
        title: String,
        description: String,
    },
    Faq {
        id: String,
        question: String,
        answer: String,
    },
}

fn seed_str<'a>(seed: &'a ItemSeed, key: &str) -> Option<&'a str> {
    seed.get(key).and_then(|v| v.as_str())
}

fn seed_string(seed: &ItemSeed, key: &str, default: &str) -> String {
    seed_str(seed, key).unwrap_or(default).to_string()
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Feature { id, .. }
            | Item::Step { id, .. }
            | Item::Plan { id, .. }
            | Item::Faq { id, .. } => id,
        }
    }

    /// The label shown when an item is echoed back to the user
    /// (title / name / question, depending on the kind).
    pub fn display_label(&self) -> &str {
        match self {
            Item::Feature { title, .. } => title,
            Item::Step { title, .. } => title,
            Item::Plan { name, .. } => name,
            Item::Faq { question, .. } => question,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Feature { .. } => ItemKind::Feature,
            Item::Step { .. } => ItemKind::Step,
            Item::Plan { .. } => ItemKind::Plan,
            Item::Faq { .. } => ItemKind::Faq,
        }
    }

    /// Build an item of the given kind from a loose seed, filling defaults
    /// for absent fields. `position` is the 0-based index the item will take
    /// in its collection (used to number steps).
    pub fn synthesize(kind: ItemKind, id: String, seed: &ItemSeed, position: usize) -> Item {
        match kind {
            ItemKind::Feature => Item::Feature {
                id,
                icon: seed_string(seed, "icon", "Star"),
                color: seed_string(seed, "color", "#A78BFA"),
                title: seed_string(seed, "title", "Feature"),
                description: seed_string(seed, "description", "Description"),
            },
            ItemKind::Step => Item::Step {
                id,
                number: seed
                    .get("number")
                    .and_then(|v| v.as_u64())
                    .map(|n| n as u32)
                    .unwrap_or(position as u32 + 1),
                title: seed_string(seed, "title", "Étape"),
                description: seed_string(seed, "description", "Description"),
            },
            ItemKind::Plan => Item::Plan {
                id,
                name: seed_string(seed, "name", "Plan"),
                price: seed_string(seed, "price", "9€"),
                period: seed_string(seed, "period", "/mois"),
                description: seed_string(seed, "description", "Description"),
                features: seed
                    .get("features")
                    .and_then(|v| v.as_array())
                    .map(|a| {
                        a.iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
                cta: seed_string(seed, "cta", "Choisir"),
                highlighted: seed
                    .get("highlighted")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                badge: seed_string(seed, "badge", ""),
            },
            ItemKind::Faq => Item::Faq {
                id,
                question: seed_string(seed, "question", "Question ?"),
                answer: seed_string(seed, "answer", "Réponse"),
            },
        }
    }

    /// Apply a partial update. Unknown fields are ignored; the id is never
    /// touched.
    pub fn apply_patch(&mut self, patch: &ItemSeed) {
        fn set(dst: &mut String, patch: &ItemSeed, key: &str) {
            if let Some(v) = seed_str(patch, key) {
                *dst = v.to_string();
            }
        }
        match self {
            Item::Feature {
                icon,
                color,
                title,
                description,
                ..
            } => {
                set(icon, patch, "icon");
                set(color, patch, "color");
                set(title, patch, "title");
                set(description, patch, "description");
            }
            Item::Step {
                number,
                title,
                description,
                ..
            } => {
                if let Some(n) = patch.get("number").and_then(|v| v.as_u64()) {
                    *number = n as u32;
                }
                set(title, patch, "title");
                set(description, patch, "description");
            }
            Item::Plan {
                name,
                price,
                period,
                description,
                features,
                cta,
                highlighted,
                badge,
                ..
            } => {
                set(name, patch, "name");
                set(price, patch, "price");
                set(period, patch, "period");
                set(description, patch, "description");
                set(cta, patch, "cta");
                set(badge, patch, "badge");
                if let Some(b) = patch.get("highlighted").and_then(|v| v.as_bool()) {
                    *highlighted = b;
                }
                if let Some(a) = patch.get("features").and_then(|v| v.as_array()) {
                    *features = a
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect();
                }
            }
            Item::Faq {
                question, answer, ..
            } => {
                set(question, patch, "question");
                set(answer, patch, "answer");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sections and the site
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub content: HashMap<String, String>,
    pub layout: Layout,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn content_field(&self, field: &str) -> Option<&str> {
        self.content.get(field).map(String::as_str)
    }

    pub fn color(&self, element: &str) -> Option<&str> {
        self.colors.get(element).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub name: String,
    pub theme: Theme,
    pub sections_order: Vec<String>,
    pub sections: HashMap<String, Section>,
}

fn content(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Site {
    /// The seed site every new project starts from.
    pub fn default_site() -> Site {
        let mut sections = HashMap::new();

        sections.insert(
            "hero".to_string(),
            Section {
                id: "hero".to_string(),
                kind: SectionKind::Hero,
                content: content(&[
                    ("badge", "✨ Nouveau"),
                    ("title", "Crée ta landing page parfaite en quelques clics"),
                    ("titleHighlight", "parfaite"),
                    (
                        "subtitle",
                        "Un éditeur visuel intuitif avec une assistante locale pour créer des pages qui convertissent.",
                    ),
                    ("ctaPrimary", "Commencer gratuitement"),
                    ("ctaSecondary", "Voir la démo"),
                ]),
                layout: Layout::new("centered"),
                colors: content(&[
                    ("title", "#FFFFFF"),
                    ("subtitle", "#9CA3AF"),
                    ("badge", "#A78BFA"),
                    ("ctaPrimary", "#A78BFA"),
                    ("ctaSecondary", "#FFFFFF"),
                ]),
                items: Vec::new(),
            },
        );

        sections.insert(
            "features".to_string(),
            Section {
                id: "features".to_string(),
                kind: SectionKind::Features,
                content: content(&[
                    ("title", "Tout ce dont tu as besoin"),
                    ("subtitle", "Des outils puissants pour créer sans limites"),
                ]),
                layout: Layout::new("grid-3"),
                colors: content(&[("title", "#FFFFFF"), ("subtitle", "#9CA3AF")]),
                items: vec![
                    feature("f1", "Zap", "#FBBF24", "Ultra rapide", "Performance optimisée"),
                    feature("f2", "Sparkles", "#A78BFA", "Assistant intégré", "L'assistante t'aide"),
                    feature("f3", "Palette", "#F472B6", "Personnalisable", "Thèmes et couleurs"),
                    feature("f4", "Shield", "#34D399", "Sécurisé", "Données protégées"),
                    feature("f5", "Smartphone", "#22D3EE", "Responsive", "Mobile-first"),
                    feature("f6", "TrendingUp", "#FB923C", "Analytics", "Stats en temps réel"),
                ],
            },
        );

        sections.insert(
            "howItWorks".to_string(),
            Section {
                id: "howItWorks".to_string(),
                kind: SectionKind::HowItWorks,
                content: content(&[
                    ("title", "Comment ça marche ?"),
                    ("subtitle", "En 3 étapes simples"),
                ]),
                layout: Layout::new("timeline"),
                colors: content(&[("title", "#FFFFFF"), ("subtitle", "#9CA3AF")]),
                items: vec![
                    step("s1", 1, "Choisis un template", "Parcours notre collection"),
                    step("s2", 2, "Personnalise", "Adapte à ta marque"),
                    step("s3", 3, "Publie", "En un clic"),
                ],
            },
        );

        sections.insert(
            "pricing".to_string(),
            Section {
                id: "pricing".to_string(),
                kind: SectionKind::Pricing,
                content: content(&[
                    ("title", "Tarifs simples"),
                    ("subtitle", "Choisis le plan qui te convient"),
                ]),
                layout: Layout::new("cards"),
                colors: content(&[("title", "#FFFFFF"), ("subtitle", "#9CA3AF")]),
                items: vec![
                    Item::Plan {
                        id: "p1".to_string(),
                        name: "Starter".to_string(),
                        price: "Gratuit".to_string(),
                        period: String::new(),
                        description: "Pour commencer".to_string(),
                        features: vec![
                            "1 page".to_string(),
                            "Templates de base".to_string(),
                            "Support email".to_string(),
                        ],
                        cta: "Commencer".to_string(),
                        highlighted: false,
                        badge: String::new(),
                    },
                    Item::Plan {
                        id: "p2".to_string(),
                        name: "Pro".to_string(),
                        price: "19€".to_string(),
                        period: "/mois".to_string(),
                        description: "Pour les pros".to_string(),
                        features: vec![
                            "Pages illimitées".to_string(),
                            "Tous les templates".to_string(),
                            "Support prioritaire".to_string(),
                            "Analytics".to_string(),
                            "Domaine custom".to_string(),
                        ],
                        cta: "Essai gratuit".to_string(),
                        highlighted: true,
                        badge: "Populaire".to_string(),
                    },
                    Item::Plan {
                        id: "p3".to_string(),
                        name: "Business".to_string(),
                        price: "49€".to_string(),
                        period: "/mois".to_string(),
                        description: "Pour les équipes".to_string(),
                        features: vec![
                            "Tout Pro +".to_string(),
                            "Multi-utilisateurs".to_string(),
                            "API access".to_string(),
                            "SLA garanti".to_string(),
                        ],
                        cta: "Contacter".to_string(),
                        highlighted: false,
                        badge: String::new(),
                    },
                ],
            },
        );

        sections.insert(
            "faq".to_string(),
            Section {
                id: "faq".to_string(),
                kind: SectionKind::Faq,
                content: content(&[
                    ("title", "Questions fréquentes"),
                    ("subtitle", "Trouve ta réponse"),
                ]),
                layout: Layout::new("accordion"),
                colors: content(&[("title", "#FFFFFF"), ("subtitle", "#9CA3AF")]),
                items: vec![
                    faq("q1", "Est-ce vraiment gratuit ?", "Oui ! Le plan Starter est 100% gratuit."),
                    faq("q2", "Puis-je utiliser mon domaine ?", "Oui, avec les plans Pro et Business."),
                    faq("q3", "Y a-t-il un engagement ?", "Non, tu peux annuler à tout moment."),
                ],
            },
        );

        Site {
            name: "Mon Super Site".to_string(),
            theme: Theme::Aurora,
            sections_order: SectionKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            sections,
        }
    }
}

fn feature(id: &str, icon: &str, color: &str, title: &str, description: &str) -> Item {
    Item::Feature {
        id: id.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn step(id: &str, number: u32, title: &str, description: &str) -> Item {
    Item::Step {
        id: id.to_string(),
        number,
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn faq(id: &str, question: &str, answer: &str) -> Item {
    Item::Faq {
        id: id.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
