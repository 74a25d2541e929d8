//! Action runner — executes pre-structured action batches.
//!
//! This is the entry point for a caller that already holds structured
//! actions (e.g. parsed from an external assistant backend's reply) instead
//! of free text. Actions run in order; a failing action is recorded and the
//! batch continues — no short-circuit. Both this runner and the turn
//! processor converge on the same [`SectionStore`] mutators.
//!
//! [`SectionStore`]: crate::store::SectionStore

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::site::{ItemKind, ItemSeed, LayoutPatch, Spacing, Theme};
use crate::store::SectionStore;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One action in the loose `{action, ...params}` wire shape. All parameters
/// are optional at the type level; each kind validates its own requirements
/// so that a malformed action yields a per-action error, not a parse
/// failure of the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: String,
    pub element: Option<String>,
    pub color: Option<String>,
    pub variant: Option<String>,
    pub spacing: Option<String>,
    pub field: Option<String>,
    pub value: Option<String>,
    pub theme_id: Option<String>,
    pub item: Option<serde_json::Value>,
    pub index: Option<usize>,
    pub updates: Option<serde_json::Value>,
}

/// Per-action outcome: the applied parameters on success, the error message
/// otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub action: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// True only when every action succeeded.
    pub success: bool,
    pub executed: usize,
    pub errors: usize,
    pub results: Vec<ActionResult>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no active section")]
    NoActiveSection,

    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("missing parameter: {0}")]
    MissingParam(&'static str),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid spacing: {0}")]
    InvalidSpacing(String),

    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    #[error("section kind has no item collection: {0}")]
    NoCollection(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Execution context of a batch: the target section and the store surface,
/// plus the presentation hook fired after successful non-theme actions.
pub struct RunnerContext<'a> {
    pub active_section: Option<String>,
    pub store: &'a mut dyn SectionStore,
    /// Called with the section id to visually highlight after a mutation.
    pub on_highlight: Option<&'a mut dyn FnMut(&str)>,
}

/// Run a batch of actions in order, continuing past failures.
pub fn run_actions(actions: &[ActionRequest], ctx: &mut RunnerContext<'_>) -> BatchResult {
    let mut results = Vec::with_capacity(actions.len());
    let mut executed = 0;
    let mut errors = 0;

    for action in actions {
        match execute_action(action, ctx) {
            Ok(detail) => {
                results.push(ActionResult {
                    action: action.action.clone(),
                    success: true,
                    detail: Some(detail),
                    error: None,
                });
                executed += 1;
                if action.action != "setTheme" {
                    if let (Some(active), Some(highlight)) =
                        (ctx.active_section.clone(), ctx.on_highlight.as_mut())
                    {
                        highlight(&active);
                    }
                }
            }
            Err(e) => {
                results.push(ActionResult {
                    action: action.action.clone(),
                    success: false,
                    detail: None,
                    error: Some(e.to_string()),
                });
                errors += 1;
            }
        }
    }

    BatchResult {
        success: errors == 0,
        executed,
        errors,
        results,
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn require<'a, T>(value: &'a Option<T>, name: &'static str) -> Result<&'a T, ActionError> {
    value.as_ref().ok_or(ActionError::MissingParam(name))
}

fn active_section(ctx: &RunnerContext<'_>) -> Result<String, ActionError> {
    ctx.active_section
        .clone()
        .ok_or(ActionError::NoActiveSection)
}

/// The item kind of the active section, for item actions.
fn active_item_kind(ctx: &RunnerContext<'_>, active: &str) -> Result<ItemKind, ActionError> {
    let section = ctx
        .store
        .get_section(active)
        .ok_or_else(|| ActionError::SectionNotFound(active.to_string()))?;
    ItemKind::for_section(section.kind)
        .ok_or_else(|| ActionError::NoCollection(section.kind.as_str().to_string()))
}

fn as_seed(value: &serde_json::Value, name: &'static str) -> Result<ItemSeed, ActionError> {
    value
        .as_object()
        .cloned()
        .ok_or(ActionError::MissingParam(name))
}

fn execute_action(
    action: &ActionRequest,
    ctx: &mut RunnerContext<'_>,
) -> Result<serde_json::Value, ActionError> {
    match action.action.as_str() {
        "updateColor" => {
            let active = active_section(ctx)?;
            let element = require(&action.element, "element")?;
            let color = require(&action.color, "color")?;
            if !is_hex_color(color) {
                return Err(ActionError::InvalidColor(color.clone()));
            }
            ctx.store.update_section_color(&active, element, color);
            Ok(json!({ "element": element, "color": color }))
        }

        "updateLayout" => {
            let active = active_section(ctx)?;
            let variant = require(&action.variant, "variant")?;
            if variant.is_empty() {
                return Err(ActionError::MissingParam("variant"));
            }
            // No cross-check against the kind's allowed set: the store is
            // trusted to accept or ignore.
            ctx.store.update_layout(&active, LayoutPatch::variant(variant));
            Ok(json!({ "variant": variant }))
        }

        "updateSpacing" => {
            let active = active_section(ctx)?;
            let spacing = require(&action.spacing, "spacing")?;
            let parsed = Spacing::parse(spacing)
                .ok_or_else(|| ActionError::InvalidSpacing(spacing.clone()))?;
            ctx.store.update_layout(&active, LayoutPatch::spacing(parsed));
            Ok(json!({ "spacing": spacing }))
        }

        "updateContent" => {
            let active = active_section(ctx)?;
            let field = require(&action.field, "field")?;
            if field.is_empty() {
                return Err(ActionError::MissingParam("field"));
            }
            let value = action.value.as_deref().unwrap_or("");
            ctx.store.update_content(&active, field, value);
            Ok(json!({ "field": field, "value": value }))
        }

        "setTheme" => {
            let theme_id = require(&action.theme_id, "themeId")?;
            let theme = Theme::parse(theme_id)
                .ok_or_else(|| ActionError::InvalidTheme(theme_id.clone()))?;
            ctx.store.set_theme(theme);
            Ok(json!({ "themeId": theme_id }))
        }

        "addItem" => {
            let active = active_section(ctx)?;
            let kind = active_item_kind(ctx, &active)?;
            let item = require(&action.item, "item")?;
            let seed = as_seed(item, "item")?;
            ctx.store.add_item(&active, &seed);
            Ok(json!({ "collection": kind.collection_key(), "item": item }))
        }

        "updateItem" => {
            let active = active_section(ctx)?;
            let kind = active_item_kind(ctx, &active)?;
            let index = *require(&action.index, "index")?;
            let updates = require(&action.updates, "updates")?;
            let patch = as_seed(updates, "updates")?;
            // Out-of-range indexes are a store-level no-op, not an error.
            ctx.store.update_item(&active, index, &patch);
            Ok(json!({ "collection": kind.collection_key(), "index": index, "updates": updates }))
        }

        "removeItem" => {
            let active = active_section(ctx)?;
            let kind = active_item_kind(ctx, &active)?;
            let index = *require(&action.index, "index")?;
            ctx.store.remove_item(&active, index);
            Ok(json!({ "collection": kind.collection_key(), "index": index }))
        }

        other => Err(ActionError::UnknownAction(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
