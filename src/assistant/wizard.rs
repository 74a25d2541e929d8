//! Add/delete item wizard — the nested multi-turn flow of the interpreter.
//!
//! Add steps through the section kind's ordered field list one message at a
//! time; delete resolves an index then always asks for confirmation, echoing
//! the item's display label. A negative reply cancels the wizard at any step.

use serde_json::json;

use crate::assistant::detect::{detect_color, detect_icon, detect_number};
use crate::assistant::sections::SectionConfig;
use crate::assistant::suggest::{clean_suggestions, smart_suggestions, CHIP_PERFECT};
use crate::assistant::vocab::{vocab, SynonymGroup};
use crate::assistant::{Flow, InterpreterContext, TurnResult, WizardState};
use crate::site::Section;
use crate::store::SectionStore;

/// Fallback icon when detection finds nothing.
const DEFAULT_ICON: &str = "Star";
/// Fallback item color when detection finds nothing.
const DEFAULT_ITEM_COLOR: &str = "#A78BFA";

/// Resolve a user-facing ordinal to a 0-based index. -1 means "the last".
pub(crate) fn resolve_index(n: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if n == -1 {
        return Some(len - 1);
    }
    if n >= 1 && (n as usize) <= len {
        return Some(n as usize - 1);
    }
    None
}

/// "La dernière" / "Le dernier" chip, gender-agreed with the item name.
pub(crate) fn last_item_chip(feminine: bool) -> &'static str {
    if feminine {
        "La dernière"
    } else {
        "Le dernier"
    }
}

/// Run one wizard turn. `ctx.flow` has already been taken; this puts it back
/// when the wizard continues.
pub(crate) fn handle(
    msg: &str,
    original: &str,
    state: WizardState,
    config: &SectionConfig,
    section: &Section,
    active: &str,
    store: &mut dyn SectionStore,
    mut ctx: InterpreterContext,
) -> TurnResult {
    let v = vocab();
    let mod_count = ctx.modification_count;

    if v.matches(msg, SynonymGroup::Negative) {
        return TurnResult::ok("↩️ Annulé !", ctx)
            .suggestions(smart_suggestions(config, Some(section), mod_count));
    }

    let Some(item_cfg) = &config.item else {
        // A wizard flow on an item-less section is stale state; drop it.
        return TurnResult::fail("🤔 Perdu...", ctx)
            .suggestions(smart_suggestions(config, Some(section), mod_count));
    };

    match state {
        WizardState::Add { step, mut data } => {
            let Some(field) = item_cfg.fields.get(step) else {
                return TurnResult::fail("🤔 Perdu...", ctx)
                    .suggestions(smart_suggestions(config, Some(section), mod_count));
            };

            match field.id.as_str() {
                "icon" => {
                    let icon = detect_icon(msg)
                        .map(|i| i.name.clone())
                        .unwrap_or_else(|| DEFAULT_ICON.to_string());
                    data.insert("icon".to_string(), json!(icon));
                }
                "color" => {
                    let color = detect_color(msg)
                        .map(|c| c.hex)
                        .unwrap_or_else(|| DEFAULT_ITEM_COLOR.to_string());
                    data.insert("color".to_string(), json!(color));
                }
                _ => {
                    data.insert(field.id.clone(), json!(original));
                }
            }

            if step + 1 < item_cfg.fields.len() {
                let next = &item_cfg.fields[step + 1];
                let chips: Vec<String> = match next.id.as_str() {
                    "icon" => v.icons.iter().take(4).map(|i| i.label.clone()).collect(),
                    "color" => ["Rose", "Violet", "Bleu", "Vert"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    _ => Vec::new(),
                };
                let prompt = next.prompt.clone();
                ctx.flow = Some(Flow::ItemWizard(WizardState::Add {
                    step: step + 1,
                    data,
                }));
                return TurnResult::ok(format!("✓ OK !\n\n{}", prompt), ctx).suggestions(chips);
            }

            store.add_item(active, &data);
            let added = if item_cfg.feminine() {
                "ajoutée"
            } else {
                "ajouté"
            };
            TurnResult::ok(format!("✨ {} {} !", item_cfg.name, added), ctx)
                .suggestions(clean_suggestions(vec![
                    format!("Ajouter {}", item_cfg.with_article()),
                    CHIP_PERFECT.to_string(),
                ]))
                .toast("➕ Ajouté !")
                .counted()
        }

        WizardState::ChooseItem => {
            if let Some(n) = detect_number(msg) {
                if let Some(index) = resolve_index(n, section.items.len()) {
                    let label = section.items[index].display_label().to_string();
                    ctx.flow = Some(Flow::ItemWizard(WizardState::ConfirmDelete { index }));
                    return TurnResult::ok(format!("🗑️ Supprimer \"{}\" ?", label), ctx)
                        .suggestions(vec!["✓ Oui".to_string(), "✕ Non".to_string()]);
                }
            }
            // Invalid or missing index: re-prompt, wizard stays armed.
            let which = if item_cfg.feminine() {
                "Laquelle ?"
            } else {
                "Lequel ?"
            };
            let mut chips = vec![last_item_chip(item_cfg.feminine()).to_string()];
            for i in 0..section.items.len().min(3) {
                chips.push((i + 1).to_string());
            }
            ctx.flow = Some(Flow::ItemWizard(WizardState::ChooseItem));
            TurnResult::fail(format!("🤔 {}", which), ctx).suggestions(chips)
        }

        WizardState::ConfirmDelete { index } => {
            if v.matches(msg, SynonymGroup::Affirmative) {
                store.remove_item(active, index);
                return TurnResult::ok("🗑️ Supprimé !", ctx)
                    .suggestions(smart_suggestions(config, Some(section), mod_count))
                    .toast("🗑️ Supprimé")
                    .counted();
            }
            TurnResult::ok("👍 OK, on garde !", ctx)
                .suggestions(smart_suggestions(config, Some(section), mod_count))
        }
    }
}
