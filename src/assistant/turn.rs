//! Turn processor — the per-message state machine of the local assistant.
//!
//! Given the raw message and the conversational context, decides which of
//! the mutually exclusive interaction modes applies, performs at most one
//! state transition plus its store mutations, and returns the reply, the
//! suggestion chips, the updated context and the side-effect flags.
//!
//! Modes are checked in strict priority order; the first applicable one
//! consumes the turn. A pending flow whose trigger keywords don't match
//! falls through to the direct-command modes with the flow preserved,
//! unless a later mode replaces it.

use serde_json::json;

use crate::assistant::detect::{detect_color, detect_element, detect_layout, detect_number};
use crate::assistant::sections::{section_config, SectionConfig};
use crate::assistant::suggest::{clean_suggestions, smart_suggestions, CHIP_HELP, CHIP_PERFECT};
use crate::assistant::vocab::{vocab, SynonymGroup};
use crate::assistant::{
    wizard, Flow, InterpreterContext, TurnOptions, TurnResult, UiAction, WizardState,
};
use crate::site::{ItemSeed, LayoutPatch, Section, SectionKind};
use crate::store::SectionStore;

/// Chips offered while a color preview awaits confirmation.
fn color_confirm_chips() -> Vec<String> {
    ["✓ Valider", "✕ Annuler", "Rose", "Violet", "Bleu"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Chips offered while a layout preview awaits confirmation.
fn layout_confirm_chips(config: &SectionConfig) -> Vec<String> {
    let mut chips = config.layout_labels();
    chips.push("✓ Valider".to_string());
    chips.push("✕ Annuler".to_string());
    clean_suggestions(chips)
}

/// Process one chat message with default options.
pub fn process_turn(
    message: &str,
    context: &InterpreterContext,
    store: &mut dyn SectionStore,
) -> TurnResult {
    process_turn_with(message, context, store, &TurnOptions::default())
}

/// Process one chat message against the section the context points at.
///
/// The caller persists `TurnResult::context` and feeds it back on the next
/// turn, bumping `modification_count` when `increment_mod_count` is set.
pub fn process_turn_with(
    message: &str,
    context: &InterpreterContext,
    store: &mut dyn SectionStore,
    options: &TurnOptions,
) -> TurnResult {
    let original = message.trim();
    let msg = original.to_lowercase();
    let v = vocab();
    let mut ctx = context.clone();

    // Guard: nothing is selected — nothing to command.
    let Some(active) = ctx.active_section.clone() else {
        let chips = SectionKind::ALL
            .iter()
            .map(|k| section_config(*k).label.clone())
            .collect();
        return TurnResult::fail("👋 Sélectionne une section pour commencer !", ctx)
            .suggestions(chips);
    };
    let Some(section) = store.get_section(&active) else {
        return TurnResult::fail("🤔 Section introuvable...", ctx);
    };
    let config = section_config(section.kind);
    let mod_count = ctx.modification_count;
    let smart = |count: u32| smart_suggestions(config, Some(&section), count);

    // -----------------------------------------------------------------------
    // 1. Pending free-text edit — the whole message is the new value
    // -----------------------------------------------------------------------

    if let Some(Flow::TextEdit { element }) = ctx.flow.clone() {
        ctx.flow = None;
        if msg.contains("annuler") || msg == "annule" {
            return TurnResult::ok("↩️ Annulé !", ctx).suggestions(smart(mod_count));
        }
        store.update_content(&active, &element, original);
        let label = config.text_label(&element).to_string();
        let snippet: String = original.chars().take(50).collect();
        let ellipsis = if original.chars().count() > 50 { "..." } else { "" };
        ctx.last_subject = Some(element);
        return TurnResult::ok(
            format!("✨ {} mis à jour !\n\n\"{}{}\"", label, snippet, ellipsis),
            ctx,
        )
        .suggestions(smart(mod_count + 1))
        .toast(format!("✏️ {} modifié !", label))
        .counted();
    }

    // -----------------------------------------------------------------------
    // 2. Item wizard
    // -----------------------------------------------------------------------

    if let Some(Flow::ItemWizard(state)) = ctx.flow.clone() {
        ctx.flow = None;
        return wizard::handle(&msg, original, state, config, &section, &active, store, ctx);
    }

    // -----------------------------------------------------------------------
    // 3. Layout preview confirmation
    // -----------------------------------------------------------------------

    if let Some(Flow::LayoutPreview { original: rollback }) = ctx.flow.clone() {
        if v.matches(&msg, SynonymGroup::Affirmative) {
            ctx.flow = None;
            return TurnResult::ok("✨ Layout validé !", ctx)
                .suggestions(smart(mod_count + 1))
                .toast("📐 Layout appliqué !")
                .counted();
        }
        if v.matches(&msg, SynonymGroup::Negative) {
            if let Some(variant) = &rollback {
                store.update_layout(&active, LayoutPatch::variant(variant));
            }
            ctx.flow = None;
            return TurnResult::ok("↩️ Layout annulé !", ctx).suggestions(smart(mod_count));
        }
        if let Some(layout) = detect_layout(&msg, section.kind) {
            // Cycle to another variant without a chat message.
            store.update_layout(&active, LayoutPatch::variant(&layout.id));
            let mut result = TurnResult::ok("", ctx);
            result.silent_preview = true;
            return result;
        }
        // No preview keyword: fall through, preview still armed.
    }

    // -----------------------------------------------------------------------
    // 4. Color preview confirmation
    // -----------------------------------------------------------------------

    if let Some(Flow::ColorPreview { element, original: rollback }) = ctx.flow.clone() {
        if v.matches(&msg, SynonymGroup::Affirmative) {
            ctx.flow = None;
            ctx.last_subject = Some(element);
            return TurnResult::ok("✨ Couleur validée !", ctx)
                .suggestions(smart(mod_count + 1))
                .toast("🎨 Couleur appliquée !")
                .counted();
        }
        if v.matches(&msg, SynonymGroup::Negative) {
            if let Some(color) = &rollback {
                store.update_section_color(&active, &element, color);
            }
            ctx.flow = None;
            return TurnResult::ok("↩️ Couleur annulée !", ctx).suggestions(smart(mod_count));
        }
        if let Some(color) = detect_color(&msg) {
            store.update_section_color(&active, &element, &color.hex);
            let mut result = TurnResult::ok("", ctx);
            result.silent_preview = true;
            return result;
        }
    }

    // -----------------------------------------------------------------------
    // 5. Pending color-target selection ("Les couleurs" was asked)
    // -----------------------------------------------------------------------

    if let Some(Flow::ColorTarget { color: pending }) = ctx.flow.clone() {
        let named = detect_element(&msg).filter(|e| config.has_color_element(e));
        if let Some(element) = named {
            ctx.last_subject = Some(element.to_string());
            if let Some(color) = pending {
                // The color came first; attach it and preview.
                return apply_color_preview(&mut ctx, store, &active, &section, config, element, &color);
            }
            ctx.flow = Some(Flow::AwaitingColor {
                element: element.to_string(),
            });
            return TurnResult::ok(
                format!("🎨 Quelle couleur pour le {} ?", config.color_label(element)),
                ctx,
            )
            .suggestions(
                ["Rose", "Violet", "Bleu", "🎨 Palette"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            );
        }
        if let Some(color) = detect_color(&msg) {
            let chips = config
                .color_elements
                .iter()
                .map(|e| e.label.clone())
                .collect();
            ctx.flow = Some(Flow::ColorTarget {
                color: Some(color.clone()),
            });
            return TurnResult::ok(
                format!("🎨 {}, super choix !\n\nSur quel élément ?", color.name),
                ctx,
            )
            .suggestions(chips);
        }
        if v.matches(&msg, SynonymGroup::Negative) {
            ctx.flow = None;
            return TurnResult::ok("👍 OK !", ctx).suggestions(smart(mod_count));
        }
    }

    // -----------------------------------------------------------------------
    // 6. Pending element awaiting its color
    // -----------------------------------------------------------------------

    if let Some(Flow::AwaitingColor { element }) = ctx.flow.clone() {
        if let Some(color) = detect_color(&msg) {
            ctx.flow = None;
            return apply_color_preview(&mut ctx, store, &active, &section, config, &element, &color);
        }
        if msg.contains("palette") || msg.contains("plus") {
            // Flow stays armed; the palette modal will feed the color back.
            let mut result = TurnResult::ok("🎨 Palette ouverte !", ctx);
            result.open_palette = true;
            return result;
        }
        if v.matches(&msg, SynonymGroup::Negative) {
            ctx.flow = None;
            return TurnResult::ok("👍 OK !", ctx).suggestions(smart(mod_count));
        }
    }

    // -----------------------------------------------------------------------
    // Direct natural commands
    // -----------------------------------------------------------------------

    let has_change_verb = v.matches(&msg, SynonymGroup::Change);
    let element = detect_element(&msg);
    let color = detect_color(&msg);
    let layout = detect_layout(&msg, section.kind);

    // 7. Compound: "met le titre en rose" — all in one turn
    if has_change_verb {
        if let (Some(el), Some(c)) = (element, color.as_ref()) {
            if config.has_color_element(el) {
                ctx.last_subject = Some(el.to_string());
                return apply_color_preview(&mut ctx, store, &active, &section, config, el, c);
            }
        }
    }

    // 8. Direct layout: "passe en 3 colonnes"
    if let Some(layout) = &layout {
        let rollback = section.layout.variant.clone();
        store.update_layout(&active, LayoutPatch::variant(&layout.id));
        ctx.flow = Some(Flow::LayoutPreview {
            original: Some(rollback),
        });
        return TurnResult::ok(
            format!("📐 Layout \"{}\" !\n\n👀 Aperçu appliqué. Tu valides ?", layout.label),
            ctx,
        )
        .suggestions(layout_confirm_chips(config));
    }

    // 9. Color with no named element: reuse the last subject, or ask
    if let Some(c) = color.as_ref() {
        if element.is_none() {
            let subject = ctx
                .last_subject
                .clone()
                .filter(|s| config.has_color_element(s));
            if let Some(subject) = subject {
                return apply_color_preview(&mut ctx, store, &active, &section, config, &subject, c);
            }
            let chips = config
                .color_elements
                .iter()
                .map(|e| e.label.clone())
                .collect();
            ctx.flow = Some(Flow::ColorTarget {
                color: Some(c.clone()),
            });
            return TurnResult::ok(
                format!("🎨 {}, super choix !\n\nSur quel élément ?", c.name),
                ctx,
            )
            .suggestions(chips);
        }
    }

    // 10. Category "layout": show the current variant, arm a preview
    if v.matches(&msg, SynonymGroup::Layout) {
        let current = config.layout_label(&section.layout.variant).to_string();
        ctx.flow = Some(Flow::LayoutPreview {
            original: Some(section.layout.variant.clone()),
        });
        return TurnResult::ok(
            format!("📐 Layout actuel : {}\n\nClique pour tester, puis valide !", current),
            ctx,
        )
        .suggestions(layout_confirm_chips(config));
    }

    // 11. Category "colors": ask which element
    if v.matches(&msg, SynonymGroup::Colors) {
        let chips: Vec<String> = config
            .color_elements
            .iter()
            .take(4)
            .map(|e| e.label.clone())
            .collect();
        ctx.flow = Some(Flow::ColorTarget { color: None });
        return TurnResult::ok("🎨 Quel élément colorer ?", ctx).suggestions(chips);
    }

    // 12. Category "text": ask which field, clearing any stale color state
    if v.matches(&msg, SynonymGroup::Text) {
        let chips: Vec<String> = config
            .text_elements
            .iter()
            .take(4)
            .map(|e| e.label.clone())
            .collect();
        ctx.flow = None;
        return TurnResult::ok("✏️ Quel texte modifier ?", ctx).suggestions(chips);
    }

    // 13. Named text element, no competing color token
    if let Some(el) = element {
        if config.has_text_element(el) && color.is_none() {
            let current = section.content_field(el).unwrap_or("").to_string();
            let prompt = config.text_prompt(el).to_string();
            ctx.flow = Some(Flow::TextEdit {
                element: el.to_string(),
            });
            ctx.last_subject = Some(el.to_string());
            let mut result = TurnResult::ok(prompt, ctx);
            result.hint = Some(format!("💬 Actuel : \"{}\"", current));
            return result;
        }
    }

    // 14. Add item(s)
    if v.matches(&msg, SynonymGroup::Add) {
        if let Some(item_cfg) = &config.item {
            let count = detect_number(&msg).filter(|n| *n > 1);
            if let Some(n) = count {
                let count = (n as usize).min(options.max_batch_add);
                let existing = section.items.len();
                for i in 0..count {
                    let mut seed = ItemSeed::new();
                    seed.insert(
                        item_cfg.kind.label_field().to_string(),
                        json!(format!("{} {}", item_cfg.name, existing + i + 1)),
                    );
                    seed.insert("description".to_string(), json!("Description"));
                    store.add_item(&active, &seed);
                }
                let added = if item_cfg.feminine() { "ajoutées" } else { "ajoutés" };
                return TurnResult::ok(
                    format!("✨ {} {} {} !", count, item_cfg.name_plural, added),
                    ctx,
                )
                .suggestions(smart(mod_count + 1))
                .toast(format!("➕ {} {} !", count, added))
                .counted();
            }
            let first = &item_cfg.fields[0];
            let new_word = if item_cfg.feminine() { "Nouvelle" } else { "Nouveau" };
            let message = format!("➕ {} {} !\n\n{}", new_word, item_cfg.name, first.prompt);
            ctx.flow = Some(Flow::ItemWizard(WizardState::Add {
                step: 0,
                data: ItemSeed::new(),
            }));
            return TurnResult::ok(message, ctx);
        }
    }

    // 15. Remove item
    if v.matches(&msg, SynonymGroup::Delete) {
        if let Some(item_cfg) = &config.item {
            if section.items.is_empty() {
                return TurnResult::fail("🤷 Rien à supprimer !", ctx)
                    .suggestions(smart(mod_count));
            }
            if let Some(n) = detect_number(&msg) {
                if let Some(index) = wizard::resolve_index(n, section.items.len()) {
                    let label = section.items[index].display_label().to_string();
                    ctx.flow = Some(Flow::ItemWizard(WizardState::ConfirmDelete { index }));
                    return TurnResult::ok(format!("🗑️ Supprimer \"{}\" ?", label), ctx)
                        .suggestions(vec!["✓ Oui".to_string(), "✕ Non".to_string()]);
                }
            }
            let which = if item_cfg.feminine() { "Laquelle" } else { "Lequel" };
            let mut chips = vec![wizard::last_item_chip(item_cfg.feminine()).to_string()];
            for i in 0..section.items.len().min(3) {
                chips.push((i + 1).to_string());
            }
            ctx.flow = Some(Flow::ItemWizard(WizardState::ChooseItem));
            return TurnResult::ok(format!("🗑️ {} supprimer ?", which), ctx).suggestions(chips);
        }
    }

    // 16. Fixed commands: export, navigation, undo, help, small talk

    if msg.contains("export") || msg.contains("télécharger") || msg.contains("publier") {
        let mut result = TurnResult::ok("📤 C'est parti pour l'export !", ctx);
        result.ui = Some(UiAction::Export);
        return result;
    }

    if msg.contains("suivante") || msg.contains("next") || msg.contains("passer") {
        if let Some(next_kind) = config.next_section {
            let next_config = section_config(next_kind);
            let next_id = next_kind.as_str().to_string();
            let next_section = store.get_section(&next_id);
            let chips = smart_suggestions(next_config, next_section.as_ref(), 0);
            let mut result =
                TurnResult::ok(format!("➡️ Section {} !", next_config.label), ctx);
            result.ui = Some(UiAction::Navigate { to: next_id });
            result.suggestions = chips;
            return result;
        }
        return TurnResult::ok("🎉 Tu as tout fait ! Exporter ?", ctx).suggestions(vec![
            "Exporter".to_string(),
            "Hero".to_string(),
            CHIP_PERFECT.to_string(),
        ]);
    }

    if msg.contains("annule") || msg.contains("undo") || msg.contains("retour") {
        if store.can_undo() {
            store.undo();
            return TurnResult::ok("↩️ Annulé !", ctx)
                .suggestions(smart(mod_count))
                .toast("↩️ Annulé");
        }
        return TurnResult::fail("🤷 Rien à annuler !", ctx).suggestions(smart(mod_count));
    }

    if msg.contains("aide") || msg == "?" || msg.contains("help") {
        return TurnResult::ok(
            "💡 Je comprends plein de choses !\n\n\
             • \"Met le titre en rose\"\n\
             • \"Le layout\"\n\
             • \"Les couleurs\"\n\
             • \"Ajoute 3 features\"\n\
             • \"Supprime la dernière\"",
            ctx,
        )
        .suggestions(smart(mod_count));
    }

    if v.matches(&msg, SynonymGroup::Affirmative) {
        let acks = &v.acknowledgements;
        let ack = acks[ctx.satisfaction_count as usize % acks.len()].clone();
        ctx.satisfaction_count += 1;
        return TurnResult::ok(ack, ctx).suggestions(smart(mod_count));
    }

    if v.greetings.iter().any(|g| msg.starts_with(g.as_str())) {
        return TurnResult::ok(
            format!("Hey ! 🫧 On bosse sur {}\n\nQu'est-ce qu'on fait ?", config.label),
            ctx,
        )
        .suggestions(smart(mod_count));
    }

    // 17. Fallback — nothing matched; nothing advances
    let mut chips = vec![CHIP_HELP.to_string()];
    chips.extend(smart(mod_count).into_iter().take(3));
    TurnResult::fail(
        "🤔 J'ai pas compris...\n\n\
         Essaie :\n\
         • \"Met le titre en rose\"\n\
         • \"La disposition\"\n\
         • \"Les couleurs\"",
        ctx,
    )
    .suggestions(clean_suggestions(chips))
}

/// Write the color to the store and arm the preview-confirm flow. Shared by
/// the compound command, the last-subject ellipsis and both pending color
/// modes — the contract is always preview-then-confirm, never direct commit.
fn apply_color_preview(
    ctx: &mut InterpreterContext,
    store: &mut dyn SectionStore,
    active: &str,
    section: &Section,
    config: &SectionConfig,
    element: &str,
    color: &crate::assistant::NamedColor,
) -> TurnResult {
    let rollback = section.color(element).map(str::to_string);
    store.update_section_color(active, element, &color.hex);
    ctx.flow = Some(Flow::ColorPreview {
        element: element.to_string(),
        original: rollback,
    });
    TurnResult::ok(
        format!(
            "🎨 {} en {} !\n\n👀 Aperçu appliqué. Tu valides ?",
            config.color_label(element),
            color.name
        ),
        ctx.clone(),
    )
    .suggestions(color_confirm_chips())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
