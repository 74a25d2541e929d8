// ===========================================================================
// Multi-turn conversation tests: the interpreter driven end-to-end against
// the in-memory store, the way the editor UI drives it.
// ===========================================================================

use maquette::assistant::{process_turn, Flow, InterpreterContext, TurnResult, WizardState};
use maquette::store::{SectionStore, SiteStore};

/// Helper: run one turn and persist the returned context like the UI does
/// (including the modification-count bump).
fn advance(store: &mut SiteStore, ctx: &mut InterpreterContext, msg: &str) -> TurnResult {
    let result = process_turn(msg, ctx, store);
    *ctx = result.context.clone();
    if result.increment_mod_count {
        ctx.modification_count += 1;
    }
    result
}

fn title_color(store: &SiteStore, section: &str) -> Option<String> {
    store
        .get_section(section)
        .unwrap()
        .color("title")
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Compound direct command: "met le titre en rose"
// ---------------------------------------------------------------------------

#[test]
fn test_compound_command_previews_then_commits() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    let r1 = advance(&mut store, &mut ctx, "met le titre en rose");
    assert!(r1.success);
    assert!(
        matches!(&ctx.flow, Some(Flow::ColorPreview { element, .. }) if element == "title"),
        "expected color preview on title, got: {:?}",
        ctx.flow
    );
    assert_eq!(title_color(&store, "hero").as_deref(), Some("#F472B6"));

    let r2 = advance(&mut store, &mut ctx, "oui");
    assert!(r2.success);
    assert!(r2.increment_mod_count);
    assert_eq!(ctx.flow, None, "commit must clear preview flags");
    assert_eq!(ctx.modification_count, 1);
    assert_eq!(title_color(&store, "hero").as_deref(), Some("#F472B6"));
}

#[test]
fn test_color_preview_rollback_restores_original() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    let original = title_color(&store, "hero");

    advance(&mut store, &mut ctx, "met le titre en rose");
    assert_ne!(title_color(&store, "hero"), original);

    let r = advance(&mut store, &mut ctx, "non");
    assert!(r.success);
    assert_eq!(ctx.flow, None);
    assert_eq!(title_color(&store, "hero"), original);
}

// ---------------------------------------------------------------------------
// Layout preview round-trip
// ---------------------------------------------------------------------------

#[test]
fn test_layout_preview_roundtrip() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("features");
    assert_eq!(
        store.get_section("features").unwrap().layout.variant,
        "grid-3"
    );

    let r1 = advance(&mut store, &mut ctx, "passe en 2 colonnes");
    assert!(r1.success);
    assert_eq!(
        store.get_section("features").unwrap().layout.variant,
        "grid-2"
    );
    assert!(
        matches!(&ctx.flow, Some(Flow::LayoutPreview { original: Some(v) }) if v == "grid-3"),
        "rollback target must be the pre-preview variant, got: {:?}",
        ctx.flow
    );

    // Cancel restores exactly the original variant
    let r2 = advance(&mut store, &mut ctx, "annuler");
    assert!(r2.success);
    assert_eq!(ctx.flow, None);
    assert_eq!(
        store.get_section("features").unwrap().layout.variant,
        "grid-3"
    );
}

#[test]
fn test_layout_preview_commit_keeps_variant() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("features");

    advance(&mut store, &mut ctx, "passe en liste");
    let r = advance(&mut store, &mut ctx, "✓ Valider");
    assert!(r.success);
    assert!(r.increment_mod_count);
    assert_eq!(ctx.flow, None);
    assert_eq!(store.get_section("features").unwrap().layout.variant, "list");
}

#[test]
fn test_layout_cycling_is_silent() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("features");

    advance(&mut store, &mut ctx, "passe en 2 colonnes");
    let r = advance(&mut store, &mut ctx, "liste");
    assert!(r.silent_preview, "re-preview must not produce a message");
    assert!(r.message.is_empty());
    assert_eq!(store.get_section("features").unwrap().layout.variant, "list");
    // The rollback target is still the pre-preview variant
    assert!(
        matches!(&ctx.flow, Some(Flow::LayoutPreview { original: Some(v) }) if v == "grid-3")
    );

    // And cancel after cycling still restores the very first variant
    advance(&mut store, &mut ctx, "non");
    assert_eq!(
        store.get_section("features").unwrap().layout.variant,
        "grid-3"
    );
}

#[test]
fn test_layout_category_previews_current_variant() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    let r = advance(&mut store, &mut ctx, "le layout");
    assert!(r.success);
    assert!(r.message.contains("Centré"), "{}", r.message);
    assert!(
        matches!(&ctx.flow, Some(Flow::LayoutPreview { original: Some(v) }) if v == "centered")
    );
    // No store write happened yet
    assert_eq!(store.get_section("hero").unwrap().layout.variant, "centered");
}

// ---------------------------------------------------------------------------
// Category → element → color → confirm chain
// ---------------------------------------------------------------------------

#[test]
fn test_colors_category_chain_commits_title_color() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    let r1 = advance(&mut store, &mut ctx, "les couleurs");
    assert!(r1.success);
    assert_eq!(ctx.flow, Some(Flow::ColorTarget { color: None }));
    assert!(!r1.suggestions.is_empty());

    let r2 = advance(&mut store, &mut ctx, "le titre");
    assert!(r2.success);
    assert!(
        matches!(&ctx.flow, Some(Flow::AwaitingColor { element }) if element == "title"),
        "got: {:?}",
        ctx.flow
    );

    let r3 = advance(&mut store, &mut ctx, "violet");
    assert!(r3.success);
    assert!(matches!(&ctx.flow, Some(Flow::ColorPreview { .. })));
    assert_eq!(title_color(&store, "hero").as_deref(), Some("#A78BFA"));

    let r4 = advance(&mut store, &mut ctx, "valider");
    assert!(r4.success);
    assert_eq!(ctx.flow, None);
    assert_eq!(title_color(&store, "hero").as_deref(), Some("#A78BFA"));
}

#[test]
fn test_color_first_then_element_attaches_pending_color() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    advance(&mut store, &mut ctx, "les couleurs");
    let r1 = advance(&mut store, &mut ctx, "rose");
    assert!(r1.success);
    assert!(r1.message.contains("quel élément"), "{}", r1.message);
    assert!(
        matches!(&ctx.flow, Some(Flow::ColorTarget { color: Some(c) }) if c.hex == "#F472B6")
    );

    // Naming the element consumes the stored color: straight to preview
    let r2 = advance(&mut store, &mut ctx, "le badge");
    assert!(r2.success);
    assert!(
        matches!(&ctx.flow, Some(Flow::ColorPreview { element, .. }) if element == "badge")
    );
    assert_eq!(
        store.get_section("hero").unwrap().color("badge"),
        Some("#F472B6")
    );
}

#[test]
fn test_palette_keyword_sets_open_palette_flag() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    advance(&mut store, &mut ctx, "les couleurs");
    advance(&mut store, &mut ctx, "le titre");
    let r = advance(&mut store, &mut ctx, "🎨 Palette");
    assert!(r.open_palette);
    // The element stays armed for the palette's pick
    assert!(matches!(&ctx.flow, Some(Flow::AwaitingColor { element }) if element == "title"));
}

// ---------------------------------------------------------------------------
// Elliptical color: "en bleu" with a remembered subject
// ---------------------------------------------------------------------------

#[test]
fn test_color_without_element_reuses_last_subject() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    ctx.last_subject = Some("subtitle".to_string());

    let r = advance(&mut store, &mut ctx, "en bleu");
    assert!(r.success);
    assert!(
        matches!(&ctx.flow, Some(Flow::ColorPreview { element, .. }) if element == "subtitle")
    );
    assert_eq!(
        store.get_section("hero").unwrap().color("subtitle"),
        Some("#3B82F6")
    );
}

#[test]
fn test_color_without_element_or_subject_asks_which() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    let r = advance(&mut store, &mut ctx, "en bleu");
    assert!(r.success);
    assert!(r.message.contains("quel élément"), "{}", r.message);
    assert!(matches!(&ctx.flow, Some(Flow::ColorTarget { color: Some(_) })));
    // Nothing was written
    assert_eq!(store.get_section("hero").unwrap().color("subtitle"), Some("#9CA3AF"));
}

// ---------------------------------------------------------------------------
// Free-text edit
// ---------------------------------------------------------------------------

#[test]
fn test_text_edit_flow_uses_verbatim_message() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    let r1 = advance(&mut store, &mut ctx, "le titre");
    assert!(r1.success);
    assert!(
        matches!(&ctx.flow, Some(Flow::TextEdit { element }) if element == "title"),
        "got: {:?}",
        ctx.flow
    );
    assert!(
        r1.hint.as_ref().unwrap().contains("Crée ta landing page"),
        "hint should show the current value: {:?}",
        r1.hint
    );

    // Mixed case and punctuation go in verbatim, not lowercased
    let r2 = advance(&mut store, &mut ctx, "Des Pages Qui Claquent !");
    assert!(r2.success);
    assert!(r2.increment_mod_count);
    assert_eq!(ctx.flow, None);
    assert_eq!(
        store.get_section("hero").unwrap().content_field("title"),
        Some("Des Pages Qui Claquent !")
    );
    assert_eq!(ctx.last_subject.as_deref(), Some("title"));
}

#[test]
fn test_text_edit_cancel_writes_nothing() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    let original = store
        .get_section("hero")
        .unwrap()
        .content_field("title")
        .unwrap()
        .to_string();

    advance(&mut store, &mut ctx, "le titre");
    let r = advance(&mut store, &mut ctx, "annuler");
    assert!(r.success);
    assert_eq!(ctx.flow, None);
    assert_eq!(
        store.get_section("hero").unwrap().content_field("title"),
        Some(original.as_str())
    );
}

// ---------------------------------------------------------------------------
// Context isolation across sections
// ---------------------------------------------------------------------------

#[test]
fn test_pending_state_never_leaks_across_sections() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");

    advance(&mut store, &mut ctx, "le titre");
    assert!(matches!(&ctx.flow, Some(Flow::TextEdit { .. })));

    // Switching sections resets the context wholesale
    ctx.set_active_section(Some("features".to_string()));
    assert_eq!(ctx.flow, None);

    // The next message on B is interpreted fresh, not as replacement text
    let r = advance(&mut store, &mut ctx, "le titre");
    assert!(matches!(&ctx.flow, Some(Flow::TextEdit { .. })));
    assert!(r.message.contains("Quel titre"), "{}", r.message);
}

// ---------------------------------------------------------------------------
// Add items
// ---------------------------------------------------------------------------

#[test]
fn test_batch_add_caps_at_five_with_unique_ids() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("features");
    let before = store.get_section("features").unwrap().items.len();

    let r = advance(&mut store, &mut ctx, "ajoute 10 features");
    assert!(r.success);
    assert!(r.increment_mod_count);

    let section = store.get_section("features").unwrap();
    assert_eq!(section.items.len(), before + 5, "cap is 5 per command");

    let ids: std::collections::HashSet<_> =
        section.items.iter().map(|i| i.id().to_string()).collect();
    assert_eq!(ids.len(), section.items.len(), "all ids distinct");
}

#[test]
fn test_add_wizard_walks_fields_and_commits() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("features");
    let before = store.get_section("features").unwrap().items.len();

    let r1 = advance(&mut store, &mut ctx, "ajoute une feature");
    assert!(r1.success);
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::Add { step: 0, .. }))
    ));

    advance(&mut store, &mut ctx, "Mode sombre");
    advance(&mut store, &mut ctx, "Repose les yeux");
    let r_icon = advance(&mut store, &mut ctx, "une étoile");
    assert!(r_icon.success);
    let r_color = advance(&mut store, &mut ctx, "rose");
    assert!(r_color.success);
    assert!(r_color.increment_mod_count);
    assert_eq!(ctx.flow, None);

    let section = store.get_section("features").unwrap();
    assert_eq!(section.items.len(), before + 1);
    let added = section.items.last().unwrap();
    assert_eq!(added.display_label(), "Mode sombre");
    match added {
        maquette::site::Item::Feature { icon, color, .. } => {
            assert_eq!(icon, "Star");
            assert_eq!(color, "#F472B6");
        }
        other => panic!("expected Feature, got: {:?}", other),
    }
}

#[test]
fn test_add_wizard_cancel() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("faq");
    let before = store.get_section("faq").unwrap().items.len();

    advance(&mut store, &mut ctx, "ajoute une question");
    let r = advance(&mut store, &mut ctx, "non laisse");
    assert!(r.success);
    assert_eq!(ctx.flow, None);
    assert_eq!(store.get_section("faq").unwrap().items.len(), before);
}

// ---------------------------------------------------------------------------
// Delete items
// ---------------------------------------------------------------------------

#[test]
fn test_delete_last_resolves_and_confirms() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("faq");
    let items_before: Vec<String> = store
        .get_section("faq")
        .unwrap()
        .items
        .iter()
        .map(|i| i.display_label().to_string())
        .collect();
    assert_eq!(items_before.len(), 3);

    let r1 = advance(&mut store, &mut ctx, "supprime la dernière");
    assert!(r1.success);
    assert!(
        r1.message.contains(&items_before[2]),
        "confirm must echo the item label: {}",
        r1.message
    );
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::ConfirmDelete { index: 2 }))
    ));
    // Nothing deleted yet
    assert_eq!(store.get_section("faq").unwrap().items.len(), 3);

    let r2 = advance(&mut store, &mut ctx, "oui");
    assert!(r2.success);
    let remaining: Vec<String> = store
        .get_section("faq")
        .unwrap()
        .items
        .iter()
        .map(|i| i.display_label().to_string())
        .collect();
    assert_eq!(remaining, items_before[..2].to_vec());
}

#[test]
fn test_delete_without_index_lists_choices() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("faq");

    let r1 = advance(&mut store, &mut ctx, "supprime une question");
    // "une" resolves to 1 — that's a valid index, so it goes to confirm
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::ConfirmDelete { index: 0 }))
    ));
    assert!(r1.message.contains("Supprimer"));

    // Refusing keeps the item
    let r2 = advance(&mut store, &mut ctx, "✕ Non");
    assert!(r2.success);
    assert_eq!(store.get_section("faq").unwrap().items.len(), 3);
}

#[test]
fn test_delete_chooser_flow() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("faq");

    let r1 = advance(&mut store, &mut ctx, "supprime");
    assert!(r1.success);
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::ChooseItem))
    ));
    assert!(r1.suggestions.contains(&"La dernière".to_string()));

    // An out-of-range pick re-prompts without advancing
    let r2 = advance(&mut store, &mut ctx, "9");
    assert!(!r2.success);
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::ChooseItem))
    ));

    let r3 = advance(&mut store, &mut ctx, "2");
    assert!(matches!(
        &ctx.flow,
        Some(Flow::ItemWizard(WizardState::ConfirmDelete { index: 1 }))
    ));
    assert!(r3.message.contains("Puis-je utiliser mon domaine ?"));

    advance(&mut store, &mut ctx, "✓ Oui");
    assert_eq!(store.get_section("faq").unwrap().items.len(), 2);
}

#[test]
fn test_delete_with_no_items_fails() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("faq");
    for _ in 0..3 {
        let section = store.get_section("faq").unwrap();
        store.remove_item("faq", section.items.len() - 1);
    }

    let r = advance(&mut store, &mut ctx, "supprime la dernière");
    assert!(!r.success);
    assert!(r.message.contains("Rien à supprimer"));
    assert_eq!(ctx.flow, None, "wizard must not arm with nothing to delete");
}

// ---------------------------------------------------------------------------
// Undo through the chat
// ---------------------------------------------------------------------------

#[test]
fn test_undo_command_reverts_last_content_edit() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    let original = store
        .get_section("hero")
        .unwrap()
        .content_field("title")
        .unwrap()
        .to_string();

    advance(&mut store, &mut ctx, "le titre");
    advance(&mut store, &mut ctx, "Titre temporaire");
    assert_ne!(
        store.get_section("hero").unwrap().content_field("title"),
        Some(original.as_str())
    );

    let r = advance(&mut store, &mut ctx, "retour en arrière");
    assert!(r.success, "{}", r.message);
    assert_eq!(
        store.get_section("hero").unwrap().content_field("title"),
        Some(original.as_str())
    );
}

// ---------------------------------------------------------------------------
// Modification-count driven suggestions
// ---------------------------------------------------------------------------

#[test]
fn test_suggestions_nudge_forward_after_many_edits() {
    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    ctx.modification_count = 5;

    let r = advance(&mut store, &mut ctx, "aide");
    assert!(r.suggestions.contains(&"✨ Parfait !".to_string()), "{:?}", r.suggestions);
    assert!(
        r.suggestions.contains(&"➡️ Section suivante".to_string()),
        "{:?}",
        r.suggestions
    );
}
