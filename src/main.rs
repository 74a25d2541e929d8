//! Interactive demo REPL: chat with the local assistant against the default
//! site. The loop does exactly what the editor UI does — persist the
//! returned context, bump the modification counter on demand and honor the
//! navigate/export/palette side-effect flags.

use maquette::assistant::{
    process_turn, section_context, suggest, InterpreterContext, UiAction,
};
use maquette::line_editor::{LineEditor, ReadResult};
use maquette::site::SectionKind;
use maquette::store::{SectionStore, SiteStore};

fn main() {
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  maquette — assistant local de landing pages             ║");
    println!("║  /section <id> · /contexte · /export · /quit             ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let mut store = SiteStore::new();
    let mut ctx = InterpreterContext::for_section("hero");
    let mut editor = LineEditor::new();

    println!("🫧 Section active : hero");
    println!();

    loop {
        let line = match editor.read_line("toi> ") {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => continue,
            ReadResult::Eof => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history(input);

        // REPL-level commands, outside the interpreter
        match input {
            "/quit" | "/q" => break,
            "/export" => {
                println!("{}", store.export_site());
                continue;
            }
            "/contexte" => {
                if let Some(section) = ctx
                    .active_section
                    .as_deref()
                    .and_then(|id| store.get_section(id))
                {
                    println!("{}", section_context(&section));
                }
                continue;
            }
            _ => {}
        }
        if let Some(id) = input.strip_prefix("/section ") {
            if SectionKind::parse(id.trim()).is_some() {
                ctx.set_active_section(Some(id.trim().to_string()));
                println!("🫧 Section active : {}", id.trim());
            } else {
                println!("🤔 Sections : hero, features, howItWorks, pricing, faq");
            }
            continue;
        }

        let result = process_turn(input, &ctx, &mut store);
        ctx = result.context.clone();
        if result.increment_mod_count {
            ctx.modification_count += 1;
        }

        if !result.silent_preview {
            println!();
            println!("🫧 {}", result.message.replace('\n', "\n   "));
            if let Some(hint) = &result.hint {
                println!("   {}", hint);
            }
            if let Some(toast) = &result.toast {
                println!("   [{}]", toast);
            }
            if !result.suggestions.is_empty() {
                println!("   ⟨ {} ⟩", result.suggestions.join(" · "));
            }
            println!();
        }

        if result.open_palette {
            let preview = store.theme().preview();
            println!(
                "   🎨 (palette : {} {} {})",
                preview.primary, preview.secondary, preview.tertiary
            );
        }

        match result.ui {
            Some(UiAction::Navigate { to }) => {
                ctx.set_active_section(Some(to.clone()));
                println!("   ➡️ Section active : {}", to);
            }
            Some(UiAction::Export) => {
                println!("{}", store.export_site());
            }
            None => {}
        }

        // Proactive tip, the way the side panel surfaces one
        if result.success {
            if let Some(section) = ctx
                .active_section
                .as_deref()
                .and_then(|id| store.get_section(id))
            {
                let config = maquette::assistant::sections::section_config(section.kind);
                if let Some(tip) = suggest::proactive_tip(config, &section) {
                    println!("   {}", tip);
                }
            }
        }
    }

    println!("🫧 À bientôt !");
}
