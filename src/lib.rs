//! maquette — rule-based conversational assistant core for a visual
//! landing-page builder.
//!
//! A user arranges typed page sections (hero, features, steps, pricing,
//! FAQ) and edits their text, colors and layout by chatting with a local
//! assistant. This crate is the deterministic core behind that chat: a
//! keyword-driven command interpreter with a per-turn state machine
//! ([`assistant::process_turn`]), the structured action runner an external
//! backend would drive ([`assistant::run_actions`]), and the in-memory site
//! store both converge on ([`store::SiteStore`]).
//!
//! No network, no model: intent detection is fixed French/English keyword
//! matching over YAML word lists.

pub mod assistant;
pub mod line_editor;
pub mod site;
pub mod store;
pub mod types;
