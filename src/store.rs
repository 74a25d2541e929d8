//! The site store: the mutation surface the interpreter drives, and the
//! in-memory implementation with snapshot history.
//!
//! The interpreter never touches a global — it receives the store as an
//! explicit `&mut dyn SectionStore`, so any fake can stand in for tests.
//! All mutators silently no-op on unknown section ids; the interpreter
//! validates targets before it writes.

use crate::site::{ItemKind, ItemSeed, LayoutPatch, Section, Site, Theme};
use crate::types::{BuilderError, Result};

/// Default number of undo snapshots retained.
pub const DEFAULT_MAX_HISTORY: usize = 50;

// ---------------------------------------------------------------------------
// The injected mutation surface
// ---------------------------------------------------------------------------

/// Read/write surface of the site store, as consumed by the turn processor
/// and the action runner.
pub trait SectionStore {
    fn get_section(&self, id: &str) -> Option<Section>;
    fn update_content(&mut self, id: &str, field: &str, value: &str);
    fn update_layout(&mut self, id: &str, patch: LayoutPatch);
    fn update_section_color(&mut self, id: &str, element: &str, color: &str);
    fn set_theme(&mut self, theme: Theme);
    fn add_item(&mut self, id: &str, seed: &ItemSeed);
    fn update_item(&mut self, id: &str, index: usize, patch: &ItemSeed);
    fn remove_item(&mut self, id: &str, index: usize);
    fn undo(&mut self) -> bool;
    fn can_undo(&self) -> bool;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory site store with bounded snapshot history.
///
/// Color updates are deliberately not snapshotted: the interpreter previews
/// colors live and handles its own rollback, and a history entry per preview
/// keystroke would bury real undo points.
#[derive(Debug, Clone)]
pub struct SiteStore {
    site: Site,
    undo_stack: Vec<Site>,
    redo_stack: Vec<Site>,
    max_history: usize,
    next_item_id: u64,
}

impl SiteStore {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(max_history: usize) -> Self {
        SiteStore {
            site: Site::default_site(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
            next_item_id: 1,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn theme(&self) -> Theme {
        self.site.theme
    }

    /// Snapshot the current site before a mutation.
    fn save_to_history(&mut self) {
        self.undo_stack.push(self.site.clone());
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(std::mem::replace(&mut self.site, next));
                true
            }
            None => false,
        }
    }

    /// Fresh item id, unique for the lifetime of the store, never reused.
    fn fresh_item_id(&mut self) -> String {
        let id = format!("i{}", self.next_item_id);
        self.next_item_id += 1;
        id
    }

    pub fn export_site(&self) -> String {
        serde_json::to_string_pretty(&self.site).unwrap_or_default()
    }

    pub fn import_site(&mut self, json: &str) -> Result<()> {
        let site: Site = serde_json::from_str(json)
            .map_err(|e| BuilderError::Import(e.to_string()))?;
        self.save_to_history();
        self.site = site;
        Ok(())
    }
}

impl Default for SiteStore {
    fn default() -> Self {
        SiteStore::new()
    }
}

impl SectionStore for SiteStore {
    fn get_section(&self, id: &str) -> Option<Section> {
        self.site.sections.get(id).cloned()
    }

    fn update_content(&mut self, id: &str, field: &str, value: &str) {
        if !self.site.sections.contains_key(id) {
            return;
        }
        self.save_to_history();
        if let Some(section) = self.site.sections.get_mut(id) {
            section
                .content
                .insert(field.to_string(), value.to_string());
        }
    }

    fn update_layout(&mut self, id: &str, patch: LayoutPatch) {
        if !self.site.sections.contains_key(id) {
            return;
        }
        self.save_to_history();
        if let Some(section) = self.site.sections.get_mut(id) {
            if let Some(variant) = patch.variant {
                section.layout.variant = variant;
            }
            if let Some(spacing) = patch.spacing {
                section.layout.spacing = spacing;
            }
        }
    }

    fn update_section_color(&mut self, id: &str, element: &str, color: &str) {
        if let Some(section) = self.site.sections.get_mut(id) {
            section
                .colors
                .insert(element.to_string(), color.to_string());
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.save_to_history();
        self.site.theme = theme;
    }

    fn add_item(&mut self, id: &str, seed: &ItemSeed) {
        let Some(kind) = self
            .site
            .sections
            .get(id)
            .and_then(|s| ItemKind::for_section(s.kind))
        else {
            return;
        };
        self.save_to_history();
        let item_id = self.fresh_item_id();
        if let Some(section) = self.site.sections.get_mut(id) {
            let position = section.items.len();
            section
                .items
                .push(crate::site::Item::synthesize(kind, item_id, seed, position));
        }
    }

    fn update_item(&mut self, id: &str, index: usize, patch: &ItemSeed) {
        let valid = self
            .site
            .sections
            .get(id)
            .map(|s| index < s.items.len())
            .unwrap_or(false);
        if !valid {
            return;
        }
        self.save_to_history();
        if let Some(item) = self
            .site
            .sections
            .get_mut(id)
            .and_then(|s| s.items.get_mut(index))
        {
            item.apply_patch(patch);
        }
    }

    fn remove_item(&mut self, id: &str, index: usize) {
        let valid = self
            .site
            .sections
            .get(id)
            .map(|s| index < s.items.len())
            .unwrap_or(false);
        if !valid {
            return;
        }
        self.save_to_history();
        if let Some(section) = self.site.sections.get_mut(id) {
            section.items.remove(index);
        }
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(prev) => {
                self.redo_stack.push(std::mem::replace(&mut self.site, prev));
                true
            }
            None => false,
        }
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
