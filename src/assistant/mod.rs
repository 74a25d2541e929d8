//! Local assistant — the deterministic chat command interpreter.
//!
//! Converts free-text French/English chat input into mutations of the site
//! model. Pipeline per turn:
//!
//! 1. **Detection** — color / layout / icon / number / element scans over
//!    the normalized message (`detect`)
//! 2. **Mode dispatch** — at most one pending interaction mode drives the
//!    turn; modes are checked in strict priority order (`turn`)
//! 3. **Mutation** — writes go through the injected [`SectionStore`]
//!    (`crate::store`), never through globals
//! 4. **Reply** — every turn yields a message, suggestion chips and side
//!    effect flags for the caller (`TurnResult`)
//!
//! Two more entry points bypass the natural-language path: the action runner
//! (`runner`) executes pre-structured action batches, and the reply parser
//! (`reply`) extracts such batches from a free-form assistant reply.
//!
//! [`SectionStore`]: crate::store::SectionStore

pub mod detect;
pub mod reply;
pub mod runner;
pub mod sections;
pub mod suggest;
pub mod turn;
pub mod vocab;
mod wizard;

pub use detect::NamedColor;
pub use reply::{parse_assistant_reply, section_context, AssistantReply, ParsedReply};
pub use runner::{run_actions, ActionRequest, BatchResult, RunnerContext};
pub use turn::{process_turn, process_turn_with};

use crate::site::ItemSeed;

// ---------------------------------------------------------------------------
// Interpreter context
// ---------------------------------------------------------------------------

/// Step of the add/delete item wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    /// Stepping through the item kind's field list; `step` indexes it.
    Add { step: usize, data: ItemSeed },
    /// Waiting for the user to pick which item to delete.
    ChooseItem,
    /// Waiting for a yes/no on deleting the item at `index`.
    ConfirmDelete { index: usize },
}

/// The pending interaction mode, if any. At most one mode exists at a time —
/// the old boolean-flag soup is structurally impossible here.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// A content field awaits its replacement text.
    TextEdit { element: String },
    /// The add/delete item wizard is running.
    ItemWizard(WizardState),
    /// An uncommitted layout change; `original` is the rollback variant.
    LayoutPreview { original: Option<String> },
    /// An uncommitted color change on `element`; `original` is the rollback
    /// value (None when the element had no explicit color).
    ColorPreview {
        element: String,
        original: Option<String>,
    },
    /// The user asked for colors and must now name an element; `color` holds
    /// an already-detected color waiting for its target.
    ColorTarget { color: Option<NamedColor> },
    /// An element was chosen and awaits its color.
    AwaitingColor { element: String },
}

/// Conversational state threaded across turns for one active section.
///
/// The caller owns it: persist the context a [`TurnResult`] returns and pass
/// it back on the next turn. All pending state is section-scoped — switching
/// the active section resets everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterpreterContext {
    /// Section commands apply to. None = no commands accepted.
    pub active_section: Option<String>,
    /// Pending interaction mode.
    pub flow: Option<Flow>,
    /// Last element touched — resolves elliptical follow-ups
    /// ("make it pink" with no named element).
    pub last_subject: Option<String>,
    /// Committed modifications in this section's conversation.
    pub modification_count: u32,
    /// Pure affirmations seen; cycles the acknowledgement replies.
    pub satisfaction_count: u32,
}

impl InterpreterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh context for a newly activated section.
    pub fn for_section(id: impl Into<String>) -> Self {
        InterpreterContext {
            active_section: Some(id.into()),
            ..Self::default()
        }
    }

    /// Switch the active section, dropping every pending flow, subject and
    /// counter. Pending state never leaks across sections.
    pub fn set_active_section(&mut self, id: Option<String>) {
        *self = InterpreterContext {
            active_section: id,
            ..Self::default()
        };
    }
}

// ---------------------------------------------------------------------------
// Turn result
// ---------------------------------------------------------------------------

/// UI side effect requested by a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Switch the editor to another section.
    Navigate { to: String },
    /// Open the export flow.
    Export,
}

/// Outcome of one interpreter turn. Every turn — understood or not —
/// produces a reply and a (possibly empty) chip list; there is no error
/// state distinct from a chat message.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// False when the input wasn't understood or the command couldn't apply.
    pub success: bool,
    /// Reply to append to the chat transcript (empty on silent previews).
    pub message: String,
    /// Secondary line under the reply (e.g. the current value of a field).
    pub hint: Option<String>,
    /// Quick-reply chips.
    pub suggestions: Vec<String>,
    /// Updated context the caller must persist for the next turn.
    pub context: InterpreterContext,
    /// Transient notification text.
    pub toast: Option<String>,
    /// Navigation/export request.
    pub ui: Option<UiAction>,
    /// Ask the caller to open the full color palette picker.
    pub open_palette: bool,
    /// Ask the caller to bump `modification_count` when persisting.
    pub increment_mod_count: bool,
    /// The store changed but no chat message should be shown (preview
    /// cycling).
    pub silent_preview: bool,
}

impl TurnResult {
    pub(crate) fn ok(message: impl Into<String>, context: InterpreterContext) -> Self {
        TurnResult {
            success: true,
            message: message.into(),
            hint: None,
            suggestions: Vec::new(),
            context,
            toast: None,
            ui: None,
            open_palette: false,
            increment_mod_count: false,
            silent_preview: false,
        }
    }

    pub(crate) fn fail(message: impl Into<String>, context: InterpreterContext) -> Self {
        let mut result = TurnResult::ok(message, context);
        result.success = false;
        result
    }

    pub(crate) fn suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub(crate) fn toast(mut self, toast: impl Into<String>) -> Self {
        self.toast = Some(toast.into());
        self
    }

    pub(crate) fn counted(mut self) -> Self {
        self.increment_mod_count = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Default cap on items created by a single "add N" command.
pub const DEFAULT_MAX_BATCH_ADD: usize = 5;

/// Tunables of the turn processor.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    /// Cap on items created by one "add N" command.
    pub max_batch_add: usize,
}

impl Default for TurnOptions {
    fn default() -> Self {
        TurnOptions {
            max_batch_add: DEFAULT_MAX_BATCH_ADD,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
