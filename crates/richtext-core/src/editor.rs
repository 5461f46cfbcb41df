//! The editor component: surface, bridge, selection and observer wired
//! together.

use crate::actions::{EditEvent, FormatCommand};
use crate::bridge::{ChangeSink, SyncBridge};
use crate::config::EditorConfig;
use crate::document::StructuredDocument;
use crate::markup::decode;
use crate::observer::{FormatState, observe};
use crate::surface::DocumentSurface;
use crate::toolbar::Toolbar;
use crate::types::Selection;

/// A rich text editor bound to an externally owned markup value.
///
/// Every mutation that changes the encoding is reported to the sink exactly
/// once; the cached [`FormatState`] is recomputed after every mutation and
/// every selection change.
pub struct RichTextEditor<S> {
    surface: DocumentSurface,
    bridge: SyncBridge<S>,
    selection: Selection,
    format_state: FormatState,
    focused: bool,
    config: EditorConfig,
}

impl<S: ChangeSink> RichTextEditor<S> {
    /// Create an editor seeded from `value`. An absent value is the empty
    /// document.
    pub fn new(value: Option<&str>, sink: S, config: EditorConfig) -> Self {
        let value = value.unwrap_or_default();
        let surface = DocumentSurface::new(decode(value));
        let bridge = SyncBridge::new(surface.document(), value, sink);
        let selection = Selection::collapsed(surface.document().end_position());
        let mut editor = Self {
            surface,
            bridge,
            selection,
            format_state: FormatState::default(),
            focused: false,
            config,
        };
        editor.refresh_format_state();
        editor
    }

    /// Current markup of the document.
    pub fn value(&self) -> &str {
        self.bridge.current()
    }

    pub fn document(&self) -> &StructuredDocument {
        self.surface.document()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn format_state(&self) -> &FormatState {
        &self.format_state
    }

    pub fn toolbar(&self) -> Toolbar {
        Toolbar::present(&self.format_state)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Number of change notifications emitted so far.
    pub fn revision(&self) -> u64 {
        self.bridge.revision()
    }

    pub fn sink(&self) -> &S {
        self.bridge.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.bridge.sink_mut()
    }

    pub fn into_sink(self) -> S {
        self.bridge.into_sink()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        let clamped = self.surface.document().clamp_selection(selection);
        if clamped != selection {
            tracing::trace!(?selection, ?clamped, "clamped stale selection");
        }
        self.surface.retain_pending_at(clamped.focus);
        self.selection = clamped;
        self.refresh_format_state();
    }

    /// Handle a direct user edit at the current selection.
    ///
    /// Returns whether the document changed.
    pub fn handle_input(&mut self, event: EditEvent) -> bool {
        let outcome = self.surface.apply_user_input(&event, self.selection);
        self.selection = outcome.selection;
        if outcome.changed {
            self.bridge.surface_mutated(self.surface.document());
        }
        self.refresh_format_state();
        outcome.changed
    }

    /// Run a formatting command against the current selection.
    pub fn dispatch(&mut self, command: FormatCommand, argument: Option<&str>) -> bool {
        let selection = self.selection;
        self.dispatch_at(command, selection, argument)
    }

    /// Run a formatting command against an explicit selection, which becomes
    /// the current one.
    pub fn dispatch_at(
        &mut self,
        command: FormatCommand,
        selection: Selection,
        argument: Option<&str>,
    ) -> bool {
        self.selection = self.surface.document().clamp_selection(selection);
        tracing::debug!(%command, selection = ?self.selection, "dispatch");
        let changed = self
            .surface
            .apply_command(command, self.selection, argument);
        if changed {
            self.bridge.surface_mutated(self.surface.document());
            self.selection = self.surface.document().clamp_selection(self.selection);
        }
        self.refresh_format_state();
        changed
    }

    /// The owner changed the bound value. Returns true if the document was
    /// replaced.
    pub fn external_value_changed(&mut self, markup: &str) -> bool {
        let replaced = self.bridge.external_value_changed(markup, &mut self.surface);
        if replaced {
            let clamped = self.surface.document().clamp_selection(self.selection);
            if clamped != self.selection {
                tracing::trace!(selection = ?self.selection, ?clamped, "clamped stale selection");
            }
            self.selection = clamped;
            self.refresh_format_state();
        }
        replaced
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Placeholder to show, only while the document is empty and unfocused.
    pub fn placeholder(&self) -> Option<&str> {
        (!self.focused && self.surface.document().is_blank())
            .then_some(self.config.placeholder.as_str())
    }

    fn refresh_format_state(&mut self) {
        self.format_state = observe(
            self.surface.document(),
            self.selection,
            self.surface.pending(),
        );
    }
}
