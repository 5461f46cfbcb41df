//! Two-way sync between the surface and the externally owned markup value.
//!
//! The bridge remembers the last encoding it emitted (or adopted) so that an
//! owner echoing our own change back through `external_value_changed` never
//! resets the surface, and so that a mutation which encodes identically is
//! never reported.

use web_time::Instant;

use crate::document::StructuredDocument;
use crate::markup::{decode, encode};
use crate::surface::DocumentSurface;

/// A serialized snapshot emitted after a document mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeNotification {
    pub markup: String,
    /// Monotonic per-editor counter, starting at 1.
    pub revision: u64,
    pub emitted_at: Instant,
}

/// Receiver of change notifications (the owner's `onChange`).
pub trait ChangeSink {
    fn notify(&mut self, change: &ChangeNotification);
}

impl<F> ChangeSink for F
where
    F: FnMut(&ChangeNotification),
{
    fn notify(&mut self, change: &ChangeNotification) {
        self(change)
    }
}

/// Collects every notification, mostly useful for hosts that poll.
impl ChangeSink for Vec<ChangeNotification> {
    fn notify(&mut self, change: &ChangeNotification) {
        self.push(change.clone());
    }
}

pub struct SyncBridge<S> {
    sink: S,
    /// Encoding of the surface as of the last sync.
    encoded: String,
    /// Raw external value the surface was last seeded from, when it differs
    /// from `encoded`. Cleared on the next mutation.
    adopted: Option<String>,
    revision: u64,
}

impl<S: ChangeSink> SyncBridge<S> {
    /// Create a bridge for a surface seeded from `initial`.
    pub fn new(doc: &StructuredDocument, initial: &str, sink: S) -> Self {
        let encoded = encode(doc);
        let adopted = (initial != encoded).then(|| initial.to_string());
        Self {
            sink,
            encoded,
            adopted,
            revision: 0,
        }
    }

    /// The last known encoding of the surface.
    pub fn current(&self) -> &str {
        &self.encoded
    }

    /// Number of notifications emitted so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whether `markup` is a value the surface already reflects.
    pub fn is_known(&self, markup: &str) -> bool {
        markup == self.encoded || self.adopted.as_deref() == Some(markup)
    }

    /// Adopt a new external value. Returns true if the surface was replaced.
    ///
    /// Adopting never emits a notification.
    pub fn external_value_changed(&mut self, markup: &str, surface: &mut DocumentSurface) -> bool {
        if self.is_known(markup) {
            tracing::trace!(len = markup.len(), "external value already reflected");
            return false;
        }
        let doc = decode(markup);
        let replaced = doc != *surface.document();
        if replaced {
            surface.replace(doc);
            self.encoded = encode(surface.document());
            tracing::debug!(markup = %self.encoded, "adopted external value");
        } else {
            tracing::trace!("external value decodes to the current document");
        }
        self.adopted = (markup != self.encoded).then(|| markup.to_string());
        replaced
    }

    /// Report a surface mutation. Returns true if a notification was
    /// emitted, which happens only when the encoding actually changed.
    pub fn surface_mutated(&mut self, doc: &StructuredDocument) -> bool {
        let markup = encode(doc);
        self.adopted = None;
        if markup == self.encoded {
            tracing::trace!("mutation left the encoding unchanged");
            return false;
        }
        if cfg!(debug_assertions) && decode(&markup) != *doc {
            tracing::warn!(%markup, "encoded markup does not round-trip");
        }
        self.revision += 1;
        tracing::debug!(revision = self.revision, %markup, "change");
        let change = ChangeNotification {
            markup,
            revision: self.revision,
            emitted_at: Instant::now(),
        };
        self.sink.notify(&change);
        self.encoded = change.markup;
        true
    }
}
