//! Field/string synchronization
//!
//! Mediates between discrete-field edits, raw-string edits, and the manual
//! mode toggle. Exactly one representation is live at a time; the other is
//! derived through the codec. Toggling performs a single conversion in the
//! indicated direction, and edits addressed to the non-live side are
//! ignored rather than rejected, matching the originating form behavior.

use tracing::debug;

use crate::codec::ConnectionCodec;

/// Which representation is currently the source of truth.
///
/// The variant carries only the live representation, so the frozen side can
/// never go stale: it simply does not exist until the next toggle derives
/// it.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState<F> {
    /// Discrete fields are live; the string is derived on every read.
    FieldsActive(F),

    /// The raw string is live; fields are derived only on toggle-off.
    StringActive(String),
}

/// Two-state controller keeping fields and connection string in sync.
#[derive(Debug, Clone)]
pub struct FieldSync<C: ConnectionCodec> {
    state: SyncState<C::Fields>,
}

impl<C: ConnectionCodec> Default for FieldSync<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ConnectionCodec> FieldSync<C> {
    /// Start in fields mode with default (empty) fields.
    pub fn new() -> Self {
        Self {
            state: SyncState::FieldsActive(C::Fields::default()),
        }
    }

    /// Start in fields mode with the given fields.
    pub fn with_fields(fields: C::Fields) -> Self {
        Self {
            state: SyncState::FieldsActive(fields),
        }
    }

    /// Start in manual mode with the given raw string.
    pub fn with_string(raw: impl Into<String>) -> Self {
        Self {
            state: SyncState::StringActive(raw.into()),
        }
    }

    /// True when the raw string is the live representation.
    pub fn manual_mode(&self) -> bool {
        matches!(self.state, SyncState::StringActive(_))
    }

    /// Current state, for callers that need to render the live side.
    pub fn state(&self) -> &SyncState<C::Fields> {
        &self.state
    }

    /// The live fields, if fields mode is active.
    pub fn fields(&self) -> Option<&C::Fields> {
        match &self.state {
            SyncState::FieldsActive(fields) => Some(fields),
            SyncState::StringActive(_) => None,
        }
    }

    /// The connection string for display or submission.
    ///
    /// In fields mode this is re-derived on every read, so it tracks every
    /// field edit; in manual mode it is the stored string verbatim.
    pub fn connection_string(&self) -> String {
        match &self.state {
            SyncState::FieldsActive(fields) => C::build(fields),
            SyncState::StringActive(raw) => raw.clone(),
        }
    }

    /// Switch between manual-string and fields mode.
    ///
    /// Performs one conversion in the indicated direction; re-asserting the
    /// current mode is a no-op. Toggling off parses the stored string, so a
    /// string the grammar cannot express comes back as default fields.
    pub fn set_manual(&mut self, manual: bool) {
        match (&self.state, manual) {
            (SyncState::FieldsActive(fields), true) => {
                let raw = C::build(fields);
                debug!(dialect = C::NAME, "entering manual string mode");
                self.state = SyncState::StringActive(raw);
            }
            (SyncState::StringActive(raw), false) => {
                let fields = C::parse(raw);
                debug!(dialect = C::NAME, "leaving manual string mode");
                self.state = SyncState::FieldsActive(fields);
            }
            _ => {}
        }
    }

    /// Apply an edit to the live fields.
    ///
    /// Returns `false` (and changes nothing) in manual mode, where the
    /// fields are frozen.
    pub fn edit_field(&mut self, edit: impl FnOnce(&mut C::Fields)) -> bool {
        match &mut self.state {
            SyncState::FieldsActive(fields) => {
                edit(fields);
                true
            }
            SyncState::StringActive(_) => false,
        }
    }

    /// Replace the live raw string verbatim.
    ///
    /// Returns `false` (and changes nothing) in fields mode, where the
    /// string is derived, not stored.
    pub fn edit_string(&mut self, raw: impl Into<String>) -> bool {
        match &mut self.state {
            SyncState::StringActive(stored) => {
                *stored = raw.into();
                true
            }
            SyncState::FieldsActive(_) => false,
        }
    }
}
