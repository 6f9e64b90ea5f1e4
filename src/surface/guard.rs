// ── Navigation guard ──────────────────────────────────────────────────────────
//
// State machine over the embedded surface's "navigation starting" and
// "navigation completed" signals.  While `Unarmed` every navigation proceeds,
// which lets the single bootstrap navigation through.  The first navigation
// whose URI starts with the trusted prefix arms the guard; from then on every
// navigation is cancelled.  The first completion after arming moves the guard
// to `LockedDown`, the one moment the surface capabilities are switched off.
//
// Single writer: the UI thread, from the engine's serialized callbacks.

/// URI prefix the engine reports for a document navigated to from an
/// in-memory string.
pub(crate) const IN_MEMORY_DOCUMENT_PREFIX: &str = "data:text/html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuardState {
    /// The trusted document has not been reached yet.
    Unarmed,
    /// The trusted document is loading.
    Armed,
    /// The trusted document has loaded and the surface is locked down.
    /// Never left.
    LockedDown,
}

/// What the host must do with a navigation that is about to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Allow,
    Cancel,
}

#[derive(Debug)]
pub(crate) struct NavigationGuard {
    state: GuardState,
    trusted_prefix: String,
}

impl NavigationGuard {
    pub(crate) fn new(trusted_prefix: impl Into<String>) -> Self {
        Self {
            state: GuardState::Unarmed,
            trusted_prefix: trusted_prefix.into(),
        }
    }

    pub(crate) fn state(&self) -> GuardState {
        self.state
    }

    /// The trusted document has been reached.
    pub(crate) fn is_armed(&self) -> bool {
        self.state() != GuardState::Unarmed
    }

    /// React to a navigation about to start towards `uri`.
    pub(crate) fn on_navigation_starting(&mut self, uri: &str) -> Verdict {
        match self.state {
            GuardState::Armed | GuardState::LockedDown => Verdict::Cancel,
            GuardState::Unarmed => {
                if uri.starts_with(&self.trusted_prefix) {
                    self.state = GuardState::Armed;
                }
                Verdict::Allow
            }
        }
    }

    /// React to a navigation having completed.  `true` exactly once: for the
    /// first completion after arming, when the lockdown must be applied.
    /// Completions of cancelled navigations report `false`.
    pub(crate) fn on_navigation_completed(&mut self) -> bool {
        if self.state == GuardState::Armed {
            self.state = GuardState::LockedDown;
            true
        } else {
            false
        }
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(IN_MEMORY_DOCUMENT_PREFIX)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
