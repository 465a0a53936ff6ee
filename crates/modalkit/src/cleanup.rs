#![forbid(unsafe_code)]

//! Disposal tokens.
//!
//! Every operation that acquires something on the page (a scroll lock, an
//! aria-hidden mark, a focus trap, a listener, a pending transition wait)
//! hands back a [`Cleanup`]. Disposing the token releases exactly that
//! acquisition.
//!
//! # Invariants
//!
//! 1. `dispose` releases at most once; later calls are no-ops.
//! 2. Tokens may be disposed in any order relative to each other.
//! 3. Dropping a token without disposing it releases nothing. Disposal needs
//!    the page, which the token does not own.
//!
//! # Failure Modes
//!
//! - Disposing a token whose resource is already gone (trap removed by a
//!   reset, listener already removed) is a silent no-op.

use modalkit_core::{Dom, ElementId};

use crate::focus::TrapId;
use crate::listeners::ListenerId;
use crate::page::Page;
use crate::transition::WaitId;

/// What a [`Cleanup`] releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CleanupAction {
    Noop,
    UnlockScroll,
    UnmarkAriaHidden(ElementId),
    ReleaseFocusTrap(TrapId),
    RemoveListener(ListenerId),
    CancelTransitionWait(WaitId),
}

/// One-shot release capability for something acquired on a [`Page`].
#[derive(Debug)]
#[must_use = "dropping a Cleanup releases nothing; call dispose()"]
pub struct Cleanup {
    action: CleanupAction,
    disposed: bool,
}

impl Cleanup {
    pub(crate) const fn new(action: CleanupAction) -> Self {
        Self {
            action,
            disposed: false,
        }
    }

    /// A token that releases nothing, handed out when the target was missing.
    pub const fn noop() -> Self {
        Self::new(CleanupAction::Noop)
    }

    /// Whether this token releases nothing.
    pub fn is_noop(&self) -> bool {
        self.action == CleanupAction::Noop
    }

    /// Whether [`dispose`](Self::dispose) has already run.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release the acquisition. Idempotent.
    pub fn dispose<D: Dom>(&mut self, page: &mut Page<D>) {
        if self.disposed {
            tracing::trace!(action = ?self.action, "cleanup already disposed");
            return;
        }
        self.disposed = true;
        page.release(self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalkit_harness::MemoryDom;

    #[test]
    fn noop_token_disposes_cleanly() {
        let mut page = Page::new(MemoryDom::new());
        let mut token = Cleanup::noop();
        assert!(token.is_noop());
        assert!(!token.is_disposed());
        token.dispose(&mut page);
        assert!(token.is_disposed());
        token.dispose(&mut page);
        assert!(token.is_disposed());
    }

    #[test]
    fn second_dispose_does_not_release_again() {
        let mut page = Page::new(MemoryDom::new());
        let mut first = page.lock_scroll();
        let _second = page.lock_scroll();
        assert_eq!(page.scroll_lock_count(), 2);

        first.dispose(&mut page);
        first.dispose(&mut page);
        assert_eq!(page.scroll_lock_count(), 1);
    }
}
