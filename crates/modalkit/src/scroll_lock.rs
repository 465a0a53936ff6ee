#![forbid(unsafe_code)]

//! Reference-counted body scroll lock.
//!
//! # Invariants
//!
//! 1. `overflow` on the body is `hidden` iff at least one lock is outstanding.
//! 2. The saved `overflow` / `padding-right` values are captured by the first
//!    lock and written back by the last unlock, so N locks followed by N
//!    unlocks (any interleaving) leave the body exactly as it was.
//! 3. Scrollbar compensation (`padding-right`) is only applied when the
//!    viewport is wider than the document's client area.
//!
//! # Failure Modes
//!
//! - Unlock without a matching lock: the count stays at zero and the body is
//!   left untouched.
//! - [`Cleanup`](crate::Cleanup) tokens from `lock_scroll` unlock once, so
//!   prefer them over bare `unlock_scroll` calls.

use modalkit_core::Dom;

const OVERFLOW: &str = "overflow";
const PADDING_RIGHT: &str = "padding-right";

/// Process-wide scroll lock state, owned by a [`Page`](crate::Page).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollLock {
    count: usize,
    saved_overflow: String,
    saved_padding_right: String,
}

impl ScrollLock {
    /// Outstanding locks.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether any lock is outstanding.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.count > 0
    }

    pub(crate) fn lock<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.count == 0 {
            let body = dom.body();
            self.saved_overflow = dom.style(body, OVERFLOW);
            self.saved_padding_right = dom.style(body, PADDING_RIGHT);

            let scrollbar_width = dom.inner_width().saturating_sub(dom.client_width());
            dom.set_style(body, OVERFLOW, "hidden");
            if scrollbar_width > 0 {
                dom.set_style(body, PADDING_RIGHT, &format!("{scrollbar_width}px"));
            }
            tracing::debug!(scrollbar_width, "scroll locked");
        }
        self.count += 1;
    }

    pub(crate) fn unlock<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.count == 0 {
            tracing::trace!("scroll unlock without lock");
            return;
        }
        self.count -= 1;
        if self.count == 0 {
            self.restore(dom);
            tracing::debug!("scroll unlocked");
        }
    }

    /// Restore saved styles if locked, then forget everything.
    pub(crate) fn reset<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.count > 0 {
            self.restore(dom);
            tracing::debug!(outstanding = self.count, "scroll lock reset");
        }
        *self = Self::default();
    }

    fn restore<D: Dom + ?Sized>(&self, dom: &mut D) {
        let body = dom.body();
        dom.set_style(body, OVERFLOW, &self.saved_overflow);
        dom.set_style(body, PADDING_RIGHT, &self.saved_padding_right);
    }
}
