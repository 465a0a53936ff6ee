#![forbid(unsafe_code)]

//! Wait for a CSS transition to end, with a timer fallback.
//!
//! # Invariants
//!
//! 1. The callback runs at most once, whichever of frame, `transitionend`
//!    or fallback timer comes first.
//! 2. Finishing or cancelling a wait clears whatever frame or timer it still
//!    holds.
//!
//! # Failure Modes
//!
//! - A computed duration that does not parse counts as zero and takes the
//!   next-frame path.
//! - A `transitionend` bubbling up from a descendant does not count; only an
//!   event whose target is the element itself finishes the wait.

use std::time::Duration;

use modalkit_core::{Dom, ElementId, parse_max_duration};

use crate::cleanup::{Cleanup, CleanupAction};
use crate::page::Page;
use crate::schedule::{FrameId, FrameTask, TimerId, TimerTask};

/// Durations below this are treated as "no transition".
const IMMEDIATE_THRESHOLD: Duration = Duration::from_millis(10);
/// Grace period added to the fallback timer.
const FALLBACK_GRACE: Duration = Duration::from_millis(100);

/// Handle to a pending wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WaitId(u64);

impl WaitId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

struct Wait {
    id: WaitId,
    element: ElementId,
    callback: Box<dyn FnOnce()>,
    frame: Option<FrameId>,
    timer: Option<TimerId>,
}

#[derive(Default)]
pub(crate) struct TransitionWaits {
    entries: Vec<Wait>,
    next_id: u64,
}

impl std::fmt::Debug for TransitionWaits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionWaits")
            .field("pending", &self.entries.len())
            .finish()
    }
}

impl TransitionWaits {
    fn next_id(&mut self) -> WaitId {
        self.next_id += 1;
        WaitId::from_raw(self.next_id)
    }

    fn take(&mut self, id: WaitId) -> Option<Wait> {
        let idx = self.entries.iter().position(|w| w.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<D: Dom> Page<D> {
    /// Run `callback` once the element's transition has ended.
    ///
    /// With no meaningful transition (under 10ms) the callback runs on the
    /// next animation frame. Otherwise it runs on the first `transitionend`
    /// targeting `element`, or after the longest duration plus 100ms.
    /// Disposing the token before then drops the callback.
    pub fn on_transition_end(
        &mut self,
        element: ElementId,
        callback: impl FnOnce() + 'static,
    ) -> Cleanup {
        let id = self.waits.next_id();
        let duration = parse_max_duration(&self.dom.transition_duration(element));

        let (frame, timer) = if duration < IMMEDIATE_THRESHOLD {
            let frame = self.scheduler.request_frame(FrameTask::TransitionReady(id));
            (Some(frame), None)
        } else {
            let timer = self.scheduler.set_timeout(
                duration + FALLBACK_GRACE,
                TimerTask::TransitionFallback(id),
            );
            (None, Some(timer))
        };
        tracing::trace!(%element, ?duration, "waiting for transition end");

        self.waits.entries.push(Wait {
            id,
            element,
            callback: Box::new(callback),
            frame,
            timer,
        });
        Cleanup::new(CleanupAction::CancelTransitionWait(id))
    }

    /// Forward a `transitionend` event whose target is `target`.
    ///
    /// Returns the number of waits it finished.
    pub fn dispatch_transition_end(&mut self, target: ElementId) -> usize {
        let matching: Vec<WaitId> = self
            .waits
            .entries
            .iter()
            .filter(|w| w.element == target && w.timer.is_some())
            .map(|w| w.id)
            .collect();
        for id in &matching {
            self.finish_transition_wait(*id);
        }
        matching.len()
    }

    /// Waits not yet finished or cancelled.
    pub fn pending_transition_waits(&self) -> usize {
        self.waits.len()
    }

    pub(crate) fn finish_transition_wait(&mut self, id: WaitId) {
        if let Some(wait) = self.detach_wait(id) {
            (wait.callback)();
        }
    }

    pub(crate) fn cancel_transition_wait(&mut self, id: WaitId) {
        if self.detach_wait(id).is_some() {
            tracing::trace!(?id, "transition wait cancelled");
        }
    }

    fn detach_wait(&mut self, id: WaitId) -> Option<Wait> {
        let wait = self.waits.take(id)?;
        if let Some(frame) = wait.frame {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(timer) = wait.timer {
            self.scheduler.clear_timeout(timer);
        }
        Some(wait)
    }
}
