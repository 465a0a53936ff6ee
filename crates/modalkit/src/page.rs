#![forbid(unsafe_code)]

//! The page: one host DOM plus every piece of modal bookkeeping tied to it.
//!
//! A [`Page`] is constructed explicitly and owned by the host. It replaces
//! what would otherwise be module-level globals (scroll-lock counter,
//! aria-hidden stack, focus-trap stack) with plain fields, so two pages never
//! share state and tests start from a clean slate.
//!
//! # Host Loop
//!
//! The host forwards native events and drives time:
//!
//! ```ignore
//! let outcome = page.dispatch_key_down(&KeyEvent::new(Key::from_dom(&ev.key())));
//! if outcome.default_prevented {
//!     ev.prevent_default();
//! }
//! page.dispatch_focus_in(target);
//! page.run_animation_frame();          // from requestAnimationFrame
//! page.advance_time(elapsed);          // from the host timer tick
//! ```
//!
//! # Invariants
//!
//! 1. Handlers run to completion; user callbacks never receive the page, so
//!    they cannot re-enter it mid-dispatch.
//! 2. A listener removed during a dispatch does not run for that dispatch.
//! 3. The page never reads a clock; time only moves through `advance_time`.

use std::time::Duration;

use ahash::AHashMap;
use modalkit_core::{
    AnimationId, Dom, ElementId, ElementRef, EventOutcome, KeyEvent, PointerEvent,
};

use crate::aria_hidden::AriaHiddenStack;
use crate::cleanup::{Cleanup, CleanupAction};
use crate::focus::FocusTrapStack;
use crate::listeners::{ClickOutsideOptions, EscapeKeyOptions, ListenerKind, Listeners, Route};
use crate::schedule::{FrameTask, Scheduler, TimerTask};
use crate::scroll_lock::ScrollLock;
use crate::transition::TransitionWaits;

pub(crate) type AnimationCallback = Box<dyn FnOnce(AnimationId)>;

/// A host DOM and the modal state attached to it.
pub struct Page<D: Dom> {
    pub(crate) dom: D,
    pub(crate) scroll: ScrollLock,
    pub(crate) aria: AriaHiddenStack,
    pub(crate) traps: FocusTrapStack,
    pub(crate) listeners: Listeners,
    pub(crate) scheduler: Scheduler,
    pub(crate) waits: TransitionWaits,
    pub(crate) animations: AHashMap<AnimationId, AnimationCallback>,
}

impl<D: Dom> std::fmt::Debug for Page<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("scroll_locks", &self.scroll.count())
            .field("aria_hidden", &self.aria.len())
            .field("focus_traps", &self.traps.depth())
            .field("listeners", &self.listeners.len())
            .field("pending_frames", &self.scheduler.pending_frames())
            .field("pending_timers", &self.scheduler.pending_timers())
            .field("pending_animations", &self.animations.len())
            .finish()
    }
}

impl<D: Dom> Page<D> {
    /// Attach fresh modal state to `dom`.
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            scroll: ScrollLock::default(),
            aria: AriaHiddenStack::default(),
            traps: FocusTrapStack::default(),
            listeners: Listeners::default(),
            scheduler: Scheduler::default(),
            waits: TransitionWaits::default(),
            animations: AHashMap::new(),
        }
    }

    /// The host DOM.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The host DOM, mutably. Changes made here bypass all bookkeeping.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Give the DOM back, dropping all bookkeeping without releasing anything.
    pub fn into_dom(self) -> D {
        self.dom
    }

    // --- Scroll lock ---

    /// Lock body scrolling. The returned token unlocks once.
    pub fn lock_scroll(&mut self) -> Cleanup {
        self.scroll.lock(&mut self.dom);
        Cleanup::new(CleanupAction::UnlockScroll)
    }

    /// Scroll lock bookkeeping.
    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll
    }

    /// Drop one lock, clamped at zero. The last unlock restores the body styles.
    pub fn unlock_scroll(&mut self) {
        self.scroll.unlock(&mut self.dom);
    }

    /// Outstanding scroll locks.
    pub fn scroll_lock_count(&self) -> usize {
        self.scroll.count()
    }

    /// Restore the body if locked and forget every outstanding lock.
    ///
    /// For recovery after a hot reload or a lost token; tokens issued before
    /// the reset will still decrement (clamped) when disposed.
    pub fn reset_scroll_lock(&mut self) {
        self.scroll.reset(&mut self.dom);
    }

    // --- aria-hidden ---

    /// Hide `target` from assistive technology until the token is disposed.
    ///
    /// Selectors that match nothing (or do not parse) yield a no-op token.
    pub fn mark_aria_hidden(&mut self, target: impl Into<ElementRef>) -> Cleanup {
        let target = target.into();
        let Some(element) = target.resolve(&self.dom) else {
            tracing::trace!(?target, "aria-hidden target not found");
            return Cleanup::noop();
        };
        self.aria.mark(&mut self.dom, element);
        Cleanup::new(CleanupAction::UnmarkAriaHidden(element))
    }

    /// Drop one mark from `element`; the last one restores the original attribute.
    pub fn unmark_aria_hidden(&mut self, element: ElementId) {
        if !self.aria.unmark(&mut self.dom, element) {
            tracing::trace!(%element, "aria-hidden unmark without mark");
        }
    }

    /// Elements currently marked, with their saved attributes.
    pub fn aria_hidden(&self) -> &AriaHiddenStack {
        &self.aria
    }

    /// Outstanding aria-hidden marks on `element`.
    pub fn aria_hidden_count(&self, element: ElementId) -> usize {
        self.aria.count(element)
    }

    // --- Listeners ---

    /// Call `callback` on every Escape keydown until the token is disposed.
    pub fn on_escape_key(
        &mut self,
        callback: impl FnMut(&KeyEvent) + 'static,
        options: EscapeKeyOptions,
    ) -> Cleanup {
        let id = self.listeners.add_escape(Box::new(callback), options);
        Cleanup::new(CleanupAction::RemoveListener(id))
    }

    /// Call `callback` when a pointer event lands outside `element`.
    ///
    /// With no element the listener is registered but never fires.
    pub fn on_click_outside(
        &mut self,
        element: Option<ElementId>,
        callback: impl FnMut(&PointerEvent) + 'static,
        options: ClickOutsideOptions,
    ) -> Cleanup {
        let id = self
            .listeners
            .add_click_outside(element, Box::new(callback), options);
        Cleanup::new(CleanupAction::RemoveListener(id))
    }

    /// Registered document listeners, including the shared focus-trap pair.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // --- Host-driven dispatch ---

    /// Forward a `keydown` event.
    pub fn dispatch_key_down(&mut self, event: &KeyEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        for id in self.listeners.dispatch_order(ListenerKind::KeyDown) {
            match self.listeners.route(id) {
                Some(Route::TrapKeyDown) => outcome.merge(self.trap_key_down(event)),
                Some(Route::User) => outcome.merge(self.listeners.invoke_key(id, event)),
                Some(Route::TrapFocusIn) | None => {}
            }
        }
        outcome
    }

    /// Forward a `focusin` event whose target is `target`.
    pub fn dispatch_focus_in(&mut self, target: ElementId) {
        for id in self.listeners.dispatch_order(ListenerKind::FocusIn) {
            if self.listeners.route(id) == Some(Route::TrapFocusIn) {
                self.trap_focus_in(target);
            }
        }
    }

    /// Forward a `mousedown`, `mouseup` or `click` event.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        for id in self
            .listeners
            .dispatch_order(ListenerKind::Pointer(event.kind))
        {
            outcome.merge(self.listeners.invoke_pointer(id, event, &self.dom));
        }
        outcome
    }

    /// Run every frame task queued before this call.
    ///
    /// Returns the number of tasks run. Tasks queued while running wait for
    /// the next frame.
    pub fn run_animation_frame(&mut self) -> usize {
        let mut ran = 0;
        for frame in self.scheduler.frame_batch() {
            let Some(task) = self.scheduler.take_frame(frame) else {
                continue;
            };
            ran += 1;
            match task {
                FrameTask::InitialFocus(trap) => self.run_initial_focus(trap),
                FrameTask::TransitionReady(wait) => self.finish_transition_wait(wait),
            }
        }
        ran
    }

    /// Move the virtual clock forward and fire due timers in deadline order.
    ///
    /// Returns the number of timers fired.
    pub fn advance_time(&mut self, delta: Duration) -> usize {
        self.scheduler.advance(delta);
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due() {
            fired += 1;
            match task {
                TimerTask::TransitionFallback(wait) => {
                    tracing::trace!(?wait, "transition fallback timer fired");
                    self.finish_transition_wait(wait);
                }
            }
        }
        fired
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Frame tasks waiting for the next animation frame.
    pub fn pending_frames(&self) -> usize {
        self.scheduler.pending_frames()
    }

    /// Timers not yet fired or cleared.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    pub(crate) fn release(&mut self, action: CleanupAction) {
        match action {
            CleanupAction::Noop => {}
            CleanupAction::UnlockScroll => self.unlock_scroll(),
            CleanupAction::UnmarkAriaHidden(element) => self.unmark_aria_hidden(element),
            CleanupAction::ReleaseFocusTrap(trap) => self.release_focus_trap(trap),
            CleanupAction::RemoveListener(id) => {
                self.listeners.remove(id);
            }
            CleanupAction::CancelTransitionWait(wait) => self.cancel_transition_wait(wait),
        }
    }
}
