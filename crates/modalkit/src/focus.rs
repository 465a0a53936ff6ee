#![forbid(unsafe_code)]

//! Focusable-element discovery and the nested focus-trap stack.
//!
//! Traps form a LIFO stack. Only the top trap reacts to Tab and to focus
//! entering the document outside its container; traps below it are dormant
//! until everything above them is released. All traps share one pair of
//! document listeners (`keydown`, `focusin`), registered when the stack
//! becomes non-empty and removed when it empties again.
//!
//! # Invariants
//!
//! 1. Listener pair is registered iff the stack is non-empty.
//! 2. Tab / focus-in handling only ever consults the top trap's container.
//! 3. Releasing a trap cancels its pending initial focus before anything else,
//!    so a trap released within the same frame never steals focus.
//! 4. Releasing a trap that is not on top removes it in place; the top trap
//!    keeps control.
//!
//! # Focusable Elements
//!
//! An element is focusable when it matches one of
//!
//! | Selector | Notes |
//! |----------|-------|
//! | `a[href]` | |
//! | `button`, `input`, `select`, `textarea` | without `disabled` |
//! | `[tabindex]` | any value but `-1` |
//!
//! and carries neither `disabled` nor `aria-hidden="true"`.

use modalkit_core::{Dom, ElementId, EventOutcome, Key, KeyEvent};

use crate::cleanup::{Cleanup, CleanupAction};
use crate::listeners::ListenerId;
use crate::page::Page;
use crate::schedule::{FrameId, FrameTask};

/// Handle to a trap on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TrapId(u64);

impl TrapId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Options for [`Page::create_focus_trap`](crate::Page::create_focus_trap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrapOptions {
    /// Move focus into the container on the next animation frame. Default `true`.
    pub initial_focus: bool,
    /// Preferred initial focus target; ignored unless inside the container.
    pub initial_focus_element: Option<ElementId>,
    /// Refocus the previously focused element on release. Default `true`.
    pub return_focus: bool,
}

impl Default for FocusTrapOptions {
    fn default() -> Self {
        Self {
            initial_focus: true,
            initial_focus_element: None,
            return_focus: true,
        }
    }
}

impl FocusTrapOptions {
    /// Set `initial_focus`.
    pub fn initial_focus(mut self, value: bool) -> Self {
        self.initial_focus = value;
        self
    }

    /// Set the preferred initial focus target.
    pub fn initial_focus_element(mut self, element: Option<ElementId>) -> Self {
        self.initial_focus_element = element;
        self
    }

    /// Set `return_focus`.
    pub fn return_focus(mut self, value: bool) -> Self {
        self.return_focus = value;
        self
    }
}

fn is_candidate<D: Dom + ?Sized>(dom: &D, element: ElementId) -> bool {
    let by_tag = match dom.tag_name(element).as_str() {
        "a" => dom.has_attribute(element, "href"),
        "button" | "input" | "select" | "textarea" => !dom.has_attribute(element, "disabled"),
        _ => false,
    };
    by_tag
        || dom
            .attribute(element, "tabindex")
            .is_some_and(|value| value != "-1")
}

/// Whether `element` can receive keyboard focus inside a trap.
pub fn is_focusable<D: Dom + ?Sized>(dom: &D, element: ElementId) -> bool {
    is_candidate(dom, element)
        && !dom.has_attribute(element, "disabled")
        && dom.attribute(element, "aria-hidden").as_deref() != Some("true")
}

/// Focusable descendants of `container` in document order.
///
/// A missing container yields an empty list.
pub fn focusable_elements<D: Dom + ?Sized>(
    dom: &D,
    container: Option<ElementId>,
) -> Vec<ElementId> {
    let Some(container) = container else {
        return Vec::new();
    };
    dom.descendants(container)
        .into_iter()
        .filter(|el| is_focusable(dom, *el))
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct TrapEntry {
    pub(crate) id: TrapId,
    pub(crate) container: ElementId,
    pub(crate) options: FocusTrapOptions,
    pub(crate) previously_focused: Option<ElementId>,
    pub(crate) pending_focus: Option<FrameId>,
}

/// The nested trap stack, bottom first.
#[derive(Debug, Default)]
pub(crate) struct FocusTrapStack {
    entries: Vec<TrapEntry>,
    listeners: Option<(ListenerId, ListenerId)>,
    next_id: u64,
}

impl FocusTrapStack {
    pub(crate) fn next_id(&mut self) -> TrapId {
        self.next_id += 1;
        TrapId::from_raw(self.next_id)
    }

    pub(crate) fn depth(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn top(&self) -> Option<&TrapEntry> {
        self.entries.last()
    }

    pub(crate) fn get_mut(&mut self, id: TrapId) -> Option<&mut TrapEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn push(&mut self, entry: TrapEntry) {
        self.entries.push(entry);
    }

    /// Remove a trap from any position.
    pub(crate) fn remove(&mut self, id: TrapId) -> Option<TrapEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub(crate) fn has_listeners(&self) -> bool {
        self.listeners.is_some()
    }

    pub(crate) fn set_listeners(&mut self, pair: (ListenerId, ListenerId)) {
        self.listeners = Some(pair);
    }

    pub(crate) fn take_listeners(&mut self) -> Option<(ListenerId, ListenerId)> {
        self.listeners.take()
    }
}

impl<D: Dom> Page<D> {
    /// Focusable descendants of `container`, see [`focusable_elements`].
    pub fn focusable_elements(&self, container: Option<ElementId>) -> Vec<ElementId> {
        focusable_elements(&self.dom, container)
    }

    /// Focus the first focusable descendant of `container`.
    ///
    /// Returns `false` when there is none.
    pub fn focus_first_element(&mut self, container: ElementId) -> bool {
        match focusable_elements(&self.dom, Some(container)).first() {
            Some(&first) => {
                self.dom.focus(first);
                true
            }
            None => false,
        }
    }

    /// Push a focus trap for `container` onto the stack.
    ///
    /// The currently focused element is remembered for `return_focus`.
    /// Initial focus, when enabled, happens on the next animation frame.
    pub fn create_focus_trap(&mut self, container: ElementId, options: FocusTrapOptions) -> Cleanup {
        let previously_focused = self.dom.active_element();
        let id = self.traps.next_id();

        if !self.traps.has_listeners() {
            let pair = self.listeners.add_trap_pair();
            self.traps.set_listeners(pair);
        }

        let pending_focus = options
            .initial_focus
            .then(|| self.scheduler.request_frame(FrameTask::InitialFocus(id)));

        self.traps.push(TrapEntry {
            id,
            container,
            options,
            previously_focused,
            pending_focus,
        });
        tracing::debug!(%container, depth = self.traps.depth(), "focus trap pushed");

        Cleanup::new(CleanupAction::ReleaseFocusTrap(id))
    }

    /// Number of traps on the stack.
    pub fn focus_trap_depth(&self) -> usize {
        self.traps.depth()
    }

    /// Container of the top (active) trap.
    pub fn active_trap_container(&self) -> Option<ElementId> {
        self.traps.top().map(|t| t.container)
    }

    pub(crate) fn release_focus_trap(&mut self, id: TrapId) {
        let Some(entry) = self.traps.remove(id) else {
            tracing::trace!(?id, "focus trap already released");
            return;
        };
        if let Some(frame) = entry.pending_focus {
            self.scheduler.cancel_frame(frame);
        }
        if self.traps.is_empty()
            && let Some((key_down, focus_in)) = self.traps.take_listeners()
        {
            self.listeners.remove(key_down);
            self.listeners.remove(focus_in);
        }
        tracing::debug!(
            container = %entry.container,
            depth = self.traps.depth(),
            "focus trap released"
        );

        if entry.options.return_focus
            && let Some(previous) = entry.previously_focused
        {
            self.dom.focus(previous);
        }
    }

    pub(crate) fn run_initial_focus(&mut self, id: TrapId) {
        let Some(entry) = self.traps.get_mut(id) else {
            return;
        };
        entry.pending_focus = None;
        let container = entry.container;
        let preferred = entry.options.initial_focus_element;

        match preferred {
            Some(element) if self.dom.contains(container, element) => self.dom.focus(element),
            _ => {
                self.focus_first_element(container);
            }
        }
    }

    pub(crate) fn trap_key_down(&mut self, event: &KeyEvent) -> EventOutcome {
        if event.key != Key::Tab {
            return EventOutcome::default();
        }
        let Some(container) = self.active_trap_container() else {
            return EventOutcome::default();
        };
        let _span =
            tracing::trace_span!("focus_trap_tab", %container, shift = event.shift()).entered();

        let focusable = focusable_elements(&self.dom, Some(container));
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return EventOutcome::default();
        };

        let active = self.dom.active_element();
        let outside = !active.is_some_and(|el| self.dom.contains(container, el));
        let wrap_to = if event.shift() {
            (active == Some(first) || outside).then_some(last)
        } else {
            (active == Some(last) || outside).then_some(first)
        };

        match wrap_to {
            Some(target) => {
                self.dom.focus(target);
                EventOutcome {
                    default_prevented: true,
                    propagation_stopped: false,
                }
            }
            None => EventOutcome::default(),
        }
    }

    pub(crate) fn trap_focus_in(&mut self, target: ElementId) {
        let Some(container) = self.active_trap_container() else {
            return;
        };
        if self.dom.contains(container, target) {
            return;
        }
        tracing::trace!(%container, %target, "focus escaped trap, redirecting");
        self.focus_first_element(container);
    }
}
