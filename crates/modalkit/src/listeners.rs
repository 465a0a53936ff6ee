#![forbid(unsafe_code)]

//! Document-level listener registry, escape-key and click-outside handlers.
//!
//! Listeners are stored in registration order. Dispatch visits capture
//! listeners first, then bubble listeners, matching what a document-level
//! `addEventListener` sees in a browser. The two focus-trap listeners live
//! here too, registered by the trap stack when it becomes non-empty.
//!
//! # Failure Modes
//!
//! - Removing an unknown listener id returns `false`.
//! - Click-outside with no element never fires.
//! - `stop_propagation` on an escape handler is reported to the host but does
//!   not stop other document listeners, as in the DOM.

use modalkit_core::{
    Dom, ElementId, EventOutcome, Key, KeyEvent, PointerEvent, PointerEventKind,
};

/// Handle to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

/// Options for [`Page::on_escape_key`](crate::Page::on_escape_key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EscapeKeyOptions {
    /// Ask the host to call `preventDefault()` on the Escape event.
    pub prevent_default: bool,
    /// Ask the host to call `stopPropagation()` on the Escape event.
    pub stop_propagation: bool,
}

impl EscapeKeyOptions {
    /// Set `prevent_default`.
    pub fn prevent_default(mut self, value: bool) -> Self {
        self.prevent_default = value;
        self
    }

    /// Set `stop_propagation`.
    pub fn stop_propagation(mut self, value: bool) -> Self {
        self.stop_propagation = value;
        self
    }
}

/// Options for [`Page::on_click_outside`](crate::Page::on_click_outside).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutsideOptions {
    /// Mouse event to watch. Default `mousedown`.
    pub event: PointerEventKind,
    /// Listen in the capture phase. Default `true`.
    pub capture: bool,
}

impl Default for ClickOutsideOptions {
    fn default() -> Self {
        Self {
            event: PointerEventKind::MouseDown,
            capture: true,
        }
    }
}

impl ClickOutsideOptions {
    /// Set the watched event.
    pub fn event(mut self, event: PointerEventKind) -> Self {
        self.event = event;
        self
    }

    /// Set the listener phase.
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }
}

/// Which event a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerKind {
    KeyDown,
    FocusIn,
    Pointer(PointerEventKind),
}

pub(crate) type KeyCallback = Box<dyn FnMut(&KeyEvent)>;
pub(crate) type PointerCallback = Box<dyn FnMut(&PointerEvent)>;

enum Handler {
    TrapKeyDown,
    TrapFocusIn,
    Escape {
        callback: KeyCallback,
        options: EscapeKeyOptions,
    },
    ClickOutside {
        element: Option<ElementId>,
        callback: PointerCallback,
    },
}

/// How the page routes a listener during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    TrapKeyDown,
    TrapFocusIn,
    User,
}

struct Listener {
    id: ListenerId,
    kind: ListenerKind,
    capture: bool,
    handler: Handler,
}

#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl Listeners {
    fn add(&mut self, kind: ListenerKind, capture: bool, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Listener {
            id,
            kind,
            capture,
            handler,
        });
        id
    }

    pub(crate) fn add_trap_pair(&mut self) -> (ListenerId, ListenerId) {
        let key_down = self.add(ListenerKind::KeyDown, false, Handler::TrapKeyDown);
        let focus_in = self.add(ListenerKind::FocusIn, false, Handler::TrapFocusIn);
        (key_down, focus_in)
    }

    pub(crate) fn add_escape(
        &mut self,
        callback: KeyCallback,
        options: EscapeKeyOptions,
    ) -> ListenerId {
        self.add(
            ListenerKind::KeyDown,
            false,
            Handler::Escape { callback, options },
        )
    }

    pub(crate) fn add_click_outside(
        &mut self,
        element: Option<ElementId>,
        callback: PointerCallback,
        options: ClickOutsideOptions,
    ) -> ListenerId {
        self.add(
            ListenerKind::Pointer(options.event),
            options.capture,
            Handler::ClickOutside { element, callback },
        )
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Listener ids for `kind` in dispatch order: capture first, then bubble.
    pub(crate) fn dispatch_order(&self, kind: ListenerKind) -> Vec<ListenerId> {
        let matching = || self.entries.iter().filter(move |l| l.kind == kind);
        matching()
            .filter(|l| l.capture)
            .chain(matching().filter(|l| !l.capture))
            .map(|l| l.id)
            .collect()
    }

    /// Routing for a listener still registered, `None` once removed.
    pub(crate) fn route(&self, id: ListenerId) -> Option<Route> {
        let listener = self.entries.iter().find(|l| l.id == id)?;
        Some(match listener.handler {
            Handler::TrapKeyDown => Route::TrapKeyDown,
            Handler::TrapFocusIn => Route::TrapFocusIn,
            Handler::Escape { .. } | Handler::ClickOutside { .. } => Route::User,
        })
    }

    /// Run a user key handler.
    pub(crate) fn invoke_key(&mut self, id: ListenerId, event: &KeyEvent) -> EventOutcome {
        let Some(listener) = self.entries.iter_mut().find(|l| l.id == id) else {
            return EventOutcome::default();
        };
        match &mut listener.handler {
            Handler::Escape { callback, options } if event.key == Key::Escape => {
                callback(event);
                EventOutcome {
                    default_prevented: options.prevent_default,
                    propagation_stopped: options.stop_propagation,
                }
            }
            _ => EventOutcome::default(),
        }
    }

    /// Run a user pointer handler.
    pub(crate) fn invoke_pointer<D: Dom + ?Sized>(
        &mut self,
        id: ListenerId,
        event: &PointerEvent,
        dom: &D,
    ) -> EventOutcome {
        let Some(listener) = self.entries.iter_mut().find(|l| l.id == id) else {
            return EventOutcome::default();
        };
        if let Handler::ClickOutside { element, callback } = &mut listener.handler {
            let Some(element) = *element else {
                return EventOutcome::default();
            };
            if !dom.contains(element, event.target) {
                callback(event);
            }
        }
        EventOutcome::default()
    }
}
