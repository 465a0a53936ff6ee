#![forbid(unsafe_code)]

//! Input events forwarded by the host.
//!
//! The host translates native DOM events into these types before handing them
//! to the page. Dispatch reports back an [`EventOutcome`] so the host can call
//! `preventDefault()` / `stopPropagation()` on the native event it still owns.

use bitflags::bitflags;

use crate::dom::ElementId;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Logical key value (`KeyboardEvent.key`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    /// A printable character.
    Character(char),
    /// Any other named key, spelled as the DOM spells it (`"ArrowUp"`, `"F1"`).
    Named(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string onto a [`Key`].
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Named(other.to_owned()),
                }
            }
        }
    }
}

/// A `keydown` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Element the event was dispatched at, usually the focused element.
    pub target: Option<ElementId>,
}

impl KeyEvent {
    /// Key press with no modifiers and no target.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            target: None,
        }
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the target element.
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Whether Shift is held.
    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Which mouse event a click-outside listener watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerEventKind {
    #[default]
    MouseDown,
    MouseUp,
    Click,
}

impl PointerEventKind {
    /// DOM event type name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::Click => "click",
        }
    }
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Event type.
    pub kind: PointerEventKind,
    /// Element under the pointer.
    pub target: ElementId,
}

impl PointerEvent {
    /// Create a pointer event.
    pub const fn new(kind: PointerEventKind, target: ElementId) -> Self {
        Self { kind, target }
    }
}

/// What the listeners asked of the native event during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Some listener called `preventDefault()`.
    pub default_prevented: bool,
    /// Some listener called `stopPropagation()`.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// Fold another listener's outcome into this one.
    pub fn merge(&mut self, other: Self) {
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_dom_names() {
        assert_eq!(Key::from_dom("Tab"), Key::Tab);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Character('a'));
        assert_eq!(Key::from_dom("ArrowUp"), Key::Named("ArrowUp".to_owned()));
    }

    #[test]
    fn shift_detection() {
        let plain = KeyEvent::new(Key::Tab);
        assert!(!plain.shift());
        let shifted = plain.with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert!(shifted.shift());
    }

    #[test]
    fn outcome_merge_is_sticky() {
        let mut outcome = EventOutcome::default();
        outcome.merge(EventOutcome {
            default_prevented: true,
            propagation_stopped: false,
        });
        outcome.merge(EventOutcome::default());
        assert!(outcome.default_prevented);
        assert!(!outcome.propagation_stopped);
    }

    #[test]
    fn pointer_kind_names() {
        assert_eq!(PointerEventKind::default().as_str(), "mousedown");
        assert_eq!(PointerEventKind::Click.as_str(), "click");
    }
}
