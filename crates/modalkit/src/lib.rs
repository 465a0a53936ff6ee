#![forbid(unsafe_code)]

//! Accessibility primitives for dialogs and modals.
//!
//! Everything hangs off a [`Page`], which owns the host DOM handle together
//! with the bookkeeping a stack of open dialogs needs:
//!
//! - [`Page::lock_scroll`]: reference-counted body scroll lock with scrollbar
//!   width compensation.
//! - [`Page::mark_aria_hidden`]: reference-counted `aria-hidden="true"` on
//!   background content, restoring the original attribute on last release.
//! - [`Page::create_focus_trap`]: nested focus traps; only the innermost one
//!   handles Tab and stray focus.
//! - [`Page::on_escape_key`] / [`Page::on_click_outside`]: document listeners.
//! - [`Page::on_transition_end`] and [`Page::animate`]: exit/enter timing glue.
//! - [`Dialog`]: composes all of the above behind `activate` / `deactivate`.
//!
//! Acquisitions return a [`Cleanup`] token; disposing it releases exactly
//! that acquisition, once.
//!
//! # Example
//!
//! ```ignore
//! let mut page = Page::new(host_dom);
//! let mut dialog = Dialog::new(
//!     dialog_element,
//!     DialogOptions::default().on_close(move || close_requested.set(true)),
//! );
//! dialog.activate(&mut page);
//! // ... forward host events to `page.dispatch_*` ...
//! dialog.deactivate(&mut page);
//! ```

mod animate;
mod aria_hidden;
mod cleanup;
mod dialog;
mod focus;
mod listeners;
mod page;
mod schedule;
mod scroll_lock;
mod transition;

pub use animate::{AnimateOptions, Easing};
pub use aria_hidden::AriaHiddenStack;
pub use cleanup::Cleanup;
pub use dialog::{Dialog, DialogOptions};
pub use focus::{FocusTrapOptions, focusable_elements, is_focusable};
pub use listeners::{ClickOutsideOptions, EscapeKeyOptions};
pub use page::Page;
pub use scroll_lock::ScrollLock;

pub use modalkit_core::{
    AnimationId, Dom, ElementId, ElementRef, EventOutcome, FillMode, Key, KeyEvent, Keyframe,
    Modifiers, PointerEvent, PointerEventKind,
};
