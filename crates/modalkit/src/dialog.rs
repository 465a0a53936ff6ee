#![forbid(unsafe_code)]

//! Dialog facade: one activate/deactivate pair over the modal primitives.
//!
//! # State Machine
//!
//! ```text
//! Inactive --activate--> Active --deactivate--> Inactive
//! ```
//!
//! Both transitions are idempotent. Activation installs, in order and each
//! behind its option flag:
//!
//! 1. scroll lock
//! 2. `aria-hidden` on the application root
//! 3. focus trap on the dialog element
//! 4. Escape handler calling `on_close`
//! 5. click-outside handler calling `on_close`
//!
//! # Invariants
//!
//! 1. Deactivation disposes cleanups in strict reverse order, so focus is
//!    returned before the background loses `aria-hidden`, and the scroll lock
//!    is released last.
//! 2. After deactivation the cleanup list is empty.
//! 3. Escape and click-outside handlers are only installed when `on_close`
//!    is set.

use std::rc::Rc;

use modalkit_core::{Dom, ElementId, ElementRef};

use crate::cleanup::Cleanup;
use crate::focus::FocusTrapOptions;
use crate::listeners::{ClickOutsideOptions, EscapeKeyOptions};
use crate::page::Page;

/// Configuration for a [`Dialog`].
#[derive(Clone)]
pub struct DialogOptions {
    /// Application root hidden from assistive technology. Default `#app`.
    pub app_element: Option<ElementRef>,
    /// Call `on_close` on Escape. Default `true`.
    pub close_on_escape: bool,
    /// Call `on_close` on a mousedown outside the dialog. Default `true`.
    pub close_on_click_outside: bool,
    /// Trap focus inside the dialog. Default `true`.
    pub trap_focus: bool,
    /// Lock body scrolling. Default `true`.
    pub lock_scroll: bool,
    /// Default `true`.
    pub initial_focus: bool,
    /// Default `None`.
    pub initial_focus_element: Option<ElementId>,
    /// Default `true`.
    pub return_focus: bool,
    /// Close request callback. Default `None`.
    pub on_close: Option<Rc<dyn Fn()>>,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            app_element: Some(ElementRef::from("#app")),
            close_on_escape: true,
            close_on_click_outside: true,
            trap_focus: true,
            lock_scroll: true,
            initial_focus: true,
            initial_focus_element: None,
            return_focus: true,
            on_close: None,
        }
    }
}

impl std::fmt::Debug for DialogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogOptions")
            .field("app_element", &self.app_element)
            .field("close_on_escape", &self.close_on_escape)
            .field("close_on_click_outside", &self.close_on_click_outside)
            .field("trap_focus", &self.trap_focus)
            .field("lock_scroll", &self.lock_scroll)
            .field("initial_focus", &self.initial_focus)
            .field("initial_focus_element", &self.initial_focus_element)
            .field("return_focus", &self.return_focus)
            .field("on_close", &self.on_close.as_ref().map(|_| ".."))
            .finish()
    }
}

impl DialogOptions {
    /// Set the application root, or `None` to leave the background alone.
    pub fn app_element(mut self, element: Option<impl Into<ElementRef>>) -> Self {
        self.app_element = element.map(Into::into);
        self
    }

    /// Set `close_on_escape`.
    pub fn close_on_escape(mut self, value: bool) -> Self {
        self.close_on_escape = value;
        self
    }

    /// Set `close_on_click_outside`.
    pub fn close_on_click_outside(mut self, value: bool) -> Self {
        self.close_on_click_outside = value;
        self
    }

    /// Set `trap_focus`.
    pub fn trap_focus(mut self, value: bool) -> Self {
        self.trap_focus = value;
        self
    }

    /// Set `lock_scroll`.
    pub fn lock_scroll(mut self, value: bool) -> Self {
        self.lock_scroll = value;
        self
    }

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

    /// Set the close request callback.
    pub fn on_close(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(callback));
        self
    }

    fn focus_trap(&self) -> FocusTrapOptions {
        FocusTrapOptions::default()
            .initial_focus(self.initial_focus)
            .initial_focus_element(self.initial_focus_element)
            .return_focus(self.return_focus)
    }
}

/// A dialog element plus the resources it holds while active.
#[derive(Debug)]
pub struct Dialog {
    element: ElementId,
    options: DialogOptions,
    cleanups: Vec<Cleanup>,
    active: bool,
}

impl Dialog {
    /// Create an inactive dialog for `element`.
    pub fn new(element: ElementId, options: DialogOptions) -> Self {
        Self {
            element,
            options,
            cleanups: Vec::new(),
            active: false,
        }
    }

    /// The dialog element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Whether the dialog currently holds its resources.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Install every enabled primitive. No-op when already active.
    pub fn activate<D: Dom>(&mut self, page: &mut Page<D>) {
        if self.active {
            return;
        }
        self.active = true;

        if self.options.lock_scroll {
            self.cleanups.push(page.lock_scroll());
        }
        if let Some(app) = self.options.app_element.clone() {
            self.cleanups.push(page.mark_aria_hidden(app));
        }
        if self.options.trap_focus {
            let trap = page.create_focus_trap(self.element, self.options.focus_trap());
            self.cleanups.push(trap);
        }
        if let Some(on_close) = self.options.on_close.clone() {
            if self.options.close_on_escape {
                let on_close = Rc::clone(&on_close);
                let escape = page.on_escape_key(move |_| on_close(), EscapeKeyOptions::default());
                self.cleanups.push(escape);
            }
            if self.options.close_on_click_outside {
                let outside = page.on_click_outside(
                    Some(self.element),
                    move |_| on_close(),
                    ClickOutsideOptions::default(),
                );
                self.cleanups.push(outside);
            }
        }
        tracing::debug!(
            element = %self.element,
            installed = self.cleanups.len(),
            "dialog activated"
        );
    }

    /// Release everything in reverse order. No-op when inactive.
    pub fn deactivate<D: Dom>(&mut self, page: &mut Page<D>) {
        if !self.active {
            return;
        }
        self.active = false;

        while let Some(mut cleanup) = self.cleanups.pop() {
            cleanup.dispose(page);
        }
        tracing::debug!(element = %self.element, "dialog deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalkit_core::{Key, KeyEvent, PointerEvent, PointerEventKind};
    use modalkit_harness::{MemoryDom, dialog_fixture};
    use std::cell::Cell;

    fn closing_options(closed: &Rc<Cell<u32>>) -> DialogOptions {
        let closed = Rc::clone(closed);
        DialogOptions::default().on_close(move || closed.set(closed.get() + 1))
    }

    #[test]
    fn activation_installs_everything() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let closed = Rc::new(Cell::new(0));
        let mut dialog = Dialog::new(fx.dialog, closing_options(&closed));

        dialog.activate(&mut page);
        assert!(dialog.is_active());
        assert_eq!(page.scroll_lock_count(), 1);
        assert_eq!(page.aria_hidden_count(fx.app), 1);
        assert_eq!(page.active_trap_container(), Some(fx.dialog));
        // trap pair + escape + click-outside
        assert_eq!(page.listener_count(), 4);

        page.run_animation_frame();
        assert_eq!(page.dom().active_element(), Some(fx.first));

        dialog.deactivate(&mut page);
        assert!(!dialog.is_active());
        assert_eq!(page.scroll_lock_count(), 0);
        assert_eq!(page.aria_hidden_count(fx.app), 0);
        assert_eq!(page.focus_trap_depth(), 0);
        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.dom().active_element(), Some(fx.opener));
    }

    #[test]
    fn activate_and_deactivate_are_idempotent() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let mut dialog = Dialog::new(fx.dialog, DialogOptions::default());

        dialog.deactivate(&mut page);
        dialog.activate(&mut page);
        dialog.activate(&mut page);
        assert_eq!(page.scroll_lock_count(), 1);
        assert_eq!(page.focus_trap_depth(), 1);
        dialog.deactivate(&mut page);
        dialog.deactivate(&mut page);
        assert_eq!(page.scroll_lock_count(), 0);
    }

    #[test]
    fn close_handlers_need_on_close() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let mut dialog = Dialog::new(fx.dialog, DialogOptions::default());
        dialog.activate(&mut page);
        assert_eq!(page.listener_count(), 2);
        dialog.deactivate(&mut page);
    }

    #[test]
    fn escape_and_outside_click_request_close() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let closed = Rc::new(Cell::new(0));
        let mut dialog = Dialog::new(fx.dialog, closing_options(&closed));
        dialog.activate(&mut page);

        page.dispatch_key_down(&KeyEvent::new(Key::Escape));
        assert_eq!(closed.get(), 1);
        page.dispatch_pointer(&PointerEvent::new(PointerEventKind::MouseDown, fx.middle));
        assert_eq!(closed.get(), 1);
        page.dispatch_pointer(&PointerEvent::new(PointerEventKind::MouseDown, fx.app));
        assert_eq!(closed.get(), 2);

        dialog.deactivate(&mut page);
        page.dispatch_key_down(&KeyEvent::new(Key::Escape));
        assert_eq!(closed.get(), 2);
    }

    #[test]
    fn disabled_features_are_skipped() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let closed = Rc::new(Cell::new(0));
        let options = closing_options(&closed)
            .lock_scroll(false)
            .app_element(None::<ElementRef>)
            .trap_focus(false)
            .close_on_escape(false)
            .close_on_click_outside(false);
        let mut dialog = Dialog::new(fx.dialog, options);

        dialog.activate(&mut page);
        assert_eq!(page.scroll_lock_count(), 0);
        assert_eq!(page.aria_hidden_count(fx.app), 0);
        assert_eq!(page.focus_trap_depth(), 0);
        assert_eq!(page.listener_count(), 0);
        dialog.deactivate(&mut page);
    }

    #[test]
    fn missing_app_root_is_tolerated() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let options = DialogOptions::default().app_element(Some("#root"));
        let mut dialog = Dialog::new(fx.dialog, options);
        dialog.activate(&mut page);
        assert_eq!(page.aria_hidden_count(fx.app), 0);
        dialog.deactivate(&mut page);
        assert_eq!(page.scroll_lock_count(), 0);
    }

    #[test]
    fn preferred_initial_focus_is_used() {
        let mut dom = MemoryDom::new();
        let fx = dialog_fixture(&mut dom);
        let mut page = Page::new(dom);
        let options = DialogOptions::default().initial_focus_element(Some(fx.last));
        let mut dialog = Dialog::new(fx.dialog, options);
        dialog.activate(&mut page);
        page.run_animation_frame();
        assert_eq!(page.dom().active_element(), Some(fx.last));
        dialog.deactivate(&mut page);
    }

    #[test]
    fn options_debug_hides_callback() {
        let text = format!("{:?}", DialogOptions::default().on_close(|| {}));
        assert!(text.contains("on_close: Some(\"..\")"));
    }
}
