#![forbid(unsafe_code)]

//! Focus trap behavior driven through host events.

use modalkit::{FocusTrapOptions, Page};
use modalkit_core::{Dom, ElementId, Key, KeyEvent, Modifiers};
use modalkit_harness::{DialogFixture, MemoryDom, dialog_fixture, init_tracing};

fn tab() -> KeyEvent {
    KeyEvent::new(Key::Tab)
}

fn shift_tab() -> KeyEvent {
    KeyEvent::new(Key::Tab).with_modifiers(Modifiers::SHIFT)
}

fn setup() -> (Page<MemoryDom>, DialogFixture) {
    init_tracing();
    let mut dom = MemoryDom::new();
    let fx = dialog_fixture(&mut dom);
    (Page::new(dom), fx)
}

fn focused(page: &Page<MemoryDom>) -> Option<ElementId> {
    page.dom().active_element()
}

#[test]
fn initial_focus_waits_for_next_frame() {
    let (mut page, fx) = setup();
    let mut trap = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    assert_eq!(focused(&page), Some(fx.opener));

    assert_eq!(page.run_animation_frame(), 1);
    assert_eq!(focused(&page), Some(fx.first));

    trap.dispose(&mut page);
    assert_eq!(focused(&page), Some(fx.opener));
}

#[test]
fn release_before_frame_cancels_initial_focus() {
    let (mut page, fx) = setup();
    let mut trap = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    trap.dispose(&mut page);
    assert_eq!(page.run_animation_frame(), 0);
    assert_eq!(focused(&page), Some(fx.opener));
}

#[test]
fn tab_wraps_at_both_ends() {
    let (mut page, fx) = setup();
    let _trap = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    page.run_animation_frame();

    // Moving between middle controls is left to the browser.
    page.dom_mut().focus(fx.middle);
    assert!(!page.dispatch_key_down(&tab()).default_prevented);
    assert_eq!(focused(&page), Some(fx.middle));

    page.dom_mut().focus(fx.last);
    assert!(page.dispatch_key_down(&tab()).default_prevented);
    assert_eq!(focused(&page), Some(fx.first));

    assert!(page.dispatch_key_down(&shift_tab()).default_prevented);
    assert_eq!(focused(&page), Some(fx.last));
}

#[test]
fn tab_from_outside_pulls_focus_in() {
    let (mut page, fx) = setup();
    let options = FocusTrapOptions::default().initial_focus(false);
    let _trap = page.create_focus_trap(fx.dialog, options);
    assert_eq!(focused(&page), Some(fx.opener));

    assert!(page.dispatch_key_down(&tab()).default_prevented);
    assert_eq!(focused(&page), Some(fx.first));

    page.dom_mut().focus(fx.opener);
    assert!(page.dispatch_key_down(&shift_tab()).default_prevented);
    assert_eq!(focused(&page), Some(fx.last));
}

#[test]
fn other_keys_pass_through() {
    let (mut page, fx) = setup();
    let _trap = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    page.run_animation_frame();
    page.dom_mut().focus(fx.last);
    let outcome = page.dispatch_key_down(&KeyEvent::new(Key::Enter));
    assert!(!outcome.default_prevented);
    assert_eq!(focused(&page), Some(fx.last));
}

#[test]
fn focus_escaping_the_trap_is_redirected() {
    let (mut page, fx) = setup();
    let _trap = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    page.run_animation_frame();

    page.dom_mut().focus(fx.opener);
    page.dispatch_focus_in(fx.opener);
    assert_eq!(focused(&page), Some(fx.first));

    page.dom_mut().focus(fx.middle);
    page.dispatch_focus_in(fx.middle);
    assert_eq!(focused(&page), Some(fx.middle));
}

#[test]
fn empty_container_leaves_tab_alone() {
    let (mut page, _fx) = setup();
    let body = page.dom().body();
    let empty = page.dom_mut().element(body, "div", &[]);
    let _trap = page.create_focus_trap(empty, FocusTrapOptions::default());
    page.run_animation_frame();
    assert!(!page.dispatch_key_down(&tab()).default_prevented);
}

#[test]
fn preferred_initial_focus_must_be_inside() {
    let (mut page, fx) = setup();
    let options = FocusTrapOptions::default().initial_focus_element(Some(fx.opener));
    let _trap = page.create_focus_trap(fx.dialog, options);
    page.run_animation_frame();
    assert_eq!(focused(&page), Some(fx.first));
}

#[test]
fn nested_traps_hand_control_back() {
    let (mut page, fx) = setup();
    let mut outer = page.create_focus_trap(fx.dialog, FocusTrapOptions::default());
    page.run_animation_frame();
    assert_eq!(focused(&page), Some(fx.first));

    let body = page.dom().body();
    let confirm = page.dom_mut().element(body, "div", &[("role", "alertdialog")]);
    let yes = page.dom_mut().element(confirm, "button", &[]);
    let no = page.dom_mut().element(confirm, "button", &[]);

    let mut inner = page.create_focus_trap(confirm, FocusTrapOptions::default());
    assert_eq!(page.focus_trap_depth(), 2);
    assert_eq!(page.listener_count(), 2);
    page.run_animation_frame();
    assert_eq!(focused(&page), Some(yes));

    page.dom_mut().focus(no);
    page.dispatch_key_down(&tab());
    assert_eq!(focused(&page), Some(yes));

    // Focus inside the outer dialog is outside the inner trap.
    page.dom_mut().focus(fx.middle);
    page.dispatch_focus_in(fx.middle);
    assert_eq!(focused(&page), Some(yes));

    // Focus goes back to where it was when the inner trap opened.
    inner.dispose(&mut page);
    assert_eq!(page.active_trap_container(), Some(fx.dialog));
    assert_eq!(focused(&page), Some(fx.first));

    page.dom_mut().focus(fx.last);
    page.dispatch_key_down(&tab());
    assert_eq!(focused(&page), Some(fx.first));

    outer.dispose(&mut page);
    assert_eq!(page.listener_count(), 0);
    assert_eq!(focused(&page), Some(fx.opener));
}

#[test]
fn releasing_lower_trap_keeps_top_in_control() {
    let (mut page, fx) = setup();
    let options = FocusTrapOptions::default().initial_focus(false);
    let mut outer = page.create_focus_trap(fx.dialog, options);

    let body = page.dom().body();
    let panel = page.dom_mut().element(body, "div", &[]);
    let only = page.dom_mut().element(panel, "button", &[]);
    let mut inner = page.create_focus_trap(panel, options);

    outer.dispose(&mut page);
    assert_eq!(page.active_trap_container(), Some(panel));
    assert_eq!(page.listener_count(), 2);

    page.dom_mut().focus(fx.first);
    page.dispatch_focus_in(fx.first);
    assert_eq!(focused(&page), Some(only));

    inner.dispose(&mut page);
    assert_eq!(page.focus_trap_depth(), 0);
}

#[test]
fn return_focus_can_be_disabled() {
    let (mut page, fx) = setup();
    let options = FocusTrapOptions::default().return_focus(false);
    let mut trap = page.create_focus_trap(fx.dialog, options);
    page.run_animation_frame();
    trap.dispose(&mut page);
    assert_eq!(focused(&page), Some(fx.first));
}

#[test]
fn focus_first_element_reports_success() {
    let (mut page, fx) = setup();
    assert!(page.focus_first_element(fx.dialog));
    assert_eq!(focused(&page), Some(fx.first));

    let body = page.dom().body();
    let empty = page.dom_mut().element(body, "section", &[]);
    assert!(!page.focus_first_element(empty));
    assert_eq!(
        page.focusable_elements(Some(fx.dialog)),
        vec![fx.first, fx.middle, fx.last]
    );
}
