#![forbid(unsafe_code)]

use modalkit_core::{Dom, ElementRef};
use modalkit_harness::{MemoryDom, SelectorError, dialog_fixture, init_tracing, selector};

#[test]
fn fixture_layout() {
    init_tracing();
    let mut dom = MemoryDom::new();
    let fx = dialog_fixture(&mut dom);
    let body = dom.body();

    assert_eq!(dom.active_element(), Some(fx.opener));
    assert!(dom.contains(body, fx.app));
    assert!(dom.contains(fx.app, fx.opener));
    assert!(!dom.contains(fx.app, fx.dialog));
    assert_eq!(
        dom.descendants(fx.dialog),
        vec![fx.first, fx.middle, fx.last]
    );
    assert_eq!(dom.tag_name(fx.last), "a");
}

#[test]
fn selectors_resolve_against_fixture() {
    let mut dom = MemoryDom::new();
    let fx = dialog_fixture(&mut dom);

    assert_eq!(dom.query_selector("#app"), Some(fx.app));
    assert_eq!(dom.query_selector("[role=dialog]"), Some(fx.dialog));
    assert_eq!(dom.query_selector("input[type='text']"), Some(fx.middle));
    assert_eq!(dom.query_selector("a[href], button"), Some(fx.opener));
    assert_eq!(dom.query_selector("main button"), None);

    assert_eq!(ElementRef::from("#dialog").resolve(&dom), Some(fx.dialog));
    assert_eq!(ElementRef::from(fx.last).resolve(&dom), Some(fx.last));
}

#[test]
fn removing_focused_subtree_blurs() {
    let mut dom = MemoryDom::new();
    let fx = dialog_fixture(&mut dom);
    dom.focus(fx.middle);
    dom.remove(fx.dialog);

    assert_eq!(dom.active_element(), None);
    assert!(!dom.is_connected(fx.middle));
    assert_eq!(dom.query_selector("#dialog"), None);
    assert_eq!(dom.focus_log(), &[fx.opener, fx.middle]);
}

#[test]
fn parse_errors_are_descriptive() {
    assert_eq!(selector::parse(""), Err(SelectorError::Empty));
    let err = selector::parse("[open").unwrap_err();
    assert!(matches!(err, SelectorError::Unterminated { offset: 0 }));
    assert!(err.to_string().contains("unterminated"));
}
