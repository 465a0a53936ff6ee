#![forbid(unsafe_code)]

//! Test harness for modalkit.
//!
//! [`MemoryDom`] is a deterministic, in-memory implementation of
//! [`modalkit_core::Dom`]: no browser, no timers, no randomness. Tests build a
//! small tree, hand the DOM to a page, and inspect attributes, styles and the
//! focus log afterwards.
//!
//! [`dialog_fixture`] builds the tree most dialog tests start from.

pub mod memory_dom;
pub mod selector;

pub use memory_dom::{AnimationRecord, MemoryDom};
pub use selector::SelectorError;

use modalkit_core::{Dom, ElementId};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Elements of the standard dialog fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogFixture {
    /// `<main id="app">`, the background content.
    pub app: ElementId,
    /// Button inside the app that holds focus before the dialog opens.
    pub opener: ElementId,
    /// `<div role="dialog">`, a sibling of the app.
    pub dialog: ElementId,
    /// First focusable control in the dialog.
    pub first: ElementId,
    /// Middle control (a text input).
    pub middle: ElementId,
    /// Last focusable control in the dialog.
    pub last: ElementId,
}

/// Build `<main id="app"><button/></main><div role="dialog">button, input, a[href]</div>`
/// under the body and focus the opener button.
pub fn dialog_fixture(dom: &mut MemoryDom) -> DialogFixture {
    let body = dom.body();
    let app = dom.element(body, "main", &[("id", "app")]);
    let opener = dom.element(app, "button", &[("id", "opener")]);
    let dialog = dom.element(body, "div", &[("role", "dialog"), ("id", "dialog")]);
    let first = dom.element(dialog, "button", &[("id", "close")]);
    let middle = dom.element(dialog, "input", &[("type", "text")]);
    let last = dom.element(dialog, "a", &[("href", "#more")]);
    dom.focus(opener);
    DialogFixture {
        app,
        opener,
        dialog,
        first,
        middle,
        last,
    }
}
