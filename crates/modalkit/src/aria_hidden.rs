#![forbid(unsafe_code)]

//! Reference-counted `aria-hidden` marking for background content.
//!
//! # Invariants
//!
//! 1. An element has at most one entry.
//! 2. While an entry exists the element carries `aria-hidden="true"`.
//! 3. When the count returns to zero the original attribute is restored
//!    exactly: the original string, or no attribute at all.

use modalkit_core::{Dom, ElementId};

const ARIA_HIDDEN: &str = "aria-hidden";

#[derive(Debug, Clone, PartialEq, Eq)]
struct AriaHiddenEntry {
    element: ElementId,
    original: Option<String>,
    count: usize,
}

/// Ordered set of elements currently hidden from assistive technology.
#[derive(Debug, Clone, Default)]
pub struct AriaHiddenStack {
    entries: Vec<AriaHiddenEntry>,
}

impl AriaHiddenStack {
    /// Number of distinct elements marked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outstanding marks on `element`.
    pub fn count(&self, element: ElementId) -> usize {
        self.entries
            .iter()
            .find(|e| e.element == element)
            .map_or(0, |e| e.count)
    }

    pub(crate) fn mark<D: Dom + ?Sized>(&mut self, dom: &mut D, element: ElementId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.element == element) {
            entry.count += 1;
            return;
        }
        let original = dom.attribute(element, ARIA_HIDDEN);
        self.entries.push(AriaHiddenEntry {
            element,
            original,
            count: 1,
        });
        dom.set_attribute(element, ARIA_HIDDEN, "true");
    }

    /// Returns `false` when `element` had no entry.
    pub(crate) fn unmark<D: Dom + ?Sized>(&mut self, dom: &mut D, element: ElementId) -> bool {
        let Some(idx) = self.entries.iter().position(|e| e.element == element) else {
            return false;
        };
        let entry = &mut self.entries[idx];
        entry.count -= 1;
        if entry.count == 0 {
            let entry = self.entries.remove(idx);
            match entry.original {
                Some(value) => dom.set_attribute(element, ARIA_HIDDEN, &value),
                None => dom.remove_attribute(element, ARIA_HIDDEN),
            }
        }
        true
    }
}
