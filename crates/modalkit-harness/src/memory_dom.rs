#![forbid(unsafe_code)]

//! Deterministic in-memory [`Dom`] implementation.
//!
//! The tree starts as `<html><body></body></html>`. Elements are created
//! detached and attached with [`MemoryDom::append_child`]. Computed
//! `transition-duration` is modelled by the inline `transition-duration`
//! style so tests can configure it directly.
//!
//! # Invariants
//!
//! 1. Element ids are indices into the node table and are never reused.
//! 2. An element has at most one parent; appending moves it.
//! 3. Only connected elements (reachable from `<html>`) can take focus.
//! 4. Every successful `focus` call is appended to the focus log.

use modalkit_core::dom::{AnimationId, AnimationTiming, Dom, ElementId, Keyframe};

use crate::selector::{self, Matchable};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An animation started through [`Dom::animate`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
    /// Host handle.
    pub id: AnimationId,
    /// Animated element.
    pub element: ElementId,
    /// Keyframes as passed in.
    pub keyframes: Vec<Keyframe>,
    /// Resolved timing.
    pub timing: AnimationTiming,
    /// Cleared when the animation is cancelled.
    pub running: bool,
}

/// In-memory DOM tree.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    html: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    inner_width: i32,
    client_width: i32,
    focus_log: Vec<ElementId>,
    animations: Vec<AnimationRecord>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create `<html><body></body></html>` with a 1024px viewport and no scrollbar.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            html: ElementId::new(0),
            body: ElementId::new(0),
            active: None,
            inner_width: 1024,
            client_width: 1024,
            focus_log: Vec::new(),
            animations: Vec::new(),
        };
        dom.html = dom.create_element("html");
        dom.body = dom.create_element("body");
        let (html, body) = (dom.html, dom.body);
        dom.append_child(html, body);
        dom
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        usize::try_from(id.raw()).ok().and_then(|i| self.nodes.get(i))
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        usize::try_from(id.raw())
            .ok()
            .and_then(|i| self.nodes.get_mut(i))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId::new(self.nodes.len() as u64);
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            styles: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // Refuse cycles: parent must not live inside child.
        if self.contains(child, parent) {
            return;
        }
        self.remove(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detach `element` from its parent. Focus inside it is dropped.
    pub fn remove(&mut self, element: ElementId) {
        if let Some(active) = self.active
            && self.contains(element, active)
        {
            self.active = None;
        }
        let Some(parent) = self.node(element).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != element);
        }
        if let Some(node) = self.node_mut(element) {
            node.parent = None;
        }
    }

    /// Create an element with attributes and append it to `parent`.
    pub fn element(&mut self, parent: ElementId, tag: &str, attrs: &[(&str, &str)]) -> ElementId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    /// Set `window.innerWidth` and `documentElement.clientWidth`.
    pub fn set_viewport(&mut self, inner_width: i32, client_width: i32) {
        self.inner_width = inner_width;
        self.client_width = client_width;
    }

    /// Whether `element` is reachable from `<html>`.
    pub fn is_connected(&self, element: ElementId) -> bool {
        self.contains(self.html, element)
    }

    /// Drop focus (`document.activeElement` becomes the body in browsers).
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Every element that received focus, oldest first.
    pub fn focus_log(&self) -> &[ElementId] {
        &self.focus_log
    }

    /// Animations started so far, including cancelled ones.
    pub fn animations(&self) -> &[AnimationRecord] {
        &self.animations
    }

    /// Handles of the running animations on `element`.
    pub fn running_animations(&self, element: ElementId) -> Vec<AnimationId> {
        self.animations
            .iter()
            .filter(|a| a.running && a.element == element)
            .map(|a| a.id)
            .collect()
    }

    /// Mark an animation as finished (no longer running).
    pub fn finish_animation(&mut self, id: AnimationId) {
        if let Some(record) = self.animations.iter_mut().find(|a| a.id == id) {
            record.running = false;
        }
    }

    fn preorder(&self, root: ElementId, include_root: bool) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if id != root || include_root {
                out.push(id);
            }
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

impl Dom for MemoryDom {
    fn document_element(&self) -> ElementId {
        self.html
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let list = match selector::parse(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::trace!(selector, %err, "memory dom: invalid selector");
                return None;
            }
        };
        self.preorder(self.html, true)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|node| list.matches(node)))
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn descendants(&self, element: ElementId) -> Vec<ElementId> {
        self.preorder(element, false)
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.node(element).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)
            .and_then(|n| n.attr(name))
            .map(str::to_owned)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(node) = self.node_mut(element) {
            match node.attributes.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value.to_owned(),
                None => node.attributes.push((name, value.to_owned())),
            }
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    fn style(&self, element: ElementId, property: &str) -> String {
        self.node(element)
            .and_then(|n| n.styles.iter().find(|(k, _)| k == property))
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if value.is_empty() {
            node.styles.retain(|(k, _)| k != property);
            return;
        }
        match node.styles.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_owned(),
            None => node.styles.push((property.to_owned(), value.to_owned())),
        }
    }

    fn inner_width(&self) -> i32 {
        self.inner_width
    }

    fn client_width(&self) -> i32 {
        self.client_width
    }

    fn transition_duration(&self, element: ElementId) -> String {
        self.style(element, "transition-duration")
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, element: ElementId) {
        if !self.is_connected(element) {
            return;
        }
        self.active = Some(element);
        self.focus_log.push(element);
    }

    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> AnimationId {
        let id = AnimationId::new(self.animations.len() as u64 + 1);
        self.animations.push(AnimationRecord {
            id,
            element,
            keyframes: keyframes.to_vec(),
            timing: timing.clone(),
            running: true,
        });
        id
    }

    fn cancel_animations(&mut self, element: ElementId) -> Vec<AnimationId> {
        let mut cancelled = Vec::new();
        for record in self
            .animations
            .iter_mut()
            .filter(|a| a.running && a.element == element)
        {
            record.running = false;
            cancelled.push(record.id);
        }
        cancelled
    }
}
