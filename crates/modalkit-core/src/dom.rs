#![forbid(unsafe_code)]

//! Host DOM boundary.
//!
//! Every read and write the modal primitives perform against the page goes
//! through the [`Dom`] trait. A browser host implements it over `web-sys`; the
//! test harness implements it over an in-memory tree. Elements are referenced
//! by [`ElementId`], an opaque handle the host allocates and never reuses for
//! the lifetime of a page.
//!
//! # Contract
//!
//! - `contains(a, b)` is inclusive: an element contains itself.
//! - `descendants(e)` returns elements in document order and excludes `e`.
//! - `query_selector` returns `None` both for "no match" and for selectors the
//!   host cannot parse. Callers treat both as "target missing".
//! - `style`/`set_style` operate on the inline style declaration only; an unset
//!   property reads back as the empty string.
//! - `focus` on an element that cannot take focus (detached, say) is a silent
//!   no-op, as in browsers.

use std::fmt;

/// Opaque handle to an element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw host identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw host identifier.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a running animation, allocated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Wrap a raw host identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw host identifier.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// How an animation applies its values outside the active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    None,
    #[default]
    Forwards,
    Backwards,
    Both,
    Auto,
}

impl FillMode {
    /// CSS keyword for this fill mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
            Self::Auto => "auto",
        }
    }
}

/// A single keyframe: property/value pairs plus an optional offset in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframe {
    /// Optional position of this keyframe within the animation.
    pub offset: Option<f64>,
    /// CSS property/value pairs, in declaration order.
    pub properties: Vec<(String, String)>,
}

impl Keyframe {
    /// Create an empty keyframe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property/value pair.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((property.into(), value.into()));
        self
    }

    /// Pin this keyframe at `offset`.
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Resolved timing passed to the host when starting an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTiming {
    /// Duration in milliseconds.
    pub duration_ms: f64,
    /// CSS timing function (already resolved from any easing name).
    pub easing: String,
    /// Fill mode.
    pub fill: FillMode,
}

/// The host DOM as seen by the modal primitives.
pub trait Dom {
    /// The `<html>` element.
    fn document_element(&self) -> ElementId;

    /// The `<body>` element.
    fn body(&self) -> ElementId;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    /// All descendants of `element` in document order.
    fn descendants(&self, element: ElementId) -> Vec<ElementId>;

    /// Lowercase tag name, or the empty string for unknown elements.
    fn tag_name(&self, element: ElementId) -> String;

    /// Attribute value, `None` when absent.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Whether the attribute is present (with any value).
    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Set an attribute.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Remove an attribute. Absent attributes are ignored.
    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Inline style property (kebab-case name), empty when unset.
    fn style(&self, element: ElementId, property: &str) -> String;

    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// `window.innerWidth` in CSS pixels.
    fn inner_width(&self) -> i32;

    /// `document.documentElement.clientWidth` in CSS pixels.
    fn client_width(&self) -> i32;

    /// Computed `transition-duration` of `element`, empty when none.
    fn transition_duration(&self, element: ElementId) -> String;

    /// Currently focused element, if any.
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus to `element`.
    fn focus(&mut self, element: ElementId);

    /// Start an animation on `element`.
    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> AnimationId;

    /// Cancel all running animations on `element`, returning their handles.
    fn cancel_animations(&mut self, element: ElementId) -> Vec<AnimationId>;
}

/// Either a concrete element or a selector resolved through [`Dom::query_selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRef {
    /// A concrete element.
    Element(ElementId),
    /// A CSS selector, resolved lazily.
    Selector(String),
}

impl ElementRef {
    /// Resolve against `dom`. Unmatched or invalid selectors yield `None`.
    pub fn resolve<D: Dom + ?Sized>(&self, dom: &D) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            Self::Selector(selector) => dom.query_selector(selector),
        }
    }
}

impl From<ElementId> for ElementRef {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<&str> for ElementRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<String> for ElementRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}
