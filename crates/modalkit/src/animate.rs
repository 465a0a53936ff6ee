#![forbid(unsafe_code)]

//! Keyframe animation on top of the host's animation API.
//!
//! The page keeps one completion callback per started animation. It fires
//! exactly once: when the host reports the animation finished, or when the
//! animation is cancelled through [`Page::cancel_animations`]. Either way the
//! caller observes "the animation is over", mirroring a finished-promise that
//! swallows cancellation.

use std::time::Duration;

use modalkit_core::{AnimationId, AnimationTiming, Dom, ElementId, FillMode, Keyframe};

use crate::page::Page;

/// Timing function for [`Page::animate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    In,
    Out,
    #[default]
    InOut,
    /// Any CSS timing function, passed through verbatim.
    Custom(String),
}

impl Easing {
    /// Resolve an easing name (`linear`, `in`, `out`, `inOut`).
    ///
    /// Unknown names are kept as custom timing functions.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Self::Linear,
            "in" => Self::In,
            "out" => Self::Out,
            "inOut" => Self::InOut,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// CSS timing function.
    pub fn css(&self) -> &str {
        match self {
            Self::Linear => "linear",
            Self::In => "cubic-bezier(0.4, 0, 1, 1)",
            Self::Out => "cubic-bezier(0, 0, 0.2, 1)",
            Self::InOut => "cubic-bezier(0.4, 0, 0.2, 1)",
            Self::Custom(css) => css,
        }
    }
}

impl From<&str> for Easing {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Options for [`Page::animate`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimateOptions {
    /// Default 300ms.
    pub duration: Duration,
    /// Default [`Easing::InOut`].
    pub easing: Easing,
    /// Default [`FillMode::Forwards`].
    pub fill: FillMode,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::InOut,
            fill: FillMode::Forwards,
        }
    }
}

impl AnimateOptions {
    /// Set the duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the easing.
    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Set the fill mode.
    pub fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    fn timing(&self) -> AnimationTiming {
        AnimationTiming {
            duration_ms: self.duration.as_secs_f64() * 1000.0,
            easing: self.easing.css().to_owned(),
            fill: self.fill,
        }
    }
}

impl<D: Dom> Page<D> {
    /// Start an animation on `element`; `on_finished` runs when it is over.
    pub fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        options: &AnimateOptions,
        on_finished: impl FnOnce(AnimationId) + 'static,
    ) -> AnimationId {
        let id = self.dom.animate(element, keyframes, &options.timing());
        self.animations.insert(id, Box::new(on_finished));
        tracing::trace!(%element, animation = id.raw(), "animation started");
        id
    }

    /// Cancel every running animation on `element`.
    ///
    /// Completion callbacks of the cancelled animations run immediately.
    /// Returns how many animations were cancelled.
    pub fn cancel_animations(&mut self, element: ElementId) -> usize {
        let cancelled = self.dom.cancel_animations(element);
        for id in &cancelled {
            self.complete_animation(*id);
        }
        cancelled.len()
    }

    /// Forward the host's `finish` notification for animation `id`.
    ///
    /// Returns `false` if the animation was not started here or already
    /// completed.
    pub fn dispatch_animation_finished(&mut self, id: AnimationId) -> bool {
        self.complete_animation(id)
    }

    /// Animations whose completion callback has not run yet.
    pub fn pending_animations(&self) -> usize {
        self.animations.len()
    }

    fn complete_animation(&mut self, id: AnimationId) -> bool {
        match self.animations.remove(&id) {
            Some(callback) => {
                callback(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalkit_harness::MemoryDom;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fade_in() -> Vec<Keyframe> {
        vec![
            Keyframe::new().set("opacity", "0").set("transform", "scale(0.95)"),
            Keyframe::new().set("opacity", "1").set("transform", "scale(1)"),
        ]
    }

    #[test]
    fn easing_names_resolve() {
        assert_eq!(Easing::from_name("linear").css(), "linear");
        assert_eq!(Easing::from_name("in").css(), "cubic-bezier(0.4, 0, 1, 1)");
        assert_eq!(Easing::from_name("out").css(), "cubic-bezier(0, 0, 0.2, 1)");
        assert_eq!(Easing::from_name("inOut"), Easing::InOut);
        assert_eq!(
            Easing::from_name("steps(4, end)"),
            Easing::Custom("steps(4, end)".into())
        );
    }

    #[test]
    fn defaults_reach_the_host() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let panel = dom.element(body, "div", &[]);
        let mut page = Page::new(dom);

        page.animate(panel, &fade_in(), &AnimateOptions::default(), |_| {});
        let record = &page.dom().animations()[0];
        assert_eq!(
            record.timing,
            AnimationTiming {
                duration_ms: 300.0,
                easing: "cubic-bezier(0.4, 0, 0.2, 1)".into(),
                fill: FillMode::Forwards,
            }
        );
        assert_eq!(record.keyframes, fade_in());
    }

    #[test]
    fn finish_runs_callback_once() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let panel = dom.element(body, "div", &[]);
        let mut page = Page::new(dom);
        let done = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&done);

        let opts = AnimateOptions::default()
            .duration(Duration::from_millis(150))
            .easing("linear")
            .fill(FillMode::Both);
        let id = page.animate(panel, &fade_in(), &opts, move |id| log.borrow_mut().push(id));
        assert_eq!(page.pending_animations(), 1);

        page.dom_mut().finish_animation(id);
        assert!(page.dispatch_animation_finished(id));
        assert!(!page.dispatch_animation_finished(id));
        assert_eq!(*done.borrow(), vec![id]);
    }

    #[test]
    fn cancel_resolves_pending_callbacks() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let panel = dom.element(body, "div", &[]);
        let other = dom.element(body, "div", &[]);
        let mut page = Page::new(dom);
        let done = Rc::new(RefCell::new(0));

        for el in [panel, panel, other] {
            let counter = Rc::clone(&done);
            page.animate(el, &fade_in(), &AnimateOptions::default(), move |_| {
                *counter.borrow_mut() += 1;
            });
        }

        assert_eq!(page.cancel_animations(panel), 2);
        assert_eq!(*done.borrow(), 2);
        assert!(page.dom().running_animations(panel).is_empty());
        assert_eq!(page.dom().running_animations(other).len(), 1);
        assert_eq!(page.cancel_animations(panel), 0);
    }
}
