#![forbid(unsafe_code)]

//! Small string and object helpers used by component layers built on top of
//! the modal primitives (prop filtering, id generation, attribute naming).
//!
//! Objects are `serde_json` maps with insertion order preserved, so filtering
//! never reorders the surviving members.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Prefix used by [`generate_id`] callers that have no prefix of their own.
pub const DEFAULT_ID_PREFIX: &str = "inertiaui_";

/// Generate a unique id: `prefix` followed by a random UUID.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4())
}

fn normalize_keys<S: AsRef<str>>(keys: &[S], ignore_case: bool) -> Vec<String> {
    keys.iter()
        .map(|k| {
            if ignore_case {
                k.as_ref().to_lowercase()
            } else {
                k.as_ref().to_owned()
            }
        })
        .collect()
}

fn listed(keys: &[String], candidate: &str, ignore_case: bool) -> bool {
    if ignore_case {
        let lowered = candidate.to_lowercase();
        keys.iter().any(|k| *k == lowered)
    } else {
        keys.iter().any(|k| k == candidate)
    }
}

/// Copy of `target` without the listed keys.
pub fn except<S: AsRef<str>>(
    target: &Map<String, Value>,
    keys: &[S],
    ignore_case: bool,
) -> Map<String, Value> {
    let keys = normalize_keys(keys, ignore_case);
    target
        .iter()
        .filter(|(k, _)| !listed(&keys, k, ignore_case))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Copy of `target` with only the listed keys.
pub fn only<S: AsRef<str>>(
    target: &Map<String, Value>,
    keys: &[S],
    ignore_case: bool,
) -> Map<String, Value> {
    let keys = normalize_keys(keys, ignore_case);
    target
        .iter()
        .filter(|(k, _)| listed(&keys, k, ignore_case))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Entries of `target` not in `keys`, in their original order.
pub fn except_keys<T: AsRef<str>, S: AsRef<str>>(
    target: &[T],
    keys: &[S],
    ignore_case: bool,
) -> Vec<String> {
    let keys = normalize_keys(keys, ignore_case);
    target
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| !listed(&keys, entry, ignore_case))
        .map(str::to_owned)
        .collect()
}

/// Entries of `target` that appear in `keys`, in their original order.
pub fn only_keys<T: AsRef<str>, S: AsRef<str>>(
    target: &[T],
    keys: &[S],
    ignore_case: bool,
) -> Vec<String> {
    let keys = normalize_keys(keys, ignore_case);
    target
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| listed(&keys, entry, ignore_case))
        .map(str::to_owned)
        .collect()
}

/// Copy of `target` without `null` members.
pub fn reject_null_values(target: &Map<String, Value>) -> Map<String, Value> {
    target
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// The `Some` values of `target`, in order.
pub fn reject_none<T: Clone>(target: &[Option<T>]) -> Vec<T> {
    target.iter().flatten().cloned().collect()
}

static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("hyphen pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static WORD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s|-)+([A-Za-z])").expect("word start pattern is valid")
});

/// Convert `fooBarBaz`, `FooBar`, `foo_bar` and friends to `foo-bar-baz` form.
///
/// Strings without any ASCII uppercase letter only get their underscores and
/// hyphen runs normalized, so `already-kebab` comes back unchanged.
pub fn kebab_case(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let hyphenated = input.replace('_', "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");

    if !collapsed.chars().any(|c| c.is_ascii_uppercase()) {
        return collapsed.into_owned();
    }

    let compact = WHITESPACE.replace_all(&collapsed, "");
    let word_cased = WORD_START.replace_all(&compact, |caps: &Captures<'_>| {
        caps[1].to_ascii_uppercase()
    });

    let mut out = String::with_capacity(word_cased.len() + 4);
    for (idx, ch) in word_cased.chars().enumerate() {
        if idx > 0 && ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(ch);
    }
    out.to_lowercase()
}

const STANDARD_EVENTS: &[&str] = &[
    // mouse
    "click", "dblclick", "mousedown", "mouseup", "mouseover", "mouseout", "mousemove",
    "mouseenter", "mouseleave",
    // keyboard
    "keydown", "keyup", "keypress",
    // form
    "focus", "blur", "change", "input", "submit", "reset",
    // window
    "load", "unload", "error", "resize", "scroll",
    // touch
    "touchstart", "touchend", "touchmove", "touchcancel",
    // pointer
    "pointerdown", "pointerup", "pointermove", "pointerenter", "pointerleave", "pointercancel",
    // drag
    "drag", "dragstart", "dragend", "dragenter", "dragleave", "dragover", "drop",
    // animation
    "animationstart", "animationend", "animationiteration",
    // transition
    "transitionstart", "transitionend", "transitionrun", "transitioncancel",
];

/// Whether `name` is an `on*` handler prop for a standard DOM event
/// (`onClick`, `onkeydown`, ...). Case-insensitive.
pub fn is_standard_dom_event(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered
        .strip_prefix("on")
        .is_some_and(|event| STANDARD_EVENTS.contains(&event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn except_drops_listed_keys() {
        let target = object(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(
            Value::Object(except(&target, &["b"], false)),
            json!({"a": 1, "c": 3})
        );
    }

    #[test]
    fn only_keeps_listed_keys() {
        let target = object(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(Value::Object(only(&target, &["b"], false)), json!({"b": 2}));
    }

    #[test]
    fn filtering_preserves_insertion_order() {
        let target = object(json!({"z": 1, "a": 2, "m": 3}));
        let kept: Vec<_> = except(&target, &["a"], false).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kept, vec!["z".to_owned(), "m".to_owned()]);
    }

    #[test]
    fn ignore_case_matching() {
        let target = object(json!({"Foo": 1, "bar": 2}));
        assert_eq!(
            Value::Object(except(&target, &["FOO"], true)),
            json!({"bar": 2})
        );
        assert_eq!(
            Value::Object(only(&target, &["BAR"], true)),
            json!({"bar": 2})
        );
        assert_eq!(Value::Object(only(&target, &["BAR"], false)), json!({}));
    }

    #[test]
    fn list_variants() {
        let list = ["one", "Two", "three"];
        assert_eq!(except_keys(&list, &["two"], true), vec!["one", "three"]);
        assert_eq!(except_keys(&list, &["two"], false), vec!["one", "Two", "three"]);
        assert_eq!(only_keys(&list, &["three", "one"], false), vec!["one", "three"]);
    }

    #[test]
    fn reject_nulls() {
        let target = object(json!({"a": null, "b": 0, "c": false, "d": null}));
        assert_eq!(
            Value::Object(reject_null_values(&target)),
            json!({"b": 0, "c": false})
        );
        assert_eq!(reject_none(&[Some(1), None, Some(3)]), vec![1, 3]);
    }

    #[test]
    fn kebab_case_conversions() {
        assert_eq!(kebab_case("fooBarBaz"), "foo-bar-baz");
        assert_eq!(kebab_case("FooBar"), "foo-bar");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case("snake_case_name"), "snake-case-name");
        assert_eq!(kebab_case("double--hyphen"), "double-hyphen");
        assert_eq!(kebab_case("Mixed_Snake"), "mixed-snake");
        assert_eq!(kebab_case("with SpaceAnd"), "with-space-and");
        assert_eq!(kebab_case(""), "");
    }

    #[test]
    fn kebab_case_is_stable_on_lowercase_input() {
        for input in ["a", "abc", "a-b-c", "x1-y2"] {
            assert_eq!(kebab_case(input), input);
        }
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = generate_id(DEFAULT_ID_PREFIX);
        let b = generate_id(DEFAULT_ID_PREFIX);
        assert!(a.starts_with("inertiaui_"));
        assert_ne!(a, b);
        assert!(generate_id("modal-").starts_with("modal-"));
    }

    #[test]
    fn standard_dom_events() {
        assert!(is_standard_dom_event("onClick"));
        assert!(is_standard_dom_event("onkeydown"));
        assert!(is_standard_dom_event("onTransitionEnd"));
        assert!(is_standard_dom_event("ONPOINTERCANCEL"));
        assert!(!is_standard_dom_event("click"));
        assert!(!is_standard_dom_event("onClose"));
        assert!(!is_standard_dom_event("onClickOutside"));
    }
}
