#![forbid(unsafe_code)]

//! Core types for modalkit: the host DOM boundary, input events, CSS duration
//! parsing, and the string/object helpers component layers lean on.
//!
//! Nothing in this crate holds state. The stateful primitives (scroll lock,
//! aria-hidden stack, focus traps, dialogs) live in the `modalkit` crate and
//! talk to the page exclusively through [`dom::Dom`].

pub mod dom;
pub mod duration;
pub mod event;
pub mod helpers;

pub use dom::{AnimationId, AnimationTiming, Dom, ElementId, ElementRef, FillMode, Keyframe};
pub use duration::{parse_max_duration, parse_time_ms};
pub use event::{EventOutcome, Key, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
pub use helpers::{
    DEFAULT_ID_PREFIX, except, except_keys, generate_id, is_standard_dom_event, kebab_case, only,
    only_keys, reject_none, reject_null_values,
};
