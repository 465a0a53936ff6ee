#![forbid(unsafe_code)]

//! Minimal CSS selector support for [`MemoryDom`](crate::MemoryDom).
//!
//! Supported: selector lists (`a, b`) of compound selectors built from a type
//! selector or `*`, `#id`, `.class`, `[attr]`, and `[attr=value]` with bare,
//! single- or double-quoted values. Combinators and pseudo-classes are
//! rejected with a [`SelectorError`].

use std::fmt;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one entry of a list) was empty.
    Empty,
    /// A character that cannot start or continue a simple selector.
    UnexpectedChar { ch: char, offset: usize },
    /// `[` without a matching `]`, or a quote without its closing quote.
    Unterminated { offset: usize },
    /// Whitespace between simple selectors (descendant combinator) or `>`, `+`, `~`.
    UnsupportedCombinator { offset: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar { ch, offset } => {
                write!(f, "unexpected character '{ch}' at offset {offset}")
            }
            Self::Unterminated { offset } => {
                write!(f, "unterminated attribute selector starting at offset {offset}")
            }
            Self::UnsupportedCombinator { offset } => {
                write!(f, "combinators are not supported (offset {offset})")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// One simple selector inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

/// A compound selector: every part must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound(pub Vec<Simple>);

/// A parsed selector list: any compound may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Compound>);

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(chars: &[(usize, char)], pos: &mut usize) -> String {
    let mut out = String::new();
    while let Some(&(_, ch)) = chars.get(*pos) {
        if !is_ident_char(ch) {
            break;
        }
        out.push(ch);
        *pos += 1;
    }
    out
}

fn parse_attribute(
    chars: &[(usize, char)],
    pos: &mut usize,
    open_offset: usize,
) -> Result<Simple, SelectorError> {
    let name = take_ident(chars, pos);
    if name.is_empty() {
        return match chars.get(*pos) {
            Some(&(offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
            None => Err(SelectorError::Unterminated {
                offset: open_offset,
            }),
        };
    }
    match chars.get(*pos) {
        Some(&(_, ']')) => {
            *pos += 1;
            Ok(Simple::HasAttribute(name.to_ascii_lowercase()))
        }
        Some(&(_, '=')) => {
            *pos += 1;
            let value = match chars.get(*pos) {
                Some(&(_, quote @ ('"' | '\''))) => {
                    *pos += 1;
                    let mut value = String::new();
                    loop {
                        match chars.get(*pos) {
                            Some(&(_, ch)) if ch == quote => {
                                *pos += 1;
                                break;
                            }
                            Some(&(_, ch)) => {
                                value.push(ch);
                                *pos += 1;
                            }
                            None => {
                                return Err(SelectorError::Unterminated {
                                    offset: open_offset,
                                });
                            }
                        }
                    }
                    value
                }
                _ => take_ident(chars, pos),
            };
            match chars.get(*pos) {
                Some(&(_, ']')) => {
                    *pos += 1;
                    Ok(Simple::AttributeEquals(name.to_ascii_lowercase(), value))
                }
                Some(&(offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
                None => Err(SelectorError::Unterminated {
                    offset: open_offset,
                }),
            }
        }
        Some(&(offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
        None => Err(SelectorError::Unterminated {
            offset: open_offset,
        }),
    }
}

fn parse_compound(chars: &[(usize, char)]) -> Result<Compound, SelectorError> {
    let mut parts = Vec::new();
    let mut pos = 0;

    while let Some(&(offset, ch)) = chars.get(pos) {
        match ch {
            '*' if parts.is_empty() => {
                pos += 1;
                parts.push(Simple::Universal);
            }
            '#' | '.' => {
                pos += 1;
                let ident = take_ident(chars, &mut pos);
                if ident.is_empty() {
                    return Err(SelectorError::UnexpectedChar { ch, offset });
                }
                parts.push(if ch == '#' {
                    Simple::Id(ident)
                } else {
                    Simple::Class(ident)
                });
            }
            '[' => {
                pos += 1;
                parts.push(parse_attribute(chars, &mut pos, offset)?);
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(SelectorError::UnsupportedCombinator { offset });
            }
            c if c.is_ascii_alphabetic() && parts.is_empty() => {
                let ident = take_ident(chars, &mut pos);
                parts.push(Simple::Tag(ident.to_ascii_lowercase()));
            }
            c => return Err(SelectorError::UnexpectedChar { ch: c, offset }),
        }
    }

    if parts.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Compound(parts))
}

/// Parse a selector list.
pub fn parse(selector: &str) -> Result<SelectorList, SelectorError> {
    let mut compounds = Vec::new();
    let mut start = 0;
    // Split on commas that sit outside attribute brackets.
    let mut depth = 0usize;
    let mut pieces = Vec::new();
    for (idx, ch) in selector.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push((start, &selector[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &selector[start..]));

    for (base, piece) in pieces {
        let leading = piece.len() - piece.trim_start().len();
        let chars: Vec<(usize, char)> = piece
            .trim()
            .char_indices()
            .map(|(i, c)| (base + leading + i, c))
            .collect();
        compounds.push(parse_compound(&chars)?);
    }
    Ok(SelectorList(compounds))
}

/// The element facts a compound selector needs.
pub trait Matchable {
    /// Lowercase tag name.
    fn tag(&self) -> &str;
    /// Attribute value, `None` when absent.
    fn attr(&self, name: &str) -> Option<&str>;
}

impl Simple {
    fn matches<M: Matchable + ?Sized>(&self, el: &M) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.tag() == tag,
            Self::Id(id) => el.attr("id") == Some(id.as_str()),
            Self::Class(class) => el
                .attr("class")
                .is_some_and(|list| list.split_whitespace().any(|c| c == class)),
            Self::HasAttribute(name) => el.attr(name).is_some(),
            Self::AttributeEquals(name, value) => el.attr(name) == Some(value.as_str()),
        }
    }
}

impl SelectorList {
    /// Whether any compound in the list matches `el`.
    pub fn matches<M: Matchable + ?Sized>(&self, el: &M) -> bool {
        self.0
            .iter()
            .any(|compound| compound.0.iter().all(|simple| simple.matches(el)))
    }
}
