//! Segment matching for route nodes.
//!
//! # Responsibilities
//! - Compile a node's path fragment into a [`PathPattern`] once, whenever the
//!   fragment changes
//! - Match a pattern against the front of a request URL
//! - Bind `{name}` and `{name*}` captures, undoing them when a branch fails
//!
//! # Design Decisions
//! - Literal segments match case-insensitively (URL case is preserved in captures)
//! - `{name}` takes exactly one segment, `{name*}` one or more, greedily;
//!   shorter takes are offered to the caller when the longer ones fail further on
//! - A name already bound higher up the tree must see the same value again
//! - A match always ends on a segment boundary, so `users` never matches `usersx`
//! - No regex: patterns are a short list of segment matchers

use crate::routing::path::{is_parameter_segment, segments};

/// One compiled segment of a node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Wildcard(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if is_parameter_segment(raw) {
            let inner = &raw[1..raw.len() - 1];
            match inner.strip_suffix('*') {
                Some(name) if !name.is_empty() => return Segment::Wildcard(name.to_string()),
                Some(_) => {}
                None => return Segment::Param(inner.to_string()),
            }
        }
        Segment::Literal(raw.to_lowercase())
    }

    pub fn is_parameter(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

/// Descriptor of a parameter declared by a node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Segment index within the node's own path.
    pub position: usize,
    pub wildcard: bool,
}

/// Compiled matcher for a node path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    parameters: Vec<Parameter>,
}

impl PathPattern {
    pub fn compile(path: &str) -> Self {
        let segments: Vec<Segment> = segments(path).map(Segment::parse).collect();
        let parameters = segments
            .iter()
            .enumerate()
            .filter_map(|(position, segment)| match segment {
                Segment::Literal(_) => None,
                Segment::Param(name) => Some(Parameter {
                    name: name.clone(),
                    position,
                    wildcard: false,
                }),
                Segment::Wildcard(name) => Some(Parameter {
                    name: name.clone(),
                    position,
                    wildcard: true,
                }),
            })
            .collect();
        Self {
            segments,
            parameters,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// True when the first segment captures instead of matching literal text.
    pub fn starts_with_parameter(&self) -> bool {
        self.segments.first().is_some_and(Segment::is_parameter)
    }

    /// Matches the pattern against the front of `url` (already split into
    /// segments), handing each possible end offset to `next`, longest
    /// wildcard take first. Stops at the first `Some` from `next`.
    ///
    /// Bindings made for an end offset that `next` rejects are undone, so on
    /// failure `captures` is left exactly as it was.
    pub fn match_each<T, F>(
        &self,
        url: &[&str],
        captures: &mut Captures,
        next: &mut F,
    ) -> Option<T>
    where
        F: FnMut(usize, &mut Captures) -> Option<T>,
    {
        self.match_at(0, url, 0, captures, next)
    }

    fn match_at<T, F>(
        &self,
        si: usize,
        url: &[&str],
        ui: usize,
        captures: &mut Captures,
        next: &mut F,
    ) -> Option<T>
    where
        F: FnMut(usize, &mut Captures) -> Option<T>,
    {
        let Some(segment) = self.segments.get(si) else {
            return next(ui, captures);
        };

        match segment {
            Segment::Literal(text) => {
                let candidate = url.get(ui)?;
                if !eq_ignore_case(candidate, text) {
                    return None;
                }
                self.match_at(si + 1, url, ui + 1, captures, next)
            }
            Segment::Param(name) => {
                let candidate = url.get(ui)?;
                if let Some(bound) = captures.get(name) {
                    if !eq_ignore_case(candidate, bound) {
                        return None;
                    }
                    return self.match_at(si + 1, url, ui + 1, captures, next);
                }
                let mark = captures.mark();
                captures.bind(name, candidate.to_string());
                let matched = self.match_at(si + 1, url, ui + 1, captures, next);
                if matched.is_none() {
                    captures.rollback(mark);
                }
                matched
            }
            Segment::Wildcard(name) => {
                if let Some(bound) = captures.get(name) {
                    let expected: Vec<&str> = segments(bound).collect();
                    let end = ui + expected.len();
                    let window = url.get(ui..end)?;
                    if expected.is_empty()
                        || !window.iter().zip(&expected).all(|(u, e)| eq_ignore_case(u, e))
                    {
                        return None;
                    }
                    return self.match_at(si + 1, url, end, captures, next);
                }
                let remaining = url.len().saturating_sub(ui);
                for take in (1..=remaining).rev() {
                    let mark = captures.mark();
                    captures.bind(name, url[ui..ui + take].join("/"));
                    if let Some(found) = self.match_at(si + 1, url, ui + take, captures, next) {
                        return Some(found);
                    }
                    captures.rollback(mark);
                }
                None
            }
        }
    }
}

/// Parameter bindings accumulated while descending the tree.
///
/// Kept as an ordered list so a failed branch can be undone by truncation.
#[derive(Debug, Clone, Default)]
pub struct Captures {
    bindings: Vec<(String, String)>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn bind(&mut self, name: &str, value: String) {
        self.bindings.push((name.to_string(), value));
    }

    pub fn mark(&self) -> usize {
        self.bindings.len()
    }

    pub fn rollback(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> Vec<(String, String)> {
        self.bindings
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
