//! Path normalization and segment arithmetic.
//!
//! Every path stored in the tree goes through [`clean_path`]: no leading,
//! trailing or doubled slashes, literal text lower-cased, `{...}` tokens
//! left verbatim. Prefix comparisons are always done on whole `/`-delimited
//! segments, never on substrings.

/// Normalizes a route pattern for storage in the tree.
pub fn clean_path(raw: &str) -> String {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(fold_literal_case)
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalizes a request URL: slashes only, case is preserved so captured
/// parameter values keep what the client sent.
pub fn clean_url(raw: &str) -> String {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-cases everything outside `{...}` spans.
fn fold_literal_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open].to_lowercase());
        out.push_str(&rest[open..open + close + 1]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(&rest.to_lowercase());
    out
}

/// Segments of an already-cleaned path. The empty path has none.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

pub fn segment_count(path: &str) -> usize {
    segments(path).count()
}

/// Number of leading segments `a` and `b` have in common.
pub fn common_prefix(a: &str, b: &str) -> usize {
    segments(a).zip(segments(b)).take_while(|(x, y)| x == y).count()
}

/// The first `n` segments of `path`.
pub fn take_segments(path: &str, n: usize) -> String {
    segments(path).take(n).collect::<Vec<_>>().join("/")
}

/// `path` without its first `n` segments.
pub fn skip_segments(path: &str, n: usize) -> String {
    segments(path).skip(n).collect::<Vec<_>>().join("/")
}

/// Joins two cleaned fragments with a single slash.
pub fn join(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head}/{tail}"),
    }
}

/// Whether a segment is a whole `{name}` or `{name*}` token.
pub fn is_parameter_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}
