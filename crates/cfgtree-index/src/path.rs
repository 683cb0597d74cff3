//! Path strings
//!
//! A path is the separator followed by one escaped name key per level:
//! `/http/server/location %2Fapi`. Escaping guarantees that a segment never
//! contains the separator, so the parent of a path is everything before its
//! last `/` and "below P" means "starts with `P/`". The root path is `""`.

use std::borrow::Cow;

/// Path separator
pub const SEPARATOR: char = '/';

/// Escape a raw name key for use as a path segment
///
/// `%` becomes `%25` and `/` becomes `%2F`.
#[must_use]
pub fn escape_segment(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', SEPARATOR]) {
        return Cow::Borrowed(raw);
    }
    let mut escaped = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            SEPARATOR => escaped.push_str("%2F"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Reverse of [`escape_segment`]
///
/// Unknown escapes are kept verbatim.
#[must_use]
pub fn unescape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains('%') {
        return Cow::Borrowed(segment);
    }
    let mut raw = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        raw.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("%25") {
            raw.push('%');
            rest = &tail[3..];
        } else if tail.starts_with("%2F") || tail.starts_with("%2f") {
            raw.push(SEPARATOR);
            rest = &tail[3..];
        } else {
            raw.push('%');
            rest = &tail[1..];
        }
    }
    raw.push_str(rest);
    Cow::Owned(raw)
}

/// Append an already escaped segment to `parent`
#[inline]
#[must_use]
pub fn join(parent: &str, segment: &str) -> String {
    let mut path = String::with_capacity(parent.len() + segment.len() + 1);
    path.push_str(parent);
    path.push(SEPARATOR);
    path.push_str(segment);
    path
}

/// Build a path from raw (unescaped) name keys
///
/// # Examples
/// ```
/// use cfgtree_index::path;
///
/// assert_eq!(path::from_segments(["http", "location /api"]), "/http/location %2Fapi");
/// ```
#[must_use]
pub fn from_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .fold(String::new(), |parent, seg| join(&parent, &escape_segment(seg.as_ref())))
}

/// Parent path; `None` for the root path
#[inline]
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|pos| &path[..pos])
}

/// Last segment (still escaped); `None` for the root path
#[inline]
#[must_use]
pub fn last(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|pos| &path[pos + 1..])
}

/// Escaped segments from root to leaf
#[inline]
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).skip(1)
}

/// Number of segments
#[inline]
#[must_use]
pub fn depth(path: &str) -> usize {
    path.matches(SEPARATOR).count()
}

/// True if `path` lies strictly below `ancestor`
#[inline]
#[must_use]
pub fn is_below(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_round_trips_separator_and_percent() {
        let raw = "location ~ ^/img/(.*)%$";
        let escaped = escape_segment(raw);

        assert!(!escaped.contains(SEPARATOR));
        assert_eq!(escaped, "location ~ ^%2Fimg%2F(.*)%25$");
        assert_eq!(unescape_segment(&escaped), raw);
    }

    #[test]
    fn plain_segments_are_borrowed() {
        assert!(matches!(escape_segment("listen"), Cow::Borrowed("listen")));
        assert!(matches!(unescape_segment("listen"), Cow::Borrowed("listen")));
    }

    #[test]
    fn stray_percent_is_kept() {
        assert_eq!(unescape_segment("50%off"), "50%off");
        assert_eq!(unescape_segment("%"), "%");
    }

    #[test]
    fn parent_and_last() {
        assert_eq!(parent("/http/server/listen"), Some("/http/server"));
        assert_eq!(parent("/http"), Some(""));
        assert_eq!(parent(""), None);
        assert_eq!(last("/http/location %2F"), Some("location %2F"));
    }

    #[test]
    fn segments_and_depth() {
        let path = from_segments(["http", "server", "location /"]);

        assert_eq!(segments(&path).collect::<Vec<_>>(), vec!["http", "server", "location %2F"]);
        assert_eq!(depth(&path), 3);
        assert_eq!(depth(""), 0);
        assert_eq!(from_segments(Vec::<&str>::new()), "");
    }

    #[test]
    fn below_respects_segment_boundaries() {
        assert!(is_below("/server/listen", "/server"));
        assert!(is_below("/server", ""));
        assert!(!is_below("/server_tokens", "/server"));
        assert!(!is_below("/server", "/server"));
    }
}
