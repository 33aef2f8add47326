//! # Natural Version Ordering
//!
//! Versions are compared the way people read them: runs of digits compare
//! by numeric value, everything else compares case-insensitively.
//!
//! ```text
//! "5.0.0"  < "10.0.0"
//! "5.1.2"  > "5.1.0"
//! "v5.1"   = "V5.1"  (ties broken by plain byte order)
//! ```

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Split `s` into alternating digit and non-digit runs
fn chunks(s: &str) -> impl Iterator<Item = Chunk<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(if digits {
            Chunk::Digits(run)
        } else {
            Chunk::Text(run)
        })
    })
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    a.cmp(b)
}

/// Natural ordering of two strings
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => compare_digits(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => compare_text(x, y),
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

pub fn natural_less(a: &str, b: &str) -> bool {
    natural_cmp(a, b) == Ordering::Less
}

/// Leading numeric component of a version, e.g. `4` for `"4.2.1"`
pub fn major_version(version: &str) -> Option<u32> {
    match chunks(version).next()? {
        Chunk::Digits(digits) => digits.parse().ok(),
        Chunk::Text(_) => None,
    }
}

/// Version part of a release tag: `"v5.1.2"` → `"5.1.2"`
pub fn tag_version(tag: &str) -> Option<&str> {
    let version = tag.strip_prefix('v').or_else(|| tag.strip_prefix('V'))?;
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert!(natural_less("5.0.0", "10.0.0"));
        assert!(natural_less("5.0.9", "5.0.10"));
        assert!(natural_less("1.2", "1.2.1"));
        assert!(!natural_less("5.1.2", "5.1.2"));
        assert_eq!(natural_cmp("5.01", "5.1"), "5.01".cmp("5.1"));
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert!(natural_less("5.0.0-alpha", "5.0.0-Beta"));
        assert_eq!(natural_cmp("abc", "ABC"), "abc".cmp("ABC"));
    }

    #[test]
    fn test_sort_is_natural() {
        let mut versions = vec!["10.0.0", "4.9.0", "5.10.1", "5.2.0"];
        versions.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(versions, vec!["4.9.0", "5.2.0", "5.10.1", "10.0.0"]);
    }

    #[test]
    fn test_major_version() {
        assert_eq!(major_version("4.2.1"), Some(4));
        assert_eq!(major_version("12"), Some(12));
        assert_eq!(major_version("beta"), None);
        assert_eq!(major_version(""), None);
    }

    #[test]
    fn test_tag_version() {
        assert_eq!(tag_version("v5.1.2"), Some("5.1.2"));
        assert_eq!(tag_version("5.1.2"), None);
        assert_eq!(tag_version("v"), None);
    }
}
