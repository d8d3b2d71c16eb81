//! Version token classification and banner parsing.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("valid regex"));
static BANNER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("valid regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionKind {
    /// `X.Y`: a release series.
    Prefix,
    /// Anything else, used literally.
    Exact,
}

/// Classifies a version token purely by its shape.
#[must_use]
pub fn classify(token: &str) -> VersionKind {
    if PREFIX_RE.is_match(token) {
        VersionKind::Prefix
    } else {
        VersionKind::Exact
    }
}

#[must_use]
pub fn is_prefix(token: &str) -> bool {
    classify(token) == VersionKind::Prefix
}

/// First `X.Y[.Z]` run in free-form text such as `Python 3.11.5`.
#[must_use]
pub fn extract_version(text: &str) -> Option<String> {
    BANNER_RE.find(text).map(|m| m.as_str().to_string())
}

/// Numeric comparison of dotted versions (`3.10.2 > 3.9.0`).
///
/// Components that are not plain integers fall back to a string comparison
/// at that position; such versions have no meaningful release ordering.
#[must_use]
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let mut lhs = left.split('.');
    let mut rhs = right.split('.');
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(a), Ok(b)) => a.cmp(&b),
                    _ => a.cmp(b),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}
