/// Path utilities for cleaning and splitting request paths
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
use std::borrow::Cow;

use crate::{Error, Result};

/// Checks if a path is already in clean, rooted form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain empty segments (`//`)
/// - Must not contain `.` or `..` segments
/// - Must not end with `/` (except root `/`)
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::is_clean_path;
///
/// assert!(is_clean_path("/"));
/// assert!(is_clean_path("/users/123"));
///
/// assert!(!is_clean_path(""));
/// assert!(!is_clean_path("users")); // Missing leading /
/// assert!(!is_clean_path("/users/")); // Trailing /
/// assert!(!is_clean_path("/users//123")); // Empty segment
/// assert!(!is_clean_path("/users/./123")); // Dot segment
/// ```
pub fn is_clean_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    match path.strip_prefix('/') {
        Some(rest) => rest
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | "..")),
        None => false,
    }
}

/// Cleans a path lexically, treating it as rooted
///
/// Returns `Cow::Borrowed` when the input is already clean (zero allocations).
///
/// - Missing leading slash: `a/b` → `/a/b`
/// - Trailing slashes: `/a/` → `/a`
/// - Empty segments: `/a//b` → `/a/b`
/// - Dot segments: `/a/./b` → `/a/b`
/// - Parent segments: `/a/../b` → `/b` (never climbs above root)
///
/// # Examples
///
/// ```
/// use rhtmx_nav::path::clean_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(clean_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(clean_path("about/"), "/about");
/// assert_eq!(clean_path("/a/b/../c"), "/a/c");
/// assert_eq!(clean_path("/../.."), "/");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if is_clean_path(path) {
        return Cow::Borrowed(path);
    }

    let kept = path.split('/').fold(Vec::new(), |mut kept, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            _ => kept.push(segment),
        }
        kept
    });

    if kept.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", kept.join("/")))
    }
}

/// Splits a clean path into its positional parts
///
/// The root path has no parts.
///
/// ```
/// use rhtmx_nav::path::path_parts;
///
/// assert_eq!(path_parts("/a/b"), vec!["a", "b"]);
/// assert!(path_parts("/").is_empty());
/// ```
pub fn path_parts(clean: &str) -> Vec<&str> {
    clean.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalizes a configured base path
///
/// Empty strings and `/` mean "no base path". Anything else is cleaned so it
/// starts with `/` and has no trailing slash.
pub fn normalize_base_path(base: &str) -> String {
    match clean_path(base) {
        root if root == "/" => String::new(),
        cleaned => cleaned.into_owned(),
    }
}

/// Strips a base path from an inbound path
///
/// The prefix must end on a segment boundary: `/app` strips from `/app` and
/// `/app/users` but not from `/apple`. An empty base path strips nothing.
///
/// # Errors
///
/// Returns [`Error::MissingPrefix`] when the path does not start with the base path.
pub fn strip_base_path<'a>(path: &'a str, base: &str) -> Result<&'a str> {
    if base.is_empty() {
        return Ok(path);
    }

    match path.strip_prefix(base) {
        Some("") => Ok("/"),
        Some(rest) if rest.starts_with('/') => Ok(rest),
        _ => Err(Error::MissingPrefix {
            path: path.to_string(),
            prefix: base.to_string(),
        }),
    }
}
