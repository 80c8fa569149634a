/// Route pattern parsing, matching and merging
///
/// A pattern like `/users/:id/posts` is split into typed segments. Matching a
/// concrete path extracts parameters; merging parameters back produces a
/// concrete path. The two operations are inverses of each other.
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::path::{clean_path, path_parts};
use crate::{Error, Result, Values};

/// Placeholder written in place of a parameter that has no value
pub const MISSING_PARAM_PLACEHOLDER: &str = "_";

/// One `/`-delimited unit of a pattern
///
/// # Examples
///
/// ```
/// use rhtmx_nav::route::pattern::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("about"), Segment::Static("/about".to_string()));
/// assert_eq!(classify_segment(":id"), Segment::Param("id".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text including its leading `/`, e.g. `/users`
    Static(String),
    /// Named parameter without the colon, e.g. `id` for `/:id`
    Param(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(text) => f.write_str(text),
            Segment::Param(name) => write!(f, "/:{}", name),
        }
    }
}

/// Classifies one raw path part (without its slash) into a segment
pub fn classify_segment(part: &str) -> Segment {
    match part.strip_prefix(':') {
        Some(name) => Segment::Param(name.to_string()),
        None => Segment::Static(format!("/{}", part)),
    }
}

/// Parameters and exactness produced by a successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Extracted `name → value` pairs
    pub params: Values,
    /// `true` when the whole path was consumed; `false` for a prefix match
    pub exact: bool,
}

/// Output of [`PathPattern::merge`]
///
/// Always carries a usable path. Parameters without a value are written as
/// `_` and listed in `missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// The concrete path
    pub path: String,
    /// Values the pattern did not consume, to be sent as a query string
    pub leftover: Values,
    /// Names of parameters that had no value
    pub missing: Vec<String>,
}

impl Merged {
    /// Path followed by `?` and the encoded leftovers, if any
    pub fn path_and_query(&self) -> String {
        if self.leftover.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.leftover.encode())
        }
    }

    /// Converts into `(path, leftover)`, failing if any parameter was missing
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParam`] naming every parameter that had no value.
    pub fn into_result(self) -> Result<(String, Values)> {
        if self.missing.is_empty() {
            Ok((self.path, self.leftover))
        } else {
            Err(Error::MissingParam {
                names: self.missing,
            })
        }
    }
}

/// A parsed, immutable route pattern
///
/// # Examples
///
/// ```
/// use rhtmx_nav::PathPattern;
///
/// let pattern = PathPattern::parse("/blah/:id").unwrap();
///
/// let m = pattern.match_path("/blah/somewhere").unwrap();
/// assert!(m.exact);
/// assert_eq!(m.params.get("id"), Some("somewhere"));
///
/// let merged = pattern.merge(&m.params);
/// assert_eq!(merged.path, "/blah/somewhere");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern string
    ///
    /// The input is treated as rooted and cleaned like a request path, so
    /// `users/:id/` and `/users/:id` parse to the same pattern. `/` parses to
    /// the root wildcard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] when the pattern contains `?` or `#`,
    /// has a parameter with an empty name, or repeats a parameter name.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.contains(['?', '#']) {
            return Err(invalid(
                "patterns cannot contain a query or fragment".to_string(),
            ));
        }

        let cleaned = clean_path(pattern);
        let parts = path_parts(&cleaned);

        if parts.is_empty() {
            return Ok(Self::root());
        }

        let mut seen = HashSet::new();
        let segments = parts
            .into_iter()
            .map(classify_segment)
            .map(|segment| {
                if let Segment::Param(name) = &segment {
                    if name.is_empty() {
                        return Err(invalid("parameter name is empty".to_string()));
                    }
                    if !seen.insert(name.clone()) {
                        return Err(invalid(format!("duplicate parameter name {:?}", name)));
                    }
                }
                Ok(segment)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// The root wildcard pattern `/`
    pub fn root() -> Self {
        Self {
            segments: vec![Segment::Static("/".to_string())],
        }
    }

    /// Whether this is the root wildcard, which matches every path
    pub fn is_root(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Static(text)] if text == "/")
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Matches a concrete path against this pattern
    ///
    /// Returns `None` when the path does not match. A match is `exact` when
    /// the path has no parts beyond the pattern's segments; otherwise it is a
    /// prefix match. Parameter values are taken verbatim from the cleaned path.
    ///
    /// ```
    /// use rhtmx_nav::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/somewhere").unwrap();
    /// assert!(!pattern.match_path("/somewhere/here").unwrap().exact);
    /// assert!(pattern.match_path("/elsewhere").is_none());
    /// ```
    pub fn match_path(&self, path: &str) -> Option<PathMatch> {
        let cleaned = clean_path(path);

        if self.is_root() {
            return Some(PathMatch {
                params: Values::new(),
                exact: cleaned == "/",
            });
        }

        let parts = path_parts(&cleaned);
        if parts.len() < self.segments.len() {
            return None;
        }

        let mut params = Values::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Param(name) => params.set(name.as_str(), *part),
                Segment::Static(text) if text[1..] == **part => {}
                Segment::Static(_) => return None,
            }
        }

        Some(PathMatch {
            params,
            exact: parts.len() == self.segments.len(),
        })
    }

    /// Builds a concrete path from parameter values
    ///
    /// Each parameter takes the first value provided for its name. An empty
    /// string counts as provided. Parameters with no value are written as `_`
    /// and reported in [`Merged::missing`]; building continues regardless.
    /// Values not consumed by the pattern are returned as leftovers.
    ///
    /// ```
    /// use rhtmx_nav::{PathPattern, Values};
    ///
    /// let pattern = PathPattern::parse("/users/:id/:tab").unwrap();
    /// let values: Values = [("id", "7"), ("sort", "asc")].into_iter().collect();
    ///
    /// let merged = pattern.merge(&values);
    /// assert_eq!(merged.path, "/users/7/_");
    /// assert_eq!(merged.missing, vec!["tab"]);
    /// assert_eq!(merged.path_and_query(), "/users/7/_?sort=asc");
    /// ```
    pub fn merge(&self, values: &Values) -> Merged {
        let mut leftover = values.clone();
        let mut missing = Vec::new();
        let mut path = String::with_capacity(64);

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => {
                    path.push('/');
                    match values.get(name) {
                        Some(value) => {
                            path.push_str(value);
                            leftover.remove(name);
                        }
                        None => {
                            path.push_str(MISSING_PARAM_PLACEHOLDER);
                            missing.push(name.clone());
                        }
                    }
                }
            }
        }

        Merged {
            path,
            leftover,
            missing,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.segments
            .iter()
            .try_for_each(|segment| write!(f, "{}", segment))
    }
}

impl FromStr for PathPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn st(text: &str) -> Segment {
        Segment::Static(text.to_string())
    }

    fn param(name: &str) -> Segment {
        Segment::Param(name.to_string())
    }

    #[test]
    fn test_parse_segments() {
        let cases = [
            ("/", vec![st("/")]),
            ("", vec![st("/")]),
            ("/:p1", vec![param("p1")]),
            ("/:p1/", vec![param("p1")]),
            ("/:p1/test", vec![param("p1"), st("/test")]),
            ("/:p1/test/:p2", vec![param("p1"), st("/test"), param("p2")]),
            ("/:p1/:p2", vec![param("p1"), param("p2")]),
            ("/a/b", vec![st("/a"), st("/b")]),
            ("a//b/./c/..", vec![st("/a"), st("/b")]),
        ];

        for (input, expected) in cases {
            let pattern = PathPattern::parse(input).unwrap();
            assert_eq!(pattern.segments(), expected.as_slice(), "pattern {:?}", input);
        }
    }

    #[test]
    fn test_parse_rejects_duplicate_param() {
        let err = PathPattern::parse("/a/:id/b/:id").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_param_name() {
        let err = PathPattern::parse("/a/:").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_parse_rejects_query() {
        assert!(PathPattern::parse("/a?b=1").is_err());
        assert!(PathPattern::parse("/a#top").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["/", "/blah/:id/:id2", "/a/b", "/:p1/test"] {
            assert_eq!(PathPattern::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_root_matches_everything() {
        let root = PathPattern::root();
        assert!(root.match_path("/").unwrap().exact);
        assert!(!root.match_path("/anything/at/all").unwrap().exact);
    }

    #[test]
    fn test_static_segment_must_equal() {
        let pattern = PathPattern::parse("/somewhere").unwrap();
        assert!(pattern.match_path("/somewhere").unwrap().exact);
        assert!(pattern.match_path("/somewhereelse").is_none());
        assert!(pattern.match_path("/").is_none());
    }

    #[test]
    fn test_param_names() {
        let pattern = PathPattern::parse("/a/:x/b/:y").unwrap();
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_merge_empty_value_is_provided() {
        let pattern = PathPattern::parse("/a/:id").unwrap();
        let values: Values = [("id", "")].into_iter().collect();
        let merged = pattern.merge(&values);
        assert_eq!(merged.path, "/a/");
        assert!(merged.missing.is_empty());
    }

    #[test]
    fn test_merge_missing_into_result() {
        let pattern = PathPattern::parse("/a/:id/:tab").unwrap();
        let err = pattern.merge(&Values::new()).into_result().unwrap_err();
        assert_eq!(
            err,
            Error::MissingParam {
                names: vec!["id".to_string(), "tab".to_string()]
            }
        );
    }
}
