/// Table-driven tests for pattern matching, merging and path cleaning

use pretty_assertions::assert_eq;
use rhtmx_nav::path::{clean_path, strip_base_path};
use rhtmx_nav::{Error, PathPattern, Values};
use rstest::rstest;

fn values(pairs: &[(&str, &str)]) -> Values {
    pairs.iter().copied().collect()
}

// ============================================================================
// Matching
// ============================================================================

#[rstest]
#[case::root_exact("/", "/", true, &[])]
#[case::root_prefix("/", "/anything", false, &[])]
#[case::single_param("/blah/:id", "/blah/somewhere", true, &[("id", "somewhere")])]
#[case::two_params(
    "/blah/:id/:id2",
    "/blah/somewhere/something",
    true,
    &[("id", "somewhere"), ("id2", "something")]
)]
#[case::static_prefix("/somewhere", "/somewhere/here", false, &[])]
#[case::param_prefix("/users/:id", "/users/7/posts/3", false, &[("id", "7")])]
#[case::trailing_slash("/users/:id", "/users/7/", true, &[("id", "7")])]
#[case::leading_param("/:p1/test", "/x/test", true, &[("p1", "x")])]
fn test_match(
    #[case] pattern: &str,
    #[case] path: &str,
    #[case] exact: bool,
    #[case] expected: &[(&str, &str)],
) {
    let pattern = PathPattern::parse(pattern).unwrap();
    let m = pattern.match_path(path).unwrap();

    assert_eq!(m.exact, exact);
    assert_eq!(m.params, values(expected));
}

#[rstest]
#[case("/somewhere", "/elsewhere")]
#[case("/somewhere", "/")]
#[case("/a/:id", "/a")]
#[case("/a/b", "/a/c")]
#[case("/blah/:id/:id2", "/blah/only")]
fn test_no_match(#[case] pattern: &str, #[case] path: &str) {
    let pattern = PathPattern::parse(pattern).unwrap();
    assert!(pattern.match_path(path).is_none());
}

#[rstest]
#[case("/")]
#[case("/about")]
#[case("/blah/somewhere")]
#[case("/blah/somewhere/something")]
#[case("/x/test/y")]
fn test_match_then_merge_reproduces_path(#[case] path: &str) {
    for pattern in ["/", "/:a", "/blah/:id", "/blah/:id/:id2", "/:p1/test/:p2"] {
        let pattern = PathPattern::parse(pattern).unwrap();
        if let Some(m) = pattern.match_path(path).filter(|m| m.exact) {
            let merged = pattern.merge(&m.params);
            assert_eq!(merged.path, clean_path(path), "pattern {}", pattern);
            assert!(merged.leftover.is_empty());
            assert!(merged.missing.is_empty());
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[rstest]
#[case::duplicate("/a/:id/:id")]
#[case::empty_name("/a/:/b")]
#[case::query("/a?x=1")]
#[case::fragment("/a#top")]
fn test_invalid_patterns(#[case] pattern: &str) {
    let err = PathPattern::parse(pattern).unwrap_err();
    assert!(
        matches!(&err, Error::InvalidPattern { pattern: p, .. } if p == pattern),
        "unexpected error {:?}",
        err
    );
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_merge_leftovers_become_sorted_query() {
    let pattern = PathPattern::parse("/users/:id").unwrap();
    let merged = pattern.merge(&values(&[("sort", "desc"), ("id", "7"), ("filter", "a&b")]));

    assert_eq!(merged.path_and_query(), "/users/7?filter=a%26b&sort=desc");
}

#[test]
fn test_merge_missing_params() {
    let pattern = PathPattern::parse("/blah/:id/:id2").unwrap();
    let merged = pattern.merge(&values(&[("id2", "x")]));

    assert_eq!(merged.path, "/blah/_/x");
    assert_eq!(merged.missing, vec!["id"]);
    assert_eq!(
        merged.into_result().unwrap_err(),
        Error::MissingParam {
            names: vec!["id".to_string()]
        }
    );
}

// ============================================================================
// Path utilities
// ============================================================================

#[rstest]
#[case("", "/")]
#[case("/", "/")]
#[case("a", "/a")]
#[case("/a/", "/a")]
#[case("/a//b", "/a/b")]
#[case("/a/./b", "/a/b")]
#[case("/a/b/..", "/a")]
#[case("/../a", "/a")]
fn test_clean_path(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(clean_path(input), expected);
}

#[rstest]
#[case("/app", "/app", Ok("/"))]
#[case("/app/users", "/app", Ok("/users"))]
#[case("/users", "", Ok("/users"))]
#[case("/apple", "/app", Err(()))]
#[case("/", "/app", Err(()))]
fn test_strip_base_path(
    #[case] path: &str,
    #[case] base: &str,
    #[case] expected: Result<&str, ()>,
) {
    assert_eq!(strip_base_path(path, base).map_err(|_| ()), expected);
}
