//! Navigation transport: where locations are read from and written to
//!
//! In a browser this is the address bar and history API. The router only
//! talks to the [`NavigationTransport`] trait; [`MemoryHistory`] is an
//! in-process implementation for tests and non-browser hosts.

use std::borrow::Cow;
use std::fmt;

use crate::{Error, Result, Values};

mod memory;

pub use memory::MemoryHistory;

/// A path plus its query values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Values,
}

impl Location {
    pub fn new(path: impl Into<String>, query: Values) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// Parses a path-and-query string or an absolute URL
    ///
    /// Scheme and authority are dropped, as is any `#fragment`. The path is
    /// percent-decoded.
    ///
    /// ```
    /// use rhtmx_nav::Location;
    ///
    /// let location = Location::parse("https://example.com/app/users?id=7#top").unwrap();
    /// assert_eq!(location.path, "/app/users");
    /// assert_eq!(location.query.get("id"), Some("7"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if no path starting with `/` remains.
    pub fn parse(location: &str) -> Result<Self> {
        let without_fragment = location
            .split_once('#')
            .map_or(location, |(before, _)| before);

        // Authority ends at the first '/' or '?'; a bare authority has path "/"
        let target: Cow<'_, str> = match without_fragment.split_once("://") {
            Some((scheme, rest)) if !scheme.contains(['/', '?']) => match rest.find(['/', '?']) {
                Some(end) if rest[end..].starts_with('/') => Cow::Borrowed(&rest[end..]),
                Some(end) => Cow::Owned(format!("/{}", &rest[end..])),
                None => Cow::Borrowed("/"),
            },
            _ => Cow::Borrowed(without_fragment),
        };

        let relative: &str = &target;
        let (path, query) = relative.split_once('?').unwrap_or((relative, ""));

        if !path.starts_with('/') {
            return Err(Error::InvalidLocation {
                location: location.to_string(),
                reason: "path must start with '/'".to_string(),
            });
        }

        Ok(Self {
            path: decode_path(path),
            query: Values::parse(query),
        })
    }
}

/// Percent-decodes a location path; invalid UTF-8 is kept verbatim
fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_string())
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query.encode())?;
        }
        Ok(())
    }
}

/// Callback invoked when the location changes outside the router
/// (back/forward buttons, fragment edits)
pub type LocationCallback = Box<dyn Fn(&Location)>;

/// Keeps a location-change listener registered
///
/// Dropping the subscription unregisters the listener.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregisters the listener now
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Reads and writes the current location
///
/// Paths passed in and out here include the deployment base path; the
/// router adds and strips it.
pub trait NavigationTransport {
    /// The current location
    fn read_current_location(&self) -> Result<Location>;

    /// Adds a new history entry
    fn push_location(&self, path_and_query: &str);

    /// Overwrites the current history entry
    fn replace_location(&self, path_and_query: &str);

    /// Subscribes to location changes made outside the router
    ///
    /// Returns `None` when the transport cannot report changes.
    fn on_location_change(&self, _callback: LocationCallback) -> Option<Subscription> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_parse_relative() {
        let location = Location::parse("/a/b?x=1&x=2").unwrap();
        assert_eq!(location.path, "/a/b");
        assert_eq!(location.query.get_all("x"), ["1", "2"]);
    }

    #[test]
    fn test_parse_absolute_without_path() {
        let location = Location::parse("http://localhost:8080").unwrap();
        assert_eq!(location.path, "/");
        assert!(location.query.is_empty());
    }

    #[test]
    fn test_parse_absolute_with_query_and_no_path() {
        let location = Location::parse("https://example.com?x=1#top").unwrap();
        assert_eq!(location.path, "/");
        assert_eq!(location.query.get("x"), Some("1"));
    }

    #[test]
    fn test_parse_decodes_path() {
        let location = Location::parse("/users/john%20doe?q=a%20b").unwrap();
        assert_eq!(location.path, "/users/john doe");
        assert_eq!(location.query.get("q"), Some("a b"));

        let location = Location::parse("/raw/%FF").unwrap();
        assert_eq!(location.path, "/raw/%FF");
    }

    #[test]
    fn test_parse_url_inside_query_is_not_a_scheme() {
        let location = Location::parse("/login?next=http://x/y").unwrap();
        assert_eq!(location.path, "/login");
        assert_eq!(location.query.get("next"), Some("http://x/y"));
    }

    #[test]
    fn test_parse_rejects_relative_path() {
        assert!(matches!(
            Location::parse("users/7"),
            Err(Error::InvalidLocation { .. })
        ));
    }

    #[test]
    fn test_display() {
        let query: Values = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(Location::new("/x", query).to_string(), "/x?a=1&b=2");
        assert_eq!(Location::new("/x", Values::new()).to_string(), "/x");
    }

    #[test]
    fn test_subscription_cancels_once_on_drop() {
        let cancelled = Rc::new(Cell::new(0));
        let counter = cancelled.clone();
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));

        subscription.unsubscribe();
        assert_eq!(cancelled.get(), 1);
    }
}
