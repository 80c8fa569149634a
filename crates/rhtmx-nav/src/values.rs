//! Multi-valued string maps for query strings and route parameters
//!
//! Keys are kept sorted so encoding is deterministic.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// An ordered `key → [values]` map
///
/// Used for query strings, for parameters extracted from a path and for the
/// values read back from bound parameters.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::Values;
///
/// let mut values = Values::parse("?tag=a&tag=b&q=hello+world");
/// assert_eq!(values.get("q"), Some("hello world"));
/// assert_eq!(values.get_all("tag"), ["a", "b"]);
///
/// values.set("page", "2");
/// assert_eq!(values.encode(), "page=2&q=hello%20world&tag=a&tag=b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    inner: BTreeMap<String, Vec<String>>,
}

impl Values {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string, with or without the leading `?`
    ///
    /// Pairs without `=` get an empty value. `+` decodes to a space. Invalid
    /// percent-encoding is kept verbatim rather than dropped.
    pub fn parse(query: &str) -> Self {
        query
            .strip_prefix('?')
            .unwrap_or(query)
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .map(|(key, value)| (decode_component(key), decode_component(value)))
            .collect()
    }

    /// Encodes as a query string (without `?`), keys sorted
    pub fn encode(&self) -> String {
        self.inner
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        urlencoding::encode(key),
                        urlencoding::encode(value)
                    )
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns the first value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key` (empty if absent)
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces all values for `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Replaces all values for `key`; an empty list removes the key
    pub fn set_all(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if values.is_empty() {
            self.inner.remove(&key);
        } else {
            self.inner.insert(key, values);
        }
    }

    /// Appends a value for `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Removes `key`, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates keys in sorted order with their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Copies every key of `other` that is not already present
    ///
    /// Existing keys are never overwritten.
    pub fn fill_missing(&mut self, other: &Values) {
        for (key, values) in &other.inner {
            if !self.inner.contains_key(key) {
                self.inner.insert(key.clone(), values.clone());
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| spaced.into_owned())
}
