//! Two-way parameter bindings
//!
//! A handler binds a parameter name to a [`BindParam`] during dispatch.
//! The router reads every binding back when it rebuilds the URL in
//! [`Router::push`](crate::Router::push).

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::str::FromStr;

use crate::{Error, Result};

/// Something that can be read from and written to as a URL parameter
pub trait BindParam {
    /// Current value(s) as strings
    fn read(&self) -> Vec<String>;

    /// Replaces the value from string(s); only the first value is used by
    /// single-valued params
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParamValue`] if the value cannot be parsed.
    fn write(&mut self, values: &[String]) -> Result<()>;
}

/// Shared handle stored in the router's binding registry
///
/// The application keeps its own clone of the `Rc` to read the value.
pub type ParamHandle = Rc<RefCell<dyn BindParam>>;

/// Wraps a param for sharing between application state and the router
///
/// ```
/// use rhtmx_nav::bind::{shared, BindParam, StringParam};
///
/// let tab = shared(StringParam::new("overview"));
/// assert_eq!(tab.borrow().read(), vec!["overview"]);
/// ```
pub fn shared<P: BindParam>(param: P) -> Rc<RefCell<P>> {
    Rc::new(RefCell::new(param))
}

/// A single string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringParam(pub String);

impl StringParam {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn get(&self) -> &str {
        &self.0
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.0 = value.into();
    }
}

impl BindParam for StringParam {
    fn read(&self) -> Vec<String> {
        vec![self.0.clone()]
    }

    fn write(&mut self, values: &[String]) -> Result<()> {
        self.0 = values.first().cloned().unwrap_or_default();
        Ok(())
    }
}

/// A single value parsed with `FromStr` and rendered with `Display`
///
/// Covers numbers and enums alike. Writing no value resets to the default.
///
/// ```
/// use rhtmx_nav::bind::{BindParam, ParsedParam};
///
/// let mut page = ParsedParam::<u32>::new(1);
/// page.write(&["3".to_string()]).unwrap();
/// assert_eq!(*page.get(), 3);
/// assert!(page.write(&["three".to_string()]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParam<T> {
    value: T,
}

impl<T> ParsedParam<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }
}

impl<T> BindParam for ParsedParam<T>
where
    T: FromStr + Display + Default,
    T::Err: Display,
{
    fn read(&self) -> Vec<String> {
        vec![self.value.to_string()]
    }

    fn write(&mut self, values: &[String]) -> Result<()> {
        let Some(raw) = values.first() else {
            self.value = T::default();
            return Ok(());
        };

        self.value = raw.parse().map_err(|err: T::Err| Error::InvalidParamValue {
            value: raw.clone(),
            reason: err.to_string(),
        })?;
        Ok(())
    }
}

/// Every value of a repeated parameter, e.g. `?tag=a&tag=b`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParam(pub Vec<String>);

impl BindParam for ListParam {
    fn read(&self) -> Vec<String> {
        self.0.clone()
    }

    fn write(&mut self, values: &[String]) -> Result<()> {
        self.0 = values.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq)]
    enum Tab {
        #[default]
        Overview,
        Settings,
    }

    impl FromStr for Tab {
        type Err = String;

        fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
            match s {
                "overview" => Ok(Tab::Overview),
                "settings" => Ok(Tab::Settings),
                other => Err(format!("unknown tab {:?}", other)),
            }
        }
    }

    impl Display for Tab {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(match self {
                Tab::Overview => "overview",
                Tab::Settings => "settings",
            })
        }
    }

    #[test]
    fn test_string_param() {
        let mut param = StringParam::new("a");
        param.write(&["b".to_string(), "c".to_string()]).unwrap();
        assert_eq!(param.read(), vec!["b"]);

        param.write(&[]).unwrap();
        assert_eq!(param.get(), "");
    }

    #[test]
    fn test_enum_param() {
        let mut tab = ParsedParam::new(Tab::Overview);
        tab.write(&["settings".to_string()]).unwrap();
        assert_eq!(tab.get(), &Tab::Settings);
        assert_eq!(tab.read(), vec!["settings"]);

        let err = tab.write(&["nope".to_string()]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidParamValue {
                value: "nope".to_string(),
                reason: "unknown tab \"nope\"".to_string(),
            }
        );
        assert_eq!(tab.get(), &Tab::Settings);
    }

    #[test]
    fn test_parsed_param_resets_on_empty() {
        let mut page = ParsedParam::new(9_i64);
        page.write(&[]).unwrap();
        assert_eq!(*page.get(), 0);
    }

    #[test]
    fn test_list_param() {
        let mut tags = ListParam::default();
        tags.write(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(tags.read(), vec!["a", "b"]);
    }

    #[test]
    fn test_shared_handle_coerces() {
        let name = shared(StringParam::new("x"));
        let handle: ParamHandle = name.clone();
        handle.borrow_mut().write(&["y".to_string()]).unwrap();
        assert_eq!(name.borrow().get(), "y");
    }
}
