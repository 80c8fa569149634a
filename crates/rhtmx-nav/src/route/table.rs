/// Ordered route table
///
/// Entries keep registration order forever. Dispatch scans them linearly in
/// that order; nothing sorts or indexes them.
use std::rc::Rc;

use crate::route::handler::{ExactOnly, RouteHandler};
use crate::route::pattern::PathPattern;
use crate::Result;

/// A pattern paired with the handler registered for it
#[derive(Clone)]
pub struct RouteEntry {
    pub(crate) pattern: Rc<PathPattern>,
    pub(crate) handler: Rc<dyn RouteHandler>,
}

impl RouteEntry {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

/// Append-only list of routes plus the not-found handler
///
/// Built by the application and handed to [`Router::with_table`](crate::Router::with_table),
/// or filled through the router's own registration methods.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{handler_fn, RouteTable};
///
/// let table = RouteTable::new()
///     .with_route("/", handler_fn(|_| {}))
///     .unwrap()
///     .with_route("/users/:id", handler_fn(|_| {}))
///     .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.patterns().next().unwrap().to_string(), "/");
/// ```
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    not_found: Option<Rc<dyn RouteHandler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every path the pattern matches, exact or prefix
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) and
    /// leaves the table unchanged if the pattern does not parse.
    pub fn add_route<H>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: RouteHandler + 'static,
    {
        let pattern = PathPattern::parse(pattern)?;
        tracing::trace!(pattern = %pattern, index = self.entries.len(), "route registered");
        self.entries.push(RouteEntry {
            pattern: Rc::new(pattern),
            handler: Rc::new(handler),
        });
        Ok(())
    }

    /// Registers a handler that only fires on exact matches
    ///
    /// An exact route for `/a` does not fire for `/a/b`.
    pub fn add_route_exact<H>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: RouteHandler + 'static,
    {
        self.add_route(pattern, ExactOnly(handler))
    }

    /// Builder form of [`add_route`](Self::add_route)
    pub fn with_route<H>(mut self, pattern: &str, handler: H) -> Result<Self>
    where
        H: RouteHandler + 'static,
    {
        self.add_route(pattern, handler)?;
        Ok(self)
    }

    /// Builder form of [`add_route_exact`](Self::add_route_exact)
    pub fn with_route_exact<H>(mut self, pattern: &str, handler: H) -> Result<Self>
    where
        H: RouteHandler + 'static,
    {
        self.add_route_exact(pattern, handler)?;
        Ok(self)
    }

    /// Sets the handler called when no route matched exactly
    pub fn set_not_found<H>(&mut self, handler: H)
    where
        H: RouteHandler + 'static,
    {
        self.not_found = Some(Rc::new(handler));
    }

    /// The current not-found handler, for wrapping it in another one
    pub fn not_found(&self) -> Option<Rc<dyn RouteHandler>> {
        self.not_found.clone()
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&RouteEntry> {
        self.entries.get(index)
    }

    /// Registered patterns in registration order
    pub fn patterns(&self) -> impl Iterator<Item = &PathPattern> {
        self.entries.iter().map(RouteEntry::pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field(
                "patterns",
                &self.patterns().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("has_not_found", &self.not_found.is_some())
            .finish()
    }
}
