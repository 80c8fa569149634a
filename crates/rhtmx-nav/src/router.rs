//! Router: dispatch, parameter binding and navigation
//!
//! Dispatch is a plain, synchronous scan of the route table in registration
//! order. Every matching handler runs; the first exact match is remembered
//! so [`Router::push`] can rebuild the URL from bound parameters later.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::bind::ParamHandle;
use crate::config::RoutingConfig;
use crate::path::{clean_path, normalize_base_path, strip_base_path};
use crate::route::{Merged, PathMatch, PathPattern, RouteHandler, RouteTable};
use crate::transport::{Location, NavigationTransport, Subscription};
use crate::{Error, Result, Values};

/// Options accepted by [`Router::navigate`] and [`Router::push`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavOption {
    /// Replace the current history entry instead of adding one
    Replace,
    /// Do not raise the re-render signal for this navigation
    SkipRender,
}

// ============================================================================
// RouteMatch
// ============================================================================

/// What a handler sees for one matching route
///
/// Created fresh for each matching route in each dispatch and dropped when
/// the handler returns.
pub struct RouteMatch<'r> {
    path: String,
    route_path: Option<String>,
    params: Values,
    exact: bool,
    router: &'r mut Router,
}

impl<'r> RouteMatch<'r> {
    /// The path being processed, as given to the router
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The matching pattern with params as `:name`; `None` for not-found
    pub fn route_path(&self) -> Option<&str> {
        self.route_path.as_deref()
    }

    /// Route params, plus query params for names the route did not set
    pub fn params(&self) -> &Values {
        &self.params
    }

    /// First value of a param
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// `true` if the pattern consumed the whole path
    pub fn exact(&self) -> bool {
        self.exact
    }

    /// Binds a param so [`Router::push`] can read it back
    ///
    /// A later bind with the same name during the same dispatch replaces
    /// this one.
    pub fn bind(&mut self, name: impl Into<String>, param: ParamHandle) {
        let name = name.into();
        trace!(name = %name, "param bound");
        self.router.bound.insert(name, param);
    }

    /// Writes this match's values for `name` into `param`, then binds it
    ///
    /// # Errors
    ///
    /// Returns the param's write error; the param is not bound in that case.
    pub fn bind_and_write(&mut self, name: impl Into<String>, param: ParamHandle) -> Result<()> {
        let name = name.into();
        param.borrow_mut().write(self.params.get_all(&name))?;
        self.bind(name, param);
        Ok(())
    }

    /// The router running this dispatch, for reentrant navigation
    pub fn router(&mut self) -> &mut Router {
        self.router
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("path", &self.path)
            .field("route_path", &self.route_path)
            .field("params", &self.params)
            .field("exact", &self.exact)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Client-side router
///
/// Owns the route table, the bound-param registry and the pattern of the
/// last exact match. Single-threaded: handlers and bound params are `Rc`
/// values, so the router stays on the thread that built it.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::bind::{shared, StringParam};
/// use rhtmx_nav::{handler_fn, MemoryHistory, Router, Values};
/// use std::rc::Rc;
///
/// let history = MemoryHistory::new("/");
/// let mut router = Router::new().with_transport(Rc::new(history.clone()));
///
/// let user_id = shared(StringParam::default());
/// let bound = user_id.clone();
/// router
///     .add_route_exact("/users/:id", handler_fn(move |rm| {
///         rm.bind_and_write("id", bound.clone()).unwrap();
///     }))
///     .unwrap();
///
/// router.navigate("/users/7", &Values::new(), &[]).unwrap();
/// assert_eq!(user_id.borrow().get(), "7");
///
/// user_id.borrow_mut().set("8");
/// router.push(&[]).unwrap();
/// assert_eq!(history.current(), "/users/8");
/// ```
pub struct Router {
    table: RouteTable,
    base_path: String,
    transport: Option<Rc<dyn NavigationTransport>>,
    bound: HashMap<String, ParamHandle>,
    exact_pattern: Option<Rc<PathPattern>>,
    last_options: Vec<NavOption>,
    render_requested: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a router with no routes, no base path and no transport
    pub fn new() -> Self {
        Self::with_table(RouteTable::new())
    }

    /// Creates a router around a table built elsewhere
    pub fn with_table(table: RouteTable) -> Self {
        Self {
            table,
            base_path: String::new(),
            transport: None,
            bound: HashMap::new(),
            exact_pattern: None,
            last_options: Vec::new(),
            render_requested: false,
        }
    }

    /// Creates a router configured from the `[routing]` config section
    pub fn from_config(config: &RoutingConfig) -> Self {
        let mut router = Self::new();
        if let Some(base) = &config.base_path {
            router.set_base_path(base);
        }
        router
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Attaches the transport used by navigate, push, pull and listen
    pub fn with_transport(mut self, transport: Rc<dyn NavigationTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn set_transport(&mut self, transport: Rc<dyn NavigationTransport>) {
        self.transport = Some(transport);
    }

    /// Whether a transport is attached
    pub fn transport_available(&self) -> bool {
        self.transport.is_some()
    }

    /// Builder form of [`set_base_path`](Self::set_base_path)
    pub fn with_base_path(mut self, base: &str) -> Self {
        self.set_base_path(base);
        self
    }

    /// Sets the deployment base path
    ///
    /// The base path is prepended to outbound locations and stripped from
    /// inbound ones. Route patterns never include it: with base `/pfx`,
    /// `navigate("/a")` writes `/pfx/a` but dispatches `/a`.
    pub fn set_base_path(&mut self, base: &str) {
        self.base_path = normalize_base_path(base);
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Adds a route that fires for exact and prefix matches
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`]; other routes are unaffected.
    pub fn add_route<H>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: RouteHandler + 'static,
    {
        self.table.add_route(pattern, handler)
    }

    /// Adds a route that fires only for exact matches
    pub fn add_route_exact<H>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: RouteHandler + 'static,
    {
        self.table.add_route_exact(pattern, handler)
    }

    /// Sets the handler called when no route matched exactly
    pub fn set_not_found<H>(&mut self, handler: H)
    where
        H: RouteHandler + 'static,
    {
        self.table.set_not_found(handler);
    }

    /// The current not-found handler, so it can be wrapped
    pub fn not_found(&self) -> Option<Rc<dyn RouteHandler>> {
        self.table.not_found()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    // ========================================================================
    // Forward navigation
    // ========================================================================

    /// Goes to `path` with `query`: dispatches, then writes the location
    ///
    /// The transport receives the base path, the cleaned path and the
    /// encoded query, so a later [`pull`](Self::pull) reads the same route
    /// back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportUnavailable`] without dispatching when no
    /// transport is attached. Use [`process`](Self::process) to dispatch
    /// without one.
    pub fn navigate(&mut self, path: &str, query: &Values, opts: &[NavOption]) -> Result<()> {
        let transport = self.transport.clone().ok_or(Error::TransportUnavailable)?;

        debug!(path, ?opts, "navigate");
        self.last_options = opts.to_vec();
        self.process(path, query);

        let location = outbound_location(&self.base_path, path, query);
        write_location(transport.as_ref(), &location, opts);

        if !opts.contains(&NavOption::SkipRender) {
            self.render_requested = true;
        }
        Ok(())
    }

    /// Reads the transport's current location and dispatches it
    ///
    /// Usually called once at startup.
    ///
    /// # Errors
    ///
    /// [`Error::TransportUnavailable`], the transport's own read error, or
    /// [`Error::MissingPrefix`] if the location is outside the base path.
    pub fn pull(&mut self) -> Result<()> {
        let transport = self.transport.clone().ok_or(Error::TransportUnavailable)?;
        let location = transport.read_current_location()?;
        debug!(location = %location, "pull");
        self.process_location(&location)
    }

    /// Dispatches a path-and-query string such as a server request target
    ///
    /// The base path is stripped first.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLocation`] or [`Error::MissingPrefix`].
    pub fn process_url(&mut self, path_and_query: &str) -> Result<()> {
        let location = Location::parse(path_and_query)?;
        self.process_location(&location)
    }

    fn process_location(&mut self, location: &Location) -> Result<()> {
        let path = strip_base_path(&location.path, &self.base_path)?.to_string();
        self.process(&path, &location.query);
        Ok(())
    }

    /// Runs one dispatch cycle for `path` and `query`
    ///
    /// 1. Clears bound params and the remembered exact pattern.
    /// 2. Calls every matching handler in registration order, with route
    ///    params first and query params filling the remaining names.
    /// 3. Remembers the first exact match for [`push`](Self::push).
    /// 4. Calls the not-found handler if nothing matched exactly.
    ///
    /// Handlers may navigate from inside this call. The nested dispatch
    /// starts a fresh cycle; this scan then continues with the remaining
    /// routes.
    pub fn process(&mut self, path: &str, query: &Values) {
        self.bound.clear();
        self.exact_pattern = None;
        let mut found_exact = false;

        let mut index = 0;
        while let Some(entry) = self.table.entry(index).cloned() {
            index += 1;

            let Some(PathMatch { mut params, exact }) = entry.pattern.match_path(path) else {
                continue;
            };

            if exact && !found_exact {
                found_exact = true;
                self.exact_pattern = Some(Rc::clone(&entry.pattern));
            }

            params.fill_missing(query);
            trace!(path, pattern = %entry.pattern, exact, "route matched");

            let mut rm = RouteMatch {
                path: path.to_string(),
                route_path: Some(entry.pattern.to_string()),
                params,
                exact,
                router: self,
            };
            entry.handler.handle(&mut rm);
        }

        if found_exact {
            return;
        }

        match self.table.not_found() {
            Some(handler) => {
                debug!(path, "no exact route; calling not-found handler");
                let mut rm = RouteMatch {
                    path: path.to_string(),
                    route_path: None,
                    params: Values::new(),
                    exact: false,
                    router: self,
                };
                handler.handle(&mut rm);
            }
            None => debug!(path, "no exact route and no not-found handler"),
        }
    }

    // ========================================================================
    // Reverse navigation
    // ========================================================================

    /// Current values of every bound param
    pub fn bound_values(&self) -> Values {
        let mut values = Values::new();
        for (name, param) in &self.bound {
            values.set_all(name.as_str(), param.borrow().read());
        }
        values
    }

    /// Names currently bound, sorted
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bound.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Removes every binding
    ///
    /// Dispatch already does this at the start of each cycle.
    pub fn unbind_params(&mut self) {
        self.bound.clear();
    }

    /// The pattern of the first exact match of the last dispatch
    pub fn exact_route(&self) -> Option<&PathPattern> {
        self.exact_pattern.as_deref()
    }

    /// Rebuilds the current URL from bound params, without the base path
    ///
    /// The result is best-effort: missing params appear as `_` and are
    /// listed in [`Merged::missing`].
    ///
    /// # Errors
    ///
    /// [`Error::NoExactRouteBound`] if the last dispatch had no exact match.
    pub fn reverse_url(&self) -> Result<Merged> {
        let pattern = self.exact_pattern.as_ref().ok_or(Error::NoExactRouteBound)?;
        Ok(pattern.merge(&self.bound_values()))
    }

    /// Writes the URL rebuilt from bound params to the transport
    ///
    /// Params used by the exact route's pattern go into the path; the rest
    /// become the query string.
    ///
    /// # Errors
    ///
    /// - [`Error::NoExactRouteBound`] if no exact route is active
    /// - [`Error::TransportUnavailable`] if no transport is attached
    /// - [`Error::MissingParam`] if a pattern param is not bound
    ///
    /// Nothing is written on error.
    pub fn push(&mut self, opts: &[NavOption]) -> Result<()> {
        let merged = self.reverse_url()?;
        let transport = self.transport.clone().ok_or(Error::TransportUnavailable)?;

        let (path, leftover) = merged.into_result()?;
        let location = outbound_location(&self.base_path, &path, &leftover);

        debug!(location = %location, ?opts, "push");
        write_location(transport.as_ref(), &location, opts);
        self.last_options = opts.to_vec();
        Ok(())
    }

    // ========================================================================
    // Render signal
    // ========================================================================

    /// Options passed to the most recent `navigate` or successful `push`
    pub fn last_nav_options(&self) -> &[NavOption] {
        &self.last_options
    }

    /// Returns and clears the re-render request
    ///
    /// Set by [`navigate`](Self::navigate) unless [`NavOption::SkipRender`]
    /// was given, and by location changes seen through [`listen`](Self::listen).
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    // ========================================================================
    // Location change listening
    // ========================================================================

    /// Dispatches whenever the transport reports an outside location change
    ///
    /// The listener holds a weak reference; dropping the router stops it.
    /// Changes that arrive while the router is busy, or outside the base
    /// path, are logged and ignored.
    ///
    /// # Errors
    ///
    /// [`Error::TransportUnavailable`] if there is no transport or it cannot
    /// report changes.
    pub fn listen(router: &Rc<RefCell<Router>>) -> Result<Subscription> {
        let transport = router
            .borrow()
            .transport
            .clone()
            .ok_or(Error::TransportUnavailable)?;

        let weak = Rc::downgrade(router);
        transport
            .on_location_change(Box::new(move |location: &Location| {
                let Some(router) = weak.upgrade() else {
                    return;
                };
                let Ok(mut router) = router.try_borrow_mut() else {
                    warn!(location = %location, "router busy; location change dropped");
                    return;
                };

                match router.process_location(location) {
                    Ok(()) => router.render_requested = true,
                    Err(err) => warn!(%err, "location change ignored"),
                }
            }))
            .ok_or(Error::TransportUnavailable)
    }
}

/// `base + clean path [+ "?" + query]`; the root path under a base is the base itself
fn outbound_location(base: &str, path: &str, query: &Values) -> String {
    let path = clean_path(path);
    let mut location = match path.as_ref() {
        "/" if !base.is_empty() => base.to_string(),
        _ => format!("{}{}", base, path),
    };

    let encoded = query.encode();
    if !encoded.is_empty() {
        location.push('?');
        location.push_str(&encoded);
    }
    location
}

fn write_location(transport: &dyn NavigationTransport, location: &str, opts: &[NavOption]) {
    if opts.contains(&NavOption::Replace) {
        transport.replace_location(location);
    } else {
        transport.push_location(location);
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("table", &self.table)
            .field("base_path", &self.base_path)
            .field("transport", &self.transport.is_some())
            .field("bound", &self.bound_names())
            .field("exact_pattern", &self.exact_pattern.as_ref().map(ToString::to_string))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::handler_fn;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outbound_location() {
        let query: Values = [("b", "2"), ("a", "x y")].into_iter().collect();

        assert_eq!(outbound_location("", "/a", &Values::new()), "/a");
        assert_eq!(outbound_location("/app", "/a", &query), "/app/a?a=x%20y&b=2");
        assert_eq!(outbound_location("/app", "/", &Values::new()), "/app");
        assert_eq!(outbound_location("", "/", &Values::new()), "/");
        assert_eq!(outbound_location("/app", "a", &Values::new()), "/app/a");
        assert_eq!(outbound_location("", "a//b/", &Values::new()), "/a/b");
        assert_eq!(outbound_location("/app", "", &Values::new()), "/app");
    }

    #[test]
    fn test_reverse_url_needs_exact_route() {
        let mut router = Router::new();
        assert_eq!(router.reverse_url().unwrap_err(), Error::NoExactRouteBound);

        router.add_route("/a/:id", handler_fn(|_| {})).unwrap();
        router.process("/a/1", &Values::new());
        assert_eq!(router.reverse_url().unwrap().path, "/a/_");
    }

    #[test]
    fn test_route_match_accessors() {
        let mut router = Router::new();
        router
            .add_route(
                "/users/:id",
                handler_fn(|rm| {
                    assert_eq!(rm.path(), "/users/7/posts");
                    assert_eq!(rm.route_path(), Some("/users/:id"));
                    assert_eq!(rm.param("id"), Some("7"));
                    assert_eq!(rm.param("q"), Some("x"));
                    assert!(!rm.exact());
                }),
            )
            .unwrap();

        router.process("/users/7/posts", &Values::parse("q=x"));
    }

    #[test]
    fn test_debug_lists_patterns() {
        let mut router = Router::new().with_base_path("/app");
        router.add_route("/a", handler_fn(|_| {})).unwrap();

        let debug = format!("{:?}", router);
        assert!(debug.contains("\"/a\""));
        assert!(debug.contains("base_path: \"/app\""));
    }
}
