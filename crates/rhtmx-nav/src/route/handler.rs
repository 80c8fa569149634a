/// Route handler trait and adapters
use crate::RouteMatch;

/// Called for every route whose pattern matches the path being processed
///
/// Handlers run synchronously, in registration order, and must not block.
/// They may bind parameters and may navigate again through
/// [`RouteMatch::router`].
pub trait RouteHandler {
    fn handle(&self, rm: &mut RouteMatch<'_>);
}

/// Plain functions are handlers
///
/// ```
/// use rhtmx_nav::{RouteMatch, Router};
///
/// fn home(rm: &mut RouteMatch<'_>) {
///     assert_eq!(rm.path(), "/");
/// }
///
/// let mut router = Router::new();
/// router.add_route_exact("/", home).unwrap();
/// ```
impl<F> RouteHandler for F
where
    F: Fn(&mut RouteMatch<'_>),
{
    fn handle(&self, rm: &mut RouteMatch<'_>) {
        self(rm)
    }
}

/// Closure handler produced by [`handler_fn`]
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(F);

/// Wraps a closure as a [`RouteHandler`]
///
/// Gives the closure's argument its full signature, so closures need no
/// type annotations.
///
/// ```
/// use rhtmx_nav::{handler_fn, Router};
///
/// let mut router = Router::new();
/// router
///     .add_route("/users/:id", handler_fn(|rm| {
///         assert!(rm.param("id").is_some());
///     }))
///     .unwrap();
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut RouteMatch<'_>),
{
    HandlerFn(f)
}

impl<F> RouteHandler for HandlerFn<F>
where
    F: Fn(&mut RouteMatch<'_>),
{
    fn handle(&self, rm: &mut RouteMatch<'_>) {
        (self.0)(rm)
    }
}

/// Forwards to the inner handler only for exact matches
pub struct ExactOnly<H>(pub H);

impl<H: RouteHandler> RouteHandler for ExactOnly<H> {
    fn handle(&self, rm: &mut RouteMatch<'_>) {
        if rm.exact() {
            self.0.handle(rm);
        }
    }
}
