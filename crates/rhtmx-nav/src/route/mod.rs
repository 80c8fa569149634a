/// Route module: patterns, handlers and the ordered route table
///
/// Pattern functions are pure (same input → same output). The table is
/// append-only and keeps registration order.
pub mod handler;
pub mod pattern;
pub mod table;

pub use handler::{handler_fn, ExactOnly, HandlerFn, RouteHandler};
pub use pattern::{classify_segment, Merged, PathMatch, PathPattern, Segment};
pub use table::{RouteEntry, RouteTable};
