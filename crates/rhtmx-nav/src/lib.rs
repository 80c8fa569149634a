//! # RHTMX Nav
//!
//! A client-side URL router for single-page apps:
//! - Static routes (`/about`)
//! - Dynamic parameters (`/users/:id`)
//! - Prefix matching: `/users` also fires for `/users/7`
//! - Multicast dispatch: every matching route's handler runs, in registration order
//! - Two-way parameter binding: handlers bind state, `push` writes it back to the URL
//!
//! ## Forward and Reverse
//!
//! Forward navigation turns a URL into handler calls:
//! [`Router::navigate`], [`Router::process`], [`Router::pull`].
//!
//! Reverse navigation turns bound state back into a URL:
//! [`Router::push`], [`Router::reverse_url`].
//!
//! ## Path Cleaning
//!
//! Patterns and paths are cleaned before matching:
//! - Trailing slashes: `/path/` → `/path`
//! - Double slashes: `/path//to` → `/path/to`
//! - Dot segments: `/a/./b/../c` → `/a/c`
//!
//! ## Transport
//!
//! The address bar is reached through [`NavigationTransport`]. Hosts
//! implement it over their history API; [`MemoryHistory`] keeps a history
//! stack in memory.
//!
//! ## Example
//!
//! ```
//! use rhtmx_nav::{handler_fn, MemoryHistory, Router, Values};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let history = MemoryHistory::new("/");
//! let mut router = Router::new().with_transport(Rc::new(history.clone()));
//!
//! let calls = Rc::new(RefCell::new(Vec::new()));
//! let log = calls.clone();
//! router
//!     .add_route("/", handler_fn(move |rm| log.borrow_mut().push(format!("root {}", rm.exact()))))
//!     .unwrap();
//! let log = calls.clone();
//! router
//!     .add_route("/users/:id", handler_fn(move |rm| {
//!         log.borrow_mut().push(format!("user {}", rm.param("id").unwrap_or_default()))
//!     }))
//!     .unwrap();
//!
//! router.navigate("/users/7", &Values::new(), &[]).unwrap();
//!
//! assert_eq!(*calls.borrow(), vec!["root false", "user 7"]);
//! assert_eq!(history.current(), "/users/7");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod bind;
pub mod config;
mod error;
pub mod path;
pub mod route;
mod router;
pub mod transport;
mod values;

pub use bind::{BindParam, ListParam, ParamHandle, ParsedParam, StringParam};
pub use config::{RouterConfig, RoutingConfig};
pub use error::{Error, Result};
pub use path::{clean_path, is_clean_path};
pub use route::{handler_fn, Merged, PathMatch, PathPattern, RouteHandler, RouteTable};
pub use router::{NavOption, RouteMatch, Router};
pub use transport::{Location, MemoryHistory, NavigationTransport, Subscription};
pub use values::Values;
