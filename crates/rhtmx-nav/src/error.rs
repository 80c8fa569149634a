//! Error types for routing and navigation

/// Errors produced while registering routes, navigating or building URLs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A route pattern could not be parsed. Only the offending registration fails.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// One or more pattern parameters had no value while building a URL
    #[error("missing value for path param(s): {}", .names.join(", "))]
    MissingParam { names: Vec<String> },

    /// `push` was called but no exact route is active
    #[error("no exact route is bound; navigate to an exact route before pushing")]
    NoExactRouteBound,

    /// An inbound path did not start with the configured base path
    #[error("path {path:?} does not begin with prefix {prefix:?}")]
    MissingPrefix { path: String, prefix: String },

    /// Navigation needs a transport but none was attached to the router
    #[error("no navigation transport is available")]
    TransportUnavailable,

    /// The transport reported a location that is not a usable path
    #[error("invalid location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    /// A bound parameter rejected the value written to it
    #[error("invalid param value {value:?}: {reason}")]
    InvalidParamValue { value: String, reason: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
