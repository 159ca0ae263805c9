//! Registry configuration errors.

use crate::validate::RouteNameError;
use thiserror::Error;

/// An error raised synchronously from registry mutation calls.
///
/// Configuration errors indicate programmer misuse (duplicate names, missing
/// handlers, invalid timeouts) and are never produced during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The route name failed grammar validation.
    #[error(transparent)]
    InvalidRoute(#[from] RouteNameError),

    /// A route with this name is already registered.
    #[error("Route already exists: {0}")]
    RouteExists(String),

    /// No handler stage was supplied for the route.
    #[error("At least one handler is required")]
    MissingHandler,

    /// More than one handler stage was supplied for the route.
    #[error("Only one handler is allowed per route")]
    MultipleHandlers,

    /// The route to describe does not exist.
    #[error("Route does not exist: {0}")]
    RouteDoesNotExist(String),

    /// The configured timeout was not a positive duration.
    #[error("Timeout should be a positive integer")]
    InvalidTimeout,

    /// The registry to merge or namespace has no routes.
    #[error("No routes to merge")]
    EmptyRegistry,

    /// Merging or namespacing would collide with an existing route.
    #[error("Cannot merge duplicate routes: {0}")]
    DuplicateRoute(String),
}
