//! The route registry.
//!
//! A [`Router`] maps validated route names to [`Route`]s. Registration is a
//! build-time phase: the registry must be treated as read-only for the
//! lifetime of a dispatch call.

use crate::error::ConfigError;
use crate::stage::{Afterware, Middleware, Stage};
use crate::validate::validate_route_name;
use indexmap::IndexMap;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Registry-wide options, set at construction.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Default visibility of registered routes for introspection.
    pub introspection: bool,
    /// Default per-route timeout, inherited by routes registered without
    /// their own. `None` means no timeout.
    pub timeout: Option<Duration>,
}

/// Per-route metadata updates, applied through [`Router::describe`].
///
/// Every field is optional; `None` leaves the current value untouched.
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
    /// Human-readable route description.
    pub description: Option<String>,
    /// JSON schema describing the route's params.
    pub schema: Option<Value>,
    /// Whether the route is visible to introspection.
    pub visible: Option<bool>,
    /// Whether params should be validated against the schema (reserved).
    pub validate: Option<bool>,
    /// Per-route timeout; must be positive.
    pub timeout: Option<Duration>,
}

impl RouteConfig {
    fn check(&self) -> Result<(), ConfigError> {
        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

/// A registered route: its fixed stage chain plus metadata.
#[derive(Debug, Clone)]
pub struct Route {
    stages: Vec<Stage>,
    description: Option<String>,
    schema: Option<Value>,
    visible: bool,
    validate: bool,
    timeout: Option<Duration>,
}

impl Route {
    /// The full ordered stage chain, fixed at registration time.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The route description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The params schema, if set.
    #[must_use]
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// Whether the route is visible to introspection.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// Whether strict params validation is requested (reserved).
    #[must_use]
    pub const fn validate(&self) -> bool {
        self.validate
    }

    /// The per-route timeout ceiling, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// The route registry: named routes plus default stages.
///
/// Default middleware and afterware registered through [`Router::before`] and
/// [`Router::after`] wrap the declared stages of every route registered
/// *afterwards*; they are not applied retroactively.
#[derive(Default)]
pub struct Router {
    introspection: bool,
    default_timeout: Option<Duration>,
    middleware: Vec<Stage>,
    afterware: Vec<Stage>,
    routes: IndexMap<String, Route>,
}

impl Router {
    /// Creates an empty registry with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given options.
    #[must_use]
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            introspection: options.introspection,
            default_timeout: options.timeout,
            ..Self::default()
        }
    }

    /// Appends a default middleware, applied to every route registered after
    /// this call.
    pub fn before(&mut self, middleware: impl Middleware) {
        self.middleware.push(Stage::middleware(middleware));
    }

    /// Appends a default afterware, applied to every route registered after
    /// this call.
    pub fn after(&mut self, afterware: impl Afterware) {
        self.afterware.push(Stage::afterware(afterware));
    }

    /// Registers a new route.
    ///
    /// The declared stages must contain exactly one [`Stage::Handler`]. The
    /// route's full chain is the registry's current default middleware,
    /// followed by the declared stages, followed by the current default
    /// afterware, fixed at this point.
    pub fn route(
        &mut self,
        name: &str,
        stages: impl IntoIterator<Item = Stage>,
    ) -> Result<(), ConfigError> {
        self.route_with_config(name, stages, RouteConfig::default())
    }

    /// Registers a new route with metadata.
    ///
    /// Fails without registering anything if the name, stages, or config are
    /// invalid.
    pub fn route_with_config(
        &mut self,
        name: &str,
        stages: impl IntoIterator<Item = Stage>,
        config: RouteConfig,
    ) -> Result<(), ConfigError> {
        validate_route_name(name)?;
        if self.routes.contains_key(name) {
            return Err(ConfigError::RouteExists(name.to_owned()));
        }
        config.check()?;

        let declared: Vec<Stage> = stages.into_iter().collect();
        match declared.iter().filter(|stage| stage.is_handler()).count() {
            0 => return Err(ConfigError::MissingHandler),
            1 => {}
            _ => return Err(ConfigError::MultipleHandlers),
        }

        let mut chain =
            Vec::with_capacity(self.middleware.len() + declared.len() + self.afterware.len());
        chain.extend(self.middleware.iter().cloned());
        chain.extend(declared);
        chain.extend(self.afterware.iter().cloned());

        let route = Route {
            stages: chain,
            description: config.description,
            schema: config.schema,
            visible: config.visible.unwrap_or(self.introspection),
            validate: config.validate.unwrap_or(false),
            timeout: config.timeout.or(self.default_timeout),
        };

        debug!(
            route = name,
            stages = route.stages.len(),
            timeout_ms = route.timeout.map(|t| t.as_millis() as u64),
            "route registered"
        );
        self.routes.insert(name.to_owned(), route);
        Ok(())
    }

    /// Updates an existing route's metadata.
    ///
    /// The update is atomic: the config is validated in full before any field
    /// is applied.
    pub fn describe(&mut self, name: &str, config: RouteConfig) -> Result<(), ConfigError> {
        config.check()?;
        let route = self
            .routes
            .get_mut(name)
            .ok_or_else(|| ConfigError::RouteDoesNotExist(name.to_owned()))?;

        if let Some(description) = config.description {
            route.description = Some(description);
        }
        if let Some(schema) = config.schema {
            route.schema = Some(schema);
        }
        if let Some(visible) = config.visible {
            route.visible = visible;
        }
        if let Some(validate) = config.validate {
            route.validate = validate;
        }
        if let Some(timeout) = config.timeout {
            route.timeout = Some(timeout);
        }
        Ok(())
    }

    /// Unions another registry's routes into this one, chains verbatim.
    ///
    /// Fails without modifying anything on a name collision or when the
    /// source registry has no routes.
    pub fn merge(&mut self, other: Self) -> Result<(), ConfigError> {
        if other.routes.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        if let Some(name) = other
            .routes
            .keys()
            .find(|name| self.routes.contains_key(*name))
        {
            return Err(ConfigError::DuplicateRoute(name.clone()));
        }
        for (name, route) in other.routes {
            debug!(route = %name, "route merged");
            self.routes.insert(name, route);
        }
        Ok(())
    }

    /// Unions another registry's routes under `prefix + "/"`.
    ///
    /// The prefix must itself be a valid route name. Fails without modifying
    /// anything on a collision or when the source registry has no routes.
    pub fn namespace(&mut self, prefix: &str, other: Self) -> Result<(), ConfigError> {
        validate_route_name(prefix)?;
        if other.routes.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        if let Some(name) = other
            .routes
            .keys()
            .find(|name| self.routes.contains_key(&format!("{prefix}/{name}")))
        {
            return Err(ConfigError::DuplicateRoute(format!("{prefix}/{name}")));
        }
        for (name, route) in other.routes {
            let namespaced = format!("{prefix}/{name}");
            debug!(route = %namespaced, "route namespaced");
            self.routes.insert(namespaced, route);
        }
        Ok(())
    }

    /// Looks up a route by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Returns the registered route names in registration order.
    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Returns the registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("default_middleware", &self.middleware.len())
            .field("default_afterware", &self.afterware.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::BoxFuture;
    use blest_core::{BlestError, BlestResult, Context, Object};
    use serde_json::json;

    fn ping<'a>(_params: &'a Object, _ctx: &'a mut Context) -> BoxFuture<'a, BlestResult<Value>> {
        Box::pin(async { Ok(json!({ "pong": true })) })
    }

    fn tag<'a>(_params: &'a Object, ctx: &'a mut Context) -> BoxFuture<'a, BlestResult<()>> {
        Box::pin(async move {
            ctx.set("tagged", json!(true));
            Ok(())
        })
    }

    fn observe<'a>(
        _params: &'a Object,
        _ctx: &'a mut Context,
        _error: Option<&'a BlestError>,
    ) -> BoxFuture<'a, BlestResult<()>> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn test_registers_route_with_handler() {
        let mut router = Router::new();
        router
            .route("ping", [Stage::handler(ping)])
            .expect("route should register");
        assert_eq!(router.resolve("ping").map(|r| r.stages().len()), Some(1));
    }

    #[test]
    fn test_rejects_duplicate_route() {
        let mut router = Router::new();
        router.route("ping", [Stage::handler(ping)]).unwrap();
        assert_eq!(
            router.route("ping", [Stage::handler(ping)]),
            Err(ConfigError::RouteExists("ping".to_owned()))
        );
    }

    #[test]
    fn test_rejects_invalid_name() {
        let mut router = Router::new();
        let err = router
            .route("-ping", [Stage::handler(ping)])
            .expect_err("name should be rejected");
        assert_eq!(err.to_string(), "Route should start with a letter");
    }

    #[test]
    fn test_requires_exactly_one_handler() {
        let mut router = Router::new();
        assert_eq!(
            router.route("ping", [Stage::middleware(tag)]),
            Err(ConfigError::MissingHandler)
        );
        assert_eq!(
            router.route("ping", []),
            Err(ConfigError::MissingHandler)
        );
        assert_eq!(
            router.route("ping", [Stage::handler(ping), Stage::handler(ping)]),
            Err(ConfigError::MultipleHandlers)
        );
    }

    #[test]
    fn test_defaults_are_not_retroactive() {
        let mut router = Router::new();
        router.route("early", [Stage::handler(ping)]).unwrap();
        router.before(tag);
        router.after(observe);
        router.route("late", [Stage::handler(ping)]).unwrap();

        assert_eq!(router.resolve("early").unwrap().stages().len(), 1);
        // default middleware + handler + default afterware
        assert_eq!(router.resolve("late").unwrap().stages().len(), 3);
    }

    #[test]
    fn test_default_timeout_inheritance() {
        let mut router = Router::with_options(RouterOptions {
            introspection: false,
            timeout: Some(Duration::from_millis(250)),
        });
        router.route("inherits", [Stage::handler(ping)]).unwrap();
        router
            .route_with_config(
                "overrides",
                [Stage::handler(ping)],
                RouteConfig {
                    timeout: Some(Duration::from_millis(50)),
                    ..RouteConfig::default()
                },
            )
            .unwrap();

        assert_eq!(
            router.resolve("inherits").unwrap().timeout(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(
            router.resolve("overrides").unwrap().timeout(),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_describe_updates_metadata() {
        let mut router = Router::new();
        router.route("ping", [Stage::handler(ping)]).unwrap();
        router
            .describe(
                "ping",
                RouteConfig {
                    description: Some("liveness check".to_owned()),
                    visible: Some(true),
                    timeout: Some(Duration::from_millis(100)),
                    ..RouteConfig::default()
                },
            )
            .expect("describe should succeed");

        let route = router.resolve("ping").unwrap();
        assert_eq!(route.description(), Some("liveness check"));
        assert!(route.visible());
        assert_eq!(route.timeout(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_describe_unknown_route() {
        let mut router = Router::new();
        assert_eq!(
            router.describe("missing", RouteConfig::default()),
            Err(ConfigError::RouteDoesNotExist("missing".to_owned()))
        );
    }

    #[test]
    fn test_describe_rejects_zero_timeout_atomically() {
        let mut router = Router::new();
        router.route("ping", [Stage::handler(ping)]).unwrap();
        let err = router.describe(
            "ping",
            RouteConfig {
                description: Some("should not stick".to_owned()),
                timeout: Some(Duration::ZERO),
                ..RouteConfig::default()
            },
        );
        assert_eq!(err, Err(ConfigError::InvalidTimeout));
        assert_eq!(router.resolve("ping").unwrap().description(), None);
    }

    #[test]
    fn test_merge_unions_routes() {
        let mut target = Router::new();
        target.route("ping", [Stage::handler(ping)]).unwrap();

        let mut source = Router::new();
        source.route("echo", [Stage::handler(ping)]).unwrap();

        target.merge(source).expect("merge should succeed");
        assert!(target.resolve("ping").is_some());
        assert!(target.resolve("echo").is_some());
    }

    #[test]
    fn test_merge_rejects_empty_and_duplicate() {
        let mut target = Router::new();
        target.route("ping", [Stage::handler(ping)]).unwrap();

        assert_eq!(target.merge(Router::new()), Err(ConfigError::EmptyRegistry));

        let mut source = Router::new();
        source.route("ping", [Stage::handler(ping)]).unwrap();
        assert_eq!(
            target.merge(source),
            Err(ConfigError::DuplicateRoute("ping".to_owned()))
        );
    }

    #[test]
    fn test_namespace_prefixes_routes() {
        let mut target = Router::new();
        let mut source = Router::new();
        source.route("ping", [Stage::handler(ping)]).unwrap();

        target
            .namespace("v1", source)
            .expect("namespace should succeed");
        assert!(target.resolve("v1/ping").is_some());
        assert!(target.resolve("ping").is_none());
    }

    #[test]
    fn test_namespace_validates_prefix() {
        let mut target = Router::new();
        let mut source = Router::new();
        source.route("ping", [Stage::handler(ping)]).unwrap();

        let err = target
            .namespace("-v1", source)
            .expect_err("prefix should be rejected");
        assert_eq!(err.to_string(), "Route should start with a letter");
    }

    #[test]
    fn test_namespace_rejects_collision() {
        let mut target = Router::new();
        target.route("v1/ping", [Stage::handler(ping)]).unwrap();

        let mut source = Router::new();
        source.route("ping", [Stage::handler(ping)]).unwrap();
        assert_eq!(
            target.namespace("v1", source),
            Err(ConfigError::DuplicateRoute("v1/ping".to_owned()))
        );
    }
}
