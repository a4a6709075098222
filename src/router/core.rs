//! Router core module - request hot path.
//!
//! [`Router`] owns a fully built [`RouteTree`] and adds what the serving side
//! needs around a lookup: structured logs per request, match timing and a
//! slow-match warning.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::tree::{MatchResult, RouteTree};
use crate::endpoint::{ControllerEndpoint, Endpoint};

/// Lookups slower than this are logged at `warn`
pub const DEFAULT_SLOW_MATCH: Duration = Duration::from_millis(1);

/// Read-only router serving lookups from a built tree
///
/// A `Router` is never mutated after construction. To change the routing table,
/// build a new tree and swap the router (see [`crate::hot_reload`]).
pub struct Router<E = ControllerEndpoint> {
    tree: RouteTree<E>,
    slow_match: Duration,
}

impl<E: Endpoint> Router<E> {
    /// Wrap a built tree
    ///
    /// Logs the size of the routing table and the first few patterns.
    #[must_use]
    pub fn new(tree: RouteTree<E>) -> Self {
        let routes_summary: Vec<&str> = tree.patterns().into_iter().take(10).collect();
        info!(
            routes_count = tree.len(),
            selector = tree.selector(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        for validator in tree.missing_validators() {
            warn!(
                validator = validator,
                "Routes reference an unregistered validator and will not match"
            );
        }
        Self {
            tree,
            slow_match: DEFAULT_SLOW_MATCH,
        }
    }

    /// Threshold above which a lookup is reported as slow
    #[must_use]
    pub fn with_slow_match(mut self, threshold: Duration) -> Self {
        self.slow_match = threshold;
        self
    }

    pub fn tree(&self) -> &RouteTree<E> {
        &self.tree
    }

    pub fn slow_match(&self) -> Duration {
        self.slow_match
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Resolve a request
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use http::Method;
    ///
    /// match router.route(&Method::GET, "/blog/42") {
    ///     MatchResult::Matched(m) => println!("{} {:?}", m.endpoint.name(), m.param("id")),
    ///     MatchResult::NotFound => println!("404"),
    ///     MatchResult::MalformedPath(err) => println!("400: {err}"),
    /// }
    /// ```
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> MatchResult<E> {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();
        let result = self.tree.lookup(method, path);
        let match_duration = match_start.elapsed();

        match &result {
            MatchResult::Matched(m) => {
                if match_duration > self.slow_match {
                    warn!(
                        method = %method,
                        path = %path,
                        endpoint = m.endpoint.name(),
                        route_pattern = %m.pattern,
                        params = ?m.params,
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        method = %method,
                        path = %path,
                        endpoint = m.endpoint.name(),
                        route_pattern = %m.pattern,
                        params = ?m.params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
            }
            MatchResult::NotFound => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
            }
            MatchResult::MalformedPath(err) => {
                warn!(
                    method = %method,
                    path = %path,
                    error = %err,
                    "Malformed request path"
                );
            }
        }

        result
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.tree.len());
        for (pattern, endpoint) in self.tree.routes() {
            println!("[route] {pattern} -> {}", endpoint.name());
        }
    }

    /// All registered patterns, in registration order
    #[must_use]
    pub fn get_all_path_patterns(&self) -> Vec<String> {
        self.tree.patterns().into_iter().map(str::to_owned).collect()
    }
}

impl<E: Endpoint> From<RouteTree<E>> for Router<E> {
    fn from(tree: RouteTree<E>) -> Self {
        Self::new(tree)
    }
}

impl<E: Endpoint> std::fmt::Debug for Router<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("tree", &self.tree)
            .field("slow_match", &self.slow_match)
            .finish()
    }
}
