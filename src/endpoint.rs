//! # Endpoint Descriptors
//!
//! The router resolves a request to an endpoint but never invokes it. An endpoint
//! only has to answer one question for the router: "do you expose selector `X`
//! for HTTP method `Y`?". In an MVC application the selector is the controller
//! action, so [`ControllerEndpoint`] maps action names to the methods each action
//! accepts.
//!
//! The check is used when a route falls back to a default value for the selector
//! parameter (e.g. `/blog/<action=list>` served for `/blog`): the fallback is only
//! taken when the endpoint actually exposes that action.

use http::Method;
use std::collections::HashMap;
use std::fmt::Debug;

/// Something a route can resolve to
pub trait Endpoint: Send + Sync + Debug {
    /// Identity of the endpoint, used in logs and diagnostics
    fn name(&self) -> &str;

    /// Whether `selector` (usually an action name) is available for `method`
    fn supports(&self, method: &Method, selector: &str) -> bool;
}

/// A controller and the actions it exposes
///
/// An action with an empty method list accepts every method. `HEAD` is accepted
/// wherever `GET` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerEndpoint {
    controller: String,
    actions: HashMap<String, Vec<Method>>,
}

impl ControllerEndpoint {
    /// Create a controller with no actions
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            actions: HashMap::new(),
        }
    }

    /// Add an action restricted to `methods` (empty = all methods)
    #[must_use]
    pub fn with_action<I>(mut self, action: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.add_action(action, methods);
        self
    }

    /// Add or replace an action
    pub fn add_action<I>(&mut self, action: impl Into<String>, methods: I)
    where
        I: IntoIterator<Item = Method>,
    {
        self.actions
            .insert(action.into(), methods.into_iter().collect());
    }

    /// Controller name
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Action names, sorted for stable output
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Methods accepted by `action`, if it exists
    pub fn methods(&self, action: &str) -> Option<&[Method]> {
        self.actions.get(action).map(Vec::as_slice)
    }
}

impl Endpoint for ControllerEndpoint {
    fn name(&self) -> &str {
        &self.controller
    }

    fn supports(&self, method: &Method, selector: &str) -> bool {
        match self.actions.get(selector) {
            Some(methods) if methods.is_empty() => true,
            Some(methods) => {
                methods.contains(method)
                    || (*method == Method::HEAD && methods.contains(&Method::GET))
            }
            None => false,
        }
    }
}
