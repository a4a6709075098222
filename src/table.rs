//! # Route Tables
//!
//! A route table describes controllers, their actions and the patterns that
//! reach them. Tables are written in YAML, TOML or JSON; the format is picked
//! from the file extension.
//!
//! ```yaml
//! selector: action
//! validators:
//!   slug: "[a-z0-9-]+"
//! controllers:
//!   blog:
//!     actions:
//!       list: [GET]
//!       edit: [GET, POST]
//!       any_method: []
//! routes:
//!   - pattern: /blog/<action=list>
//!     controller: blog
//!   - pattern: /post/<id:int>/<title:slug>
//!     controller: blog
//! ```
//!
//! Building is all-or-nothing: the first bad route fails the whole table and no
//! tree is returned.

use anyhow::{bail, Context};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::endpoint::ControllerEndpoint;
use crate::router::{RouteTree, Router};
use crate::runtime_config::RuntimeConfig;

/// Methods accepted in action definitions
pub const SUPPORTED_METHODS: [Method; 8] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
    Method::TRACE,
];

/// On-disk encoding of a route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Toml,
    Json,
}

impl TableFormat {
    /// Pick the format from a file extension; anything unknown is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => TableFormat::Yaml,
            Some("toml") => TableFormat::Toml,
            _ => TableFormat::Json,
        }
    }
}

/// Route table as read from disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteTable {
    /// Selector parameter name, `action` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Extra validators as name -> regular expression
    #[serde(default)]
    pub validators: BTreeMap<String, String>,
    /// Controllers by name
    #[serde(default)]
    pub controllers: HashMap<String, ControllerDef>,
    /// Routes, in registration order
    #[serde(default)]
    pub routes: Vec<RouteDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerDef {
    /// Action name -> accepted methods (empty = any method)
    #[serde(default)]
    pub actions: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDef {
    pub pattern: String,
    pub controller: String,
}

/// Parse a method name from a table, case-insensitively
pub fn parse_method(name: &str) -> anyhow::Result<Method> {
    let upper = name.to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|method| method.as_str() == upper)
        .cloned()
        .with_context(|| format!("Unsupported HTTP method '{name}'"))
}

impl RouteTable {
    /// Read a table, choosing the decoder from the file extension
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table: {}", path.display()))?;
        Self::parse(&content, TableFormat::from_path(path))
            .with_context(|| format!("Failed to parse route table: {}", path.display()))
    }

    /// Decode a table from text
    pub fn parse(content: &str, format: TableFormat) -> anyhow::Result<Self> {
        let table: Self = match format {
            TableFormat::Yaml => serde_yaml::from_str(content)?,
            TableFormat::Toml => toml::from_str(content)?,
            TableFormat::Json => serde_json::from_str(content)?,
        };
        Ok(table)
    }

    /// Build one shared endpoint per controller
    pub fn endpoints(&self) -> anyhow::Result<HashMap<String, Arc<ControllerEndpoint>>> {
        let mut endpoints = HashMap::with_capacity(self.controllers.len());
        for (name, def) in &self.controllers {
            let mut endpoint = ControllerEndpoint::new(name.as_str());
            for (action, methods) in &def.actions {
                let methods = methods
                    .iter()
                    .map(|m| parse_method(m))
                    .collect::<anyhow::Result<Vec<_>>>()
                    .with_context(|| format!("Controller '{name}', action '{action}'"))?;
                endpoint.add_action(action.as_str(), methods);
            }
            endpoints.insert(name.clone(), Arc::new(endpoint));
        }
        Ok(endpoints)
    }

    /// Build a route tree
    ///
    /// `selector` overrides the table's own selector setting.
    pub fn build_tree(
        &self,
        selector: Option<&str>,
    ) -> anyhow::Result<RouteTree<ControllerEndpoint>> {
        let selector = selector
            .or(self.selector.as_deref())
            .unwrap_or(crate::router::DEFAULT_SELECTOR);
        let mut tree = RouteTree::new().with_selector(selector);

        for (name, pattern) in &self.validators {
            tree.validators_mut()
                .register_regex(name.as_str(), pattern)
                .with_context(|| format!("Invalid pattern for validator '{name}'"))?;
        }

        let endpoints = self.endpoints()?;
        for (index, route) in self.routes.iter().enumerate() {
            let Some(endpoint) = endpoints.get(&route.controller) else {
                bail!(
                    "Route #{index} '{}': unknown controller '{}'",
                    route.pattern,
                    route.controller
                );
            };
            tree.add_route(&route.pattern, Arc::clone(endpoint))
                .with_context(|| format!("Route #{index} -> {}", route.controller))?;
        }
        Ok(tree)
    }
}

/// Load a table file and wrap the resulting tree in a [`Router`]
pub fn load_router(path: &Path, config: &RuntimeConfig) -> anyhow::Result<Router> {
    let table = RouteTable::from_path(path)?;
    let tree = table
        .build_tree(config.selector.as_deref())
        .with_context(|| format!("Failed to build routes from {}", path.display()))?;

    info!(
        path = %path.display(),
        controllers = table.controllers.len(),
        routes = tree.len(),
        validators = table.validators.len(),
        "Route table loaded"
    );
    Ok(Router::new(tree).with_slow_match(config.slow_match))
}
