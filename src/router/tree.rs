//! Route tree and matcher
//!
//! Lookup walks the tree depth-first, one URL segment per level:
//!
//! 1. A branch is skipped when `depth + max_depth` cannot reach the number of
//!    URL segments. Branches holding a catch-all are never skipped.
//! 2. Static nodes compare the whole segment; placeholder nodes run the segment
//!    through their validators; a catch-all takes every remaining segment.
//! 3. At the last segment a node matches if it owns an endpoint. Otherwise a
//!    chain of single optional children (`/blog/<action=list>`) may supply their
//!    default values instead of URL segments.
//!
//! Children are tried in registration order and the first match wins.
//!
//! The tree is built once and only read afterwards; `lookup` takes `&self` and
//! keeps all per-request state on the stack, so one tree can serve any number of
//! threads.

use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::node::{Captures, NodeKind, RouteNode, SegmentMatch, Terminal};
use super::pattern::{parse_pattern, split_path, RouteOption, CATCH_ALL_PARAM};
use super::validators::ValidatorRegistry;
use crate::endpoint::Endpoint;
use crate::error::{PathError, RouteError};

/// Parameter used for capability checks when none is configured
pub const DEFAULT_SELECTOR: &str = "action";

/// Successful lookup
#[derive(Debug)]
pub struct RouteMatch<E> {
    /// Endpoint the request resolved to
    pub endpoint: Arc<E>,
    /// Placeholder values by name, including `pathInfo` for catch-alls and
    /// any default values that were applied
    pub params: HashMap<String, String>,
    /// Pattern the endpoint was registered under
    pub pattern: Arc<str>,
    selector: Option<String>,
}

impl<E> Clone for RouteMatch<E> {
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
            params: self.params.clone(),
            pattern: Arc::clone(&self.pattern),
            selector: self.selector.clone(),
        }
    }
}

impl<E> RouteMatch<E> {
    /// Get a parameter by name
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Text captured by a catch-all
    #[must_use]
    pub fn path_info(&self) -> Option<&str> {
        self.param(CATCH_ALL_PARAM)
    }

    /// Value bound to the selector parameter (usually the action name)
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }
}

impl<E: Endpoint> RouteMatch<E> {
    /// Whether the endpoint exposes the bound selector for `method`
    ///
    /// Routes without a selector parameter are always dispatchable.
    #[must_use]
    pub fn is_dispatchable(&self, method: &Method) -> bool {
        self.selector
            .as_deref()
            .map_or(true, |selector| self.endpoint.supports(method, selector))
    }
}

/// Outcome of [`RouteTree::lookup`]
#[derive(Debug)]
pub enum MatchResult<E> {
    /// The path resolved to an endpoint
    Matched(RouteMatch<E>),
    /// No registered route accepts the path
    NotFound,
    /// The path could not be split (it contains `..`)
    MalformedPath(PathError),
}

impl<E> MatchResult<E> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn as_match(&self) -> Option<&RouteMatch<E>> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_match(self) -> Option<RouteMatch<E>> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }
}

/// Route tree: the merged node graph plus the validators it matches with
pub struct RouteTree<E> {
    root: RouteNode<E>,
    validators: ValidatorRegistry,
    selector: String,
    routes: Vec<Terminal<E>>,
}

impl<E: Endpoint> RouteTree<E> {
    /// Empty tree with the built-in validators
    pub fn new() -> Self {
        Self::with_validators(ValidatorRegistry::new())
    }

    /// Empty tree with a prepared validator registry
    pub fn with_validators(validators: ValidatorRegistry) -> Self {
        Self {
            root: RouteNode::root(),
            validators,
            selector: DEFAULT_SELECTOR.to_string(),
            routes: Vec::new(),
        }
    }

    /// Use `name` as the selector parameter for default-value capability checks
    #[must_use]
    pub fn with_selector(mut self, name: impl Into<String>) -> Self {
        self.selector = name.into();
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Mutable access to the registry while the tree is being built
    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.validators
    }

    /// Register a custom validator
    pub fn register_validator<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: for<'a> Fn(&'a str, &RouteOption) -> &'a str + Send + Sync + 'static,
    {
        self.validators.register(name, validator);
    }

    pub fn root(&self) -> &RouteNode<E> {
        &self.root
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered patterns and their endpoints, in registration order
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Arc<E>)> + '_ {
        self.routes
            .iter()
            .map(|(pattern, endpoint)| (pattern.as_ref(), endpoint))
    }

    /// Registered patterns, in registration order
    pub fn patterns(&self) -> Vec<&str> {
        self.routes.iter().map(|(pattern, _)| pattern.as_ref()).collect()
    }

    /// Validator names referenced by routes but absent from the registry, sorted
    ///
    /// Branches using them never match until the validator is registered.
    pub fn missing_validators(&self) -> Vec<&str> {
        let mut missing = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            for option in node.params().values() {
                if !self.validators.contains(&option.validator) {
                    missing.push(option.validator.as_str());
                }
            }
            stack.extend(node.children());
        }
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Register `pattern` for `endpoint`
    ///
    /// Grammar errors, catch-all conflicts and duplicate registrations are
    /// reported without modifying the tree.
    pub fn add_route(&mut self, pattern: &str, endpoint: Arc<E>) -> Result<(), RouteError> {
        let segments = parse_pattern(pattern)?;
        let registered: Arc<str> = Arc::from(pattern);

        match RouteNode::chain(&registered, segments, Arc::clone(&endpoint)) {
            None => {
                if self.root.endpoint().is_some() {
                    return Err(RouteError::DuplicateRoute {
                        pattern: pattern.to_string(),
                    });
                }
                self.root
                    .set_endpoint(Arc::clone(&registered), Arc::clone(&endpoint));
            }
            Some(chain) => {
                self.root.check_insert(&chain, pattern)?;
                self.root.insert(chain);
            }
        }

        debug!(
            pattern = %registered,
            endpoint = endpoint.name(),
            "Route registered"
        );
        self.routes.push((registered, endpoint));
        Ok(())
    }

    /// Resolve `path` for `method`
    ///
    /// `method` only matters when a default value is applied for the selector
    /// parameter: the endpoint must then expose that selector for the method.
    pub fn lookup(&self, method: &Method, path: &str) -> MatchResult<E> {
        let Some(parts) = split_path(path) else {
            return MatchResult::MalformedPath(PathError::ParentSegment {
                path: path.to_string(),
            });
        };

        let mut walk = Walk {
            method,
            parts: &parts,
            trailing_slash: path.ends_with('/'),
            validators: &self.validators,
            selector: &self.selector,
            captures: Captures::new(),
        };

        let hit = if parts.is_empty() {
            walk.terminal(&self.root)
        } else {
            self.root
                .children()
                .iter()
                .find_map(|child| walk.descend(child))
        };

        match hit {
            Some(hit) => MatchResult::Matched(walk.finish(hit)),
            None => MatchResult::NotFound,
        }
    }
}

impl<E: Endpoint> Default for RouteTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Endpoint> fmt::Debug for RouteTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTree")
            .field("routes", &self.routes.len())
            .field("selector", &self.selector)
            .field("validators", &self.validators)
            .finish()
    }
}

/// Indented dump of the node graph
impl<E: Endpoint> fmt::Display for RouteTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.root, 0)
    }
}

fn write_node<E: Endpoint>(
    f: &mut fmt::Formatter<'_>,
    node: &RouteNode<E>,
    indent: usize,
) -> fmt::Result {
    let label = match node.kind() {
        NodeKind::Root => "/",
        _ => node.raw_segment(),
    };
    write!(f, "{:width$}{label}", "", width = indent * 2)?;
    if let Some(endpoint) = node.endpoint() {
        write!(f, " -> {}", endpoint.name())?;
    }
    writeln!(f)?;
    for child in node.children() {
        write_node(f, child, indent + 1)?;
    }
    Ok(())
}

/// Node that accepted the request, with catch-all text if any
struct Hit<'a, E> {
    terminal: &'a Terminal<E>,
    path_info: Option<String>,
}

/// Per-lookup state
struct Walk<'a> {
    method: &'a Method,
    parts: &'a [&'a str],
    trailing_slash: bool,
    validators: &'a ValidatorRegistry,
    selector: &'a str,
    captures: Captures<'a>,
}

impl<'a> Walk<'a> {
    fn descend<E: Endpoint>(&mut self, node: &'a RouteNode<E>) -> Option<Hit<'a, E>> {
        let depth = usize::from(node.depth());
        let len = self.parts.len();
        if !node.reaches(len) {
            return None;
        }

        let segment = self.parts[depth - 1];
        let mark = self.captures.len();
        match node.kind() {
            NodeKind::CatchAll => return self.catch_all(node, depth - 1),
            NodeKind::Static => {
                if node.raw_segment() != segment {
                    return None;
                }
            }
            NodeKind::Param => {
                match node.match_tokens(segment, self.validators, &mut self.captures) {
                    SegmentMatch::Matched => {}
                    SegmentMatch::Mismatch => {
                        self.captures.truncate(mark);
                        return None;
                    }
                    SegmentMatch::UnknownValidator(validator) => {
                        debug!(
                            validator = %validator,
                            segment = node.raw_segment(),
                            "Unknown validator, skipping branch"
                        );
                        self.captures.truncate(mark);
                        return None;
                    }
                }
            }
            NodeKind::Root => return None,
        }

        let hit = if depth == len {
            self.terminal(node)
        } else {
            node.children()
                .iter()
                .find_map(|child| self.descend(child))
        };
        if hit.is_none() {
            self.captures.truncate(mark);
        }
        hit
    }

    /// All URL segments are consumed at `node`
    fn terminal<E: Endpoint>(&mut self, node: &'a RouteNode<E>) -> Option<Hit<'a, E>> {
        if let Some(terminal) = node.terminal() {
            return Some(Hit {
                terminal,
                path_info: None,
            });
        }
        // a catch-all also accepts zero remaining segments
        if let Some(catch_all) = node
            .children()
            .iter()
            .find(|child| child.kind() == NodeKind::CatchAll)
        {
            return self.catch_all(catch_all, self.parts.len());
        }
        self.detect_default(node)
    }

    fn catch_all<E>(&self, node: &'a RouteNode<E>, start: usize) -> Option<Hit<'a, E>> {
        let terminal = node.terminal()?;
        let mut rest = self.parts.get(start..).unwrap_or_default().join("/");
        if self.trailing_slash && !rest.is_empty() {
            rest.push('/');
        }
        Some(Hit {
            terminal,
            path_info: Some(rest),
        })
    }

    /// Follow single optional children, binding their default values
    fn detect_default<E: Endpoint>(&mut self, node: &'a RouteNode<E>) -> Option<Hit<'a, E>> {
        let mark = self.captures.len();
        let mut current = node;

        while let [child] = current.children() {
            let Some((name, option)) = child.default_param() else {
                break;
            };
            let Some(value) = option.default_value() else {
                break;
            };
            self.captures.push((name, value));

            if let Some(terminal) = child.terminal() {
                if self.selectors_supported(&*terminal.1, mark) {
                    return Some(Hit {
                        terminal,
                        path_info: None,
                    });
                }
                debug!(
                    endpoint = terminal.1.name(),
                    pattern = %terminal.0,
                    method = %self.method,
                    "Default selector not exposed by endpoint"
                );
                break;
            }
            current = child;
        }

        self.captures.truncate(mark);
        None
    }

    /// Synthesized selector values must be exposed by the endpoint
    fn selectors_supported<E: Endpoint>(&self, endpoint: &E, mark: usize) -> bool {
        self.captures[mark..]
            .iter()
            .filter(|(name, _)| *name == self.selector)
            .all(|(_, value)| endpoint.supports(self.method, value))
    }

    fn finish<E>(self, hit: Hit<'a, E>) -> RouteMatch<E> {
        let mut params: HashMap<String, String> = self
            .captures
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        if let Some(path_info) = hit.path_info {
            params.insert(CATCH_ALL_PARAM.to_string(), path_info);
        }
        let selector = params.get(self.selector).cloned();
        let (pattern, endpoint) = hit.terminal;

        RouteMatch {
            endpoint: Arc::clone(endpoint),
            params,
            pattern: Arc::clone(pattern),
            selector,
        }
    }
}
