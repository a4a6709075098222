//! # routetree
//!
//! **routetree** is a request-routing engine for MVC-style web frameworks. Given an
//! HTTP method and a URL path it finds the registered endpoint (controller plus
//! action) and extracts the parameters embedded in the path.
//!
//! ## Overview
//!
//! Routes are written in a small pattern grammar:
//!
//! ```text
//! /blog/<action=list>                 optional action, defaults to "list"
//! /blog/<id:int>/edit-<format:word>   validated placeholders, mixed with text
//! /post/<year:int(4)>-<month:int(2)>  exact lengths
//! /files/*pathInfo                    catch-all for the rest of the path
//! ```
//!
//! Patterns are merged into a tree with one node per segment. Lookup walks the
//! tree depth-first in registration order, validates placeholders with a
//! pluggable validator registry, and can fall back to default values when a
//! path stops short of an optional segment.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern grammar, validators, route tree and matcher, and the
//!   logging [`Router`] facade used on the request path
//! - **[`endpoint`]** - The [`Endpoint`] capability trait and [`ControllerEndpoint`]
//! - **[`error`]** - Registration and request-path errors
//! - **[`table`]** - Route tables in YAML, TOML or JSON
//! - **[`hot_reload`]** - Rebuild and atomically swap the router when a table changes
//! - **[`runtime_config`]** - Environment-driven knobs
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `routetree` command-line tool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routetree::{ControllerEndpoint, MatchResult, RouteTree, Router};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let blog = Arc::new(
//!     ControllerEndpoint::new("blog")
//!         .with_action("list", [Method::GET])
//!         .with_action("edit", [Method::GET, Method::POST]),
//! );
//!
//! let mut tree = RouteTree::new();
//! tree.add_route("/blog/<action=list>", blog.clone())?;
//! tree.add_route("/post/<id:int>/<action>", blog)?;
//! let router = Router::new(tree);
//!
//! if let MatchResult::Matched(m) = router.route(&Method::POST, "/post/42/edit") {
//!     assert_eq!(m.param("id"), Some("42"));
//!     assert!(m.is_dispatchable(&Method::POST));
//! }
//! ```
//!
//! ## Concurrency
//!
//! A tree is built single-threaded and never mutated once it serves requests.
//! `lookup` takes `&self` and keeps its state on the stack, so a tree can be
//! shared across any number of threads. Changing routes at runtime means
//! building a new tree and swapping it in (see [`hot_reload`]).

pub mod cli;
pub mod endpoint;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod table;

pub use endpoint::{ControllerEndpoint, Endpoint};
pub use error::{PathError, RouteError};
pub use router::{MatchResult, RouteMatch, RouteOption, RouteTree, Router, ValidatorRegistry};
pub use table::{load_router, RouteTable};
