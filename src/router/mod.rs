//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns such as `/blog/<id:int>/edit-<format=html>`
//! - Merging registered patterns into a route tree
//! - Matching request paths against the tree, validating and extracting parameters
//! - Falling back to default values and catch-alls
//!
//! ## Architecture
//!
//! Routing has two phases:
//!
//! 1. **Build**: patterns are parsed ([`pattern`]), turned into node chains and
//!    merged into a [`RouteTree`] ([`node`]). Duplicate and conflicting
//!    registrations are rejected here. Custom [`validators`] are registered
//!    before the first request.
//!
//! 2. **Matching**: [`RouteTree::lookup`] walks the tree depth-first, pruning
//!    branches too shallow for the request. The tree is read-only from then on
//!    and can be shared between threads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use routetree::{ControllerEndpoint, RouteTree, Router};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let blog = Arc::new(
//!     ControllerEndpoint::new("blog")
//!         .with_action("list", [Method::GET])
//!         .with_action("show", [Method::GET]),
//! );
//!
//! let mut tree = RouteTree::new();
//! tree.add_route("/blog/<action=list>", blog.clone())?;
//! tree.add_route("/post/<id:int>", blog)?;
//!
//! let router = Router::new(tree);
//! let m = router.route(&Method::GET, "/blog").into_match().unwrap();
//! assert_eq!(m.selector(), Some("list"));
//! ```

mod core;
pub mod node;
pub mod pattern;
pub mod tree;
pub mod validators;
#[cfg(test)]
mod tests;

pub use core::{Router, DEFAULT_SLOW_MATCH};
pub use node::{NodeKind, RouteNode};
pub use pattern::{parse_pattern, split_path, RouteOption, CATCH_ALL_PARAM};
pub use tree::{MatchResult, RouteMatch, RouteTree, DEFAULT_SELECTOR};
pub use validators::{Validator, ValidatorRegistry};
