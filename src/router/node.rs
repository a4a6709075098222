//! Route tree nodes
//!
//! Each node represents one path segment. A registered pattern becomes a linear
//! chain of nodes which is then merged into the tree:
//!
//! - nodes are matched against existing children by their raw segment text
//! - a new branch is appended after the existing children, so lookup tries
//!   siblings in registration order
//! - only the terminal node of a chain carries the endpoint
//!
//! `max_depth` is the height of the subtree rooted at a node, counting the node
//! itself. The matcher uses `depth + max_depth` to skip branches that cannot reach
//! the requested path length. A catch-all can absorb any number of segments, so
//! its height is [`UNBOUNDED_HEIGHT`] and every ancestor inherits it.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::{ParsedSegment, RouteOption, SegmentKind, SegmentToken};
use super::validators::ValidatorRegistry;
use crate::error::RouteError;

/// Kind of a route node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Tree root, depth 0
    Root,
    /// Plain text segment
    Static,
    /// Segment containing placeholders
    Param,
    /// `*pathInfo`
    CatchAll,
}

/// Height of a subtree containing a catch-all; never pruned
pub const UNBOUNDED_HEIGHT: u16 = u16::MAX;

/// Placeholder values kept inline before spilling to the heap
pub const MAX_INLINE_PARAMS: usize = 8;

/// `(name, value)` pairs captured while walking the tree
pub(crate) type Captures<'a> = SmallVec<[(&'a str, &'a str); MAX_INLINE_PARAMS]>;

/// Registered pattern and the endpoint it resolves to
pub type Terminal<E> = (Arc<str>, Arc<E>);

/// Outcome of matching a placeholder segment
pub(crate) enum SegmentMatch {
    Matched,
    Mismatch,
    /// A placeholder references a validator missing from the registry
    UnknownValidator(String),
}

/// One segment in the route tree
#[derive(Debug)]
pub struct RouteNode<E> {
    kind: NodeKind,
    depth: u16,
    max_depth: u16,
    raw_segment: String,
    tokens: Vec<SegmentToken>,
    params: HashMap<String, RouteOption>,
    terminal: Option<Terminal<E>>,
    children: Vec<RouteNode<E>>,
}

impl<E> RouteNode<E> {
    /// Create the tree root
    pub fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            depth: 0,
            max_depth: 1,
            raw_segment: String::new(),
            tokens: Vec::new(),
            params: HashMap::new(),
            terminal: None,
            children: Vec::new(),
        }
    }

    fn from_segment(segment: ParsedSegment, depth: u16) -> Self {
        let kind = match segment.kind {
            SegmentKind::Static => NodeKind::Static,
            SegmentKind::Param => NodeKind::Param,
            SegmentKind::CatchAll => NodeKind::CatchAll,
        };
        Self {
            kind,
            depth,
            max_depth: if kind == NodeKind::CatchAll { UNBOUNDED_HEIGHT } else { 1 },
            raw_segment: segment.raw,
            tokens: segment.tokens,
            params: segment.params.into_iter().collect(),
            terminal: None,
            children: Vec::new(),
        }
    }

    /// Build the linear chain for a parsed pattern
    ///
    /// `segments` must be non-empty; the root pattern is handled by the tree.
    pub(crate) fn chain(
        pattern: &Arc<str>,
        segments: Vec<ParsedSegment>,
        endpoint: Arc<E>,
    ) -> Option<Self> {
        let mut nodes = segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| {
                let depth = u16::try_from(i + 1).unwrap_or(u16::MAX);
                Self::from_segment(segment, depth)
            })
            .rev();

        let mut chain = nodes.next()?;
        chain.terminal = Some((Arc::clone(pattern), endpoint));

        for mut parent in nodes {
            parent.max_depth = chain.max_depth.saturating_add(1);
            parent.children.push(chain);
            chain = parent;
        }
        Some(chain)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// 1-based segment position, 0 for the root
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Height of the subtree rooted here, counting this node
    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }

    /// Whether a path of `len` segments can end in this subtree
    #[inline]
    pub fn reaches(&self, len: usize) -> bool {
        self.max_depth == UNBOUNDED_HEIGHT
            || usize::from(self.depth) + usize::from(self.max_depth) > len
    }

    /// Segment text as registered
    pub fn raw_segment(&self) -> &str {
        &self.raw_segment
    }

    /// Literal/placeholder tokens; empty for static segments
    pub fn tokens(&self) -> &[SegmentToken] {
        &self.tokens
    }

    pub fn params(&self) -> &HashMap<String, RouteOption> {
        &self.params
    }

    pub fn endpoint(&self) -> Option<&Arc<E>> {
        self.terminal.as_ref().map(|(_, endpoint)| endpoint)
    }

    /// Pattern that registered this node's endpoint
    pub fn pattern(&self) -> Option<&Arc<str>> {
        self.terminal.as_ref().map(|(pattern, _)| pattern)
    }

    pub(crate) fn terminal(&self) -> Option<&Terminal<E>> {
        self.terminal.as_ref()
    }

    pub fn children(&self) -> &[RouteNode<E>] {
        &self.children
    }

    pub(crate) fn set_endpoint(&mut self, pattern: Arc<str>, endpoint: Arc<E>) {
        self.terminal = Some((pattern, endpoint));
    }

    /// The single optional placeholder making up this whole segment, if any
    ///
    /// Matches segments like `<action=list>`; `page-<n=1>` does not qualify.
    pub fn default_param(&self) -> Option<(&str, &RouteOption)> {
        if self.kind != NodeKind::Param {
            return None;
        }
        let [SegmentToken::Param(name)] = self.tokens.as_slice() else {
            return None;
        };
        let option = self.params.get(name)?;
        option.has_default().then_some((name.as_str(), option))
    }

    /// Verify that `chain` can be merged below this node
    ///
    /// Runs before [`insert`](Self::insert) so that a rejected registration
    /// leaves the tree untouched.
    pub(crate) fn check_insert(
        &self,
        chain: &RouteNode<E>,
        pattern: &str,
    ) -> Result<(), RouteError> {
        let existing = self
            .children
            .iter()
            .find(|child| child.raw_segment == chain.raw_segment);

        match existing {
            Some(existing) => match chain.children.first() {
                Some(next) => {
                    if existing.kind == NodeKind::CatchAll {
                        return Err(RouteError::CatchAllNotLast {
                            pattern: pattern.to_string(),
                        });
                    }
                    existing.check_insert(next, pattern)
                }
                None if existing.terminal.is_some() => Err(RouteError::DuplicateRoute {
                    pattern: pattern.to_string(),
                }),
                None => Ok(()),
            },
            None => {
                let conflict = if chain.kind == NodeKind::CatchAll {
                    self.children.first()
                } else {
                    self.children
                        .iter()
                        .find(|child| child.kind == NodeKind::CatchAll)
                };
                match conflict {
                    Some(sibling) => Err(RouteError::CatchAllConflict {
                        pattern: pattern.to_string(),
                        existing: sibling.raw_segment.clone(),
                    }),
                    None => Ok(()),
                }
            }
        }
    }

    /// Merge a chain below this node; call [`check_insert`](Self::check_insert) first
    pub(crate) fn insert(&mut self, mut chain: RouteNode<E>) {
        let existing = self
            .children
            .iter()
            .position(|child| child.raw_segment == chain.raw_segment);

        let height = match existing {
            Some(idx) => {
                let child = &mut self.children[idx];
                match chain.children.pop() {
                    Some(next) => child.insert(next),
                    None => child.terminal = chain.terminal.take(),
                }
                child.max_depth
            }
            None => {
                let height = chain.max_depth;
                self.children.push(chain);
                height
            }
        };
        self.max_depth = self.max_depth.max(height.saturating_add(1));
    }

    /// Match a placeholder segment against one URL segment
    ///
    /// Walks the token stream and the URL text with independent cursors; both must
    /// be exhausted together. Captured values are pushed onto `captures` and left
    /// for the caller to roll back on failure.
    pub(crate) fn match_tokens<'a>(
        &'a self,
        segment: &'a str,
        validators: &ValidatorRegistry,
        captures: &mut Captures<'a>,
    ) -> SegmentMatch {
        let mut cursor = 0;
        for token in &self.tokens {
            let rest = &segment[cursor..];
            match token {
                SegmentToken::Literal(text) => {
                    if !rest.starts_with(text.as_str()) {
                        return SegmentMatch::Mismatch;
                    }
                    cursor += text.len();
                }
                SegmentToken::Param(name) => {
                    let Some(option) = self.params.get(name) else {
                        return SegmentMatch::Mismatch;
                    };
                    let Some(validator) = validators.get(&option.validator) else {
                        return SegmentMatch::UnknownValidator(option.validator.clone());
                    };
                    let matched = validator(rest, option).len();
                    // custom validators may return text that is not a prefix of `rest`
                    let Some(value) = rest.get(..matched).filter(|v| !v.is_empty()) else {
                        return SegmentMatch::Mismatch;
                    };
                    captures.push((name.as_str(), value));
                    cursor += matched;
                }
            }
        }
        if cursor == segment.len() {
            SegmentMatch::Matched
        } else {
            SegmentMatch::Mismatch
        }
    }
}
