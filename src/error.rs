use std::fmt;

/// Registration error
///
/// Returned by [`RouteTree::add_route`](crate::router::RouteTree::add_route) when a
/// pattern is malformed or conflicts with an existing registration. The tree is
/// left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A `..` segment appeared in the pattern
    ParentSegment {
        /// The rejected pattern
        pattern: String,
    },
    /// `>` without an opening `<`, or a `<` that is never closed
    UnbalancedDelimiter {
        /// The rejected pattern
        pattern: String,
    },
    /// A `<` appeared inside an open placeholder
    NestedPlaceholder {
        /// The rejected pattern
        pattern: String,
    },
    /// Placeholder name is empty or not an identifier
    InvalidParamName {
        /// The rejected pattern
        pattern: String,
        /// The offending name
        name: String,
    },
    /// Validator part of a placeholder could not be parsed
    InvalidValidator {
        /// The rejected pattern
        pattern: String,
        /// The offending validator text
        spec: String,
    },
    /// Numeric length bound outside `0..=255`
    InvalidSetting {
        /// The rejected pattern
        pattern: String,
        /// The offending setting text
        setting: String,
    },
    /// Same placeholder name used twice in one pattern
    DuplicateParam {
        /// The rejected pattern
        pattern: String,
        /// The repeated name
        name: String,
    },
    /// More than 255 placeholders in one pattern
    TooManyParams {
        /// The rejected pattern
        pattern: String,
    },
    /// `*` used anywhere other than the literal `*pathInfo` segment
    InvalidCatchAll {
        /// The rejected pattern
        pattern: String,
    },
    /// `*pathInfo` followed by further segments
    CatchAllNotLast {
        /// The rejected pattern
        pattern: String,
    },
    /// A catch-all would share its level with other segments
    CatchAllConflict {
        /// The rejected pattern
        pattern: String,
        /// Raw segment of the conflicting sibling
        existing: String,
    },
    /// The same fully-specified pattern already owns an endpoint
    DuplicateRoute {
        /// The rejected pattern
        pattern: String,
    },
    /// More segments than a node depth can address
    TooDeep {
        /// The rejected pattern
        pattern: String,
    },
}

impl RouteError {
    /// The pattern that failed registration
    pub fn pattern(&self) -> &str {
        match self {
            RouteError::ParentSegment { pattern }
            | RouteError::UnbalancedDelimiter { pattern }
            | RouteError::NestedPlaceholder { pattern }
            | RouteError::InvalidParamName { pattern, .. }
            | RouteError::InvalidValidator { pattern, .. }
            | RouteError::InvalidSetting { pattern, .. }
            | RouteError::DuplicateParam { pattern, .. }
            | RouteError::TooManyParams { pattern }
            | RouteError::InvalidCatchAll { pattern }
            | RouteError::CatchAllNotLast { pattern }
            | RouteError::CatchAllConflict { pattern, .. }
            | RouteError::DuplicateRoute { pattern }
            | RouteError::TooDeep { pattern } => pattern,
        }
    }

    /// True for errors raised by the grammar rather than by the tree merge
    pub fn is_syntax(&self) -> bool {
        !matches!(
            self,
            RouteError::CatchAllConflict { .. }
                | RouteError::DuplicateRoute { .. }
                | RouteError::TooDeep { .. }
        )
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::ParentSegment { pattern } => {
                write!(f, "route '{pattern}': '..' segments are not allowed")
            }
            RouteError::UnbalancedDelimiter { pattern } => {
                write!(f, "route '{pattern}': unbalanced '<' / '>' in placeholder")
            }
            RouteError::NestedPlaceholder { pattern } => {
                write!(f, "route '{pattern}': placeholders cannot be nested")
            }
            RouteError::InvalidParamName { pattern, name } => write!(
                f,
                "route '{pattern}': invalid parameter name '{name}' \
                (must start with a letter and contain only word characters)"
            ),
            RouteError::InvalidValidator { pattern, spec } => write!(
                f,
                "route '{pattern}': invalid validator '{spec}'. \
                Expected format: name or name(setting)"
            ),
            RouteError::InvalidSetting { pattern, setting } => write!(
                f,
                "route '{pattern}': length setting '{setting}' is out of range (0-255)"
            ),
            RouteError::DuplicateParam { pattern, name } => {
                write!(f, "route '{pattern}': parameter '{name}' is declared twice")
            }
            RouteError::TooManyParams { pattern } => {
                write!(f, "route '{pattern}': more than 255 parameters")
            }
            RouteError::InvalidCatchAll { pattern } => write!(
                f,
                "route '{pattern}': '*' is only allowed as the catch-all segment '*pathInfo'"
            ),
            RouteError::CatchAllNotLast { pattern } => write!(
                f,
                "route '{pattern}': catch-all '*pathInfo' must be the last segment"
            ),
            RouteError::CatchAllConflict { pattern, existing } => write!(
                f,
                "route '{pattern}': catch-all conflicts with existing segment '{existing}'"
            ),
            RouteError::DuplicateRoute { pattern } => {
                write!(f, "route '{pattern}' is already registered")
            }
            RouteError::TooDeep { pattern } => {
                write!(f, "route '{pattern}': too many path segments")
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Request path could not be split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path contains a `..` segment
    ParentSegment {
        /// The offending request path
        path: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::ParentSegment { path } => {
                write!(f, "request path '{path}' contains a '..' segment")
            }
        }
    }
}

impl std::error::Error for PathError {}
