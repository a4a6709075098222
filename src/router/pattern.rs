//! Route pattern grammar
//!
//! A pattern is split on `/` into segments. Each segment is one of:
//!
//! - static text: `blog`
//! - the catch-all `*pathInfo`, only as the final segment
//! - text mixed with placeholders: `edit-<id:int(5)>`
//!
//! A placeholder is written `<name[=default][:validator[(setting)]]>`:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `<id>` | validator `any` (or `action` when the name is `action`), length 1-255 |
//! | `<id:int>` | validator `int`, length 1-255 |
//! | `<id:int(5)>` | exactly 5 |
//! | `<id:int(2~4)>` | 2 to 4 (bounds may be written in either order) |
//! | `<color:enum(red\|blue)>` | one of the `\|`-separated alternatives |
//! | `<action=list>` | optional, `list` when absent from the URL |
//!
//! Empty segments and `.` segments are dropped, `..` is rejected. Request paths
//! are split with the same rules via [`split_path`].

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashSet;

use crate::error::RouteError;

/// Literal text of the catch-all segment
pub const CATCH_ALL_SEGMENT: &str = "*pathInfo";

/// Parameter key the catch-all binds to
pub const CATCH_ALL_PARAM: &str = "pathInfo";

/// Validator used when a placeholder names none
pub const DEFAULT_VALIDATOR: &str = "any";

/// Validator used for a placeholder literally named `action`
pub const ACTION_VALIDATOR: &str = "action";

/// Maximum placeholders in one pattern
pub const MAX_PARAMS: usize = 255;

/// Segments kept inline before spilling to the heap
pub const MAX_INLINE_SEGMENTS: usize = 16;

/// Split path segments, borrowed from the input
pub type Segments<'a> = SmallVec<[&'a str; MAX_INLINE_SEGMENTS]>;

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid param name regex"));

static VALIDATOR_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\((.*)\))?$").expect("valid validator regex")
});

static LENGTH_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)~(\d+)$").expect("valid range regex"));

/// Per-parameter contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOption {
    /// Name looked up in the validator registry
    pub validator: String,
    /// Value used when the parameter is absent from the URL
    pub default: Option<String>,
    /// `|`-separated alternatives for the `enum` validator
    pub enum_setting: String,
    /// Minimum matched length
    pub min_len: u8,
    /// Maximum matched length
    pub max_len: u8,
}

impl RouteOption {
    /// Option for `validator` with the default 1-255 bounds
    pub fn new(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            default: None,
            enum_setting: String::new(),
            min_len: 1,
            max_len: u8::MAX,
        }
    }

    /// Same option with fixed length bounds
    #[must_use]
    pub fn with_len(mut self, min: u8, max: u8) -> Self {
        self.min_len = min.min(max);
        self.max_len = min.max(max);
        self
    }

    /// Same option with an enum setting
    #[must_use]
    pub fn with_enum(mut self, setting: impl Into<String>) -> Self {
        self.enum_setting = setting.into();
        self
    }

    /// Same option with a default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Whether a default value was declared
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Declared default value
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Whether `len` lies within `[min_len, max_len]`
    #[inline]
    pub fn len_within(&self, len: usize) -> bool {
        len >= usize::from(self.min_len) && len <= usize::from(self.max_len)
    }
}

/// One piece of a parameterised segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentToken {
    /// Text that must appear verbatim
    Literal(String),
    /// A placeholder, by parameter name
    Param(String),
}

/// Shape of a parsed segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Plain text
    Static,
    /// Contains at least one placeholder
    Param,
    /// `*pathInfo`
    CatchAll,
}

/// A segment of a route pattern after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    /// Shape of the segment
    pub kind: SegmentKind,
    /// Segment text exactly as registered
    pub raw: String,
    /// Literal and placeholder tokens in order; empty unless `kind` is `Param`
    pub tokens: Vec<SegmentToken>,
    /// Options of the placeholders in this segment, in order of appearance
    pub params: Vec<(String, RouteOption)>,
}

impl ParsedSegment {
    fn literal(raw: &str) -> Self {
        Self {
            kind: SegmentKind::Static,
            raw: raw.to_string(),
            tokens: Vec::new(),
            params: Vec::new(),
        }
    }

    fn catch_all() -> Self {
        Self {
            kind: SegmentKind::CatchAll,
            raw: CATCH_ALL_SEGMENT.to_string(),
            tokens: Vec::new(),
            params: Vec::new(),
        }
    }
}

/// Split a path into segments
///
/// Empty and `.` segments are dropped. Returns `None` if any segment is `..`.
pub fn split_path(path: &str) -> Option<Segments<'_>> {
    let mut segments = Segments::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s => segments.push(s),
        }
    }
    Some(segments)
}

/// Parse a route pattern into its segments
///
/// An empty result means the pattern addresses the root (`/`).
pub fn parse_pattern(pattern: &str) -> Result<Vec<ParsedSegment>, RouteError> {
    let segments = split_path(pattern).ok_or_else(|| RouteError::ParentSegment {
        pattern: pattern.to_string(),
    })?;
    if segments.len() >= usize::from(u16::MAX) {
        return Err(RouteError::TooDeep {
            pattern: pattern.to_string(),
        });
    }

    let mut names = HashSet::new();
    let mut parsed = Vec::with_capacity(segments.len());
    let last = segments.len().saturating_sub(1);

    for (i, segment) in segments.iter().enumerate() {
        if *segment == CATCH_ALL_SEGMENT {
            if i != last {
                return Err(RouteError::CatchAllNotLast {
                    pattern: pattern.to_string(),
                });
            }
            if !names.insert(CATCH_ALL_PARAM.to_string()) {
                return Err(RouteError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: CATCH_ALL_PARAM.to_string(),
                });
            }
            parsed.push(ParsedSegment::catch_all());
            continue;
        }
        if segment.contains('*') {
            return Err(RouteError::InvalidCatchAll {
                pattern: pattern.to_string(),
            });
        }
        if segment.contains(|c: char| c == '<' || c == '>') {
            parsed.push(parse_param_segment(pattern, segment, &mut names)?);
        } else {
            parsed.push(ParsedSegment::literal(segment));
        }
    }

    Ok(parsed)
}

fn parse_param_segment(
    pattern: &str,
    segment: &str,
    names: &mut HashSet<String>,
) -> Result<ParsedSegment, RouteError> {
    let mut tokens = Vec::new();
    let mut params = Vec::new();
    let mut literal_start = 0;
    let mut open: Option<usize> = None;

    for (i, c) in segment.char_indices() {
        match c {
            '<' => {
                if open.is_some() {
                    return Err(RouteError::NestedPlaceholder {
                        pattern: pattern.to_string(),
                    });
                }
                if i > literal_start {
                    tokens.push(SegmentToken::Literal(segment[literal_start..i].to_string()));
                }
                open = Some(i + 1);
            }
            '>' => {
                let start = open.take().ok_or_else(|| RouteError::UnbalancedDelimiter {
                    pattern: pattern.to_string(),
                })?;
                let (name, option) = parse_placeholder(pattern, &segment[start..i])?;
                if !names.insert(name.clone()) {
                    return Err(RouteError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name,
                    });
                }
                if names.len() > MAX_PARAMS {
                    return Err(RouteError::TooManyParams {
                        pattern: pattern.to_string(),
                    });
                }
                tokens.push(SegmentToken::Param(name.clone()));
                params.push((name, option));
                literal_start = i + 1;
            }
            _ => {}
        }
    }

    if open.is_some() {
        return Err(RouteError::UnbalancedDelimiter {
            pattern: pattern.to_string(),
        });
    }
    if literal_start < segment.len() {
        tokens.push(SegmentToken::Literal(segment[literal_start..].to_string()));
    }

    Ok(ParsedSegment {
        kind: SegmentKind::Param,
        raw: segment.to_string(),
        tokens,
        params,
    })
}

/// Parse the text between `<` and `>`
fn parse_placeholder(pattern: &str, body: &str) -> Result<(String, RouteOption), RouteError> {
    let (head, validator) = match body.split_once(':') {
        Some((head, validator)) => (head, Some(validator)),
        None => (body, None),
    };

    // A declared default skips the identifier check on the name
    let (name, default) = match head.split_once('=') {
        Some((name, default)) => (name, Some(default)),
        None => {
            if !PARAM_NAME.is_match(head) {
                return Err(RouteError::InvalidParamName {
                    pattern: pattern.to_string(),
                    name: head.to_string(),
                });
            }
            (head, None)
        }
    };
    if name.is_empty() {
        return Err(RouteError::InvalidParamName {
            pattern: pattern.to_string(),
            name: String::new(),
        });
    }

    let mut option = match validator {
        Some(spec) => parse_validator(pattern, spec)?,
        None if name == ACTION_VALIDATOR => RouteOption::new(ACTION_VALIDATOR),
        None => RouteOption::new(DEFAULT_VALIDATOR),
    };
    option.default = default.map(str::to_string);

    Ok((name.to_string(), option))
}

/// Parse `name` or `name(setting)`
fn parse_validator(pattern: &str, spec: &str) -> Result<RouteOption, RouteError> {
    let caps = VALIDATOR_SPEC
        .captures(spec)
        .ok_or_else(|| RouteError::InvalidValidator {
            pattern: pattern.to_string(),
            spec: spec.to_string(),
        })?;
    let option = RouteOption::new(&caps[1]);

    let Some(setting) = caps.get(2).map(|m| m.as_str()) else {
        return Ok(option);
    };

    if !setting.is_empty() && setting.bytes().all(|b| b.is_ascii_digit()) {
        let n = parse_bound(pattern, setting)?;
        return Ok(option.with_len(n, n));
    }
    if let Some(range) = LENGTH_RANGE.captures(setting) {
        let a = parse_bound(pattern, &range[1])?;
        let b = parse_bound(pattern, &range[2])?;
        return Ok(option.with_len(a, b));
    }
    Ok(option.with_enum(setting))
}

fn parse_bound(pattern: &str, digits: &str) -> Result<u8, RouteError> {
    digits.parse::<u8>().map_err(|_| RouteError::InvalidSetting {
        pattern: pattern.to_string(),
        setting: digits.to_string(),
    })
}
