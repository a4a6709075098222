//! Parameter validators
//!
//! A validator tries to consume a prefix of the remaining URL text for one
//! placeholder. It returns the consumed prefix, or `""` when the text does not
//! match. There is no error channel: an empty match is the only failure signal.
//!
//! Built-ins:
//!
//! - `any` / `string`: all remaining text, if its length is within bounds
//! - `int`: leading digits, at most `max_len` of them, at least `min_len`
//! - `word`: leading `[A-Za-z0-9_]` run, length within bounds
//! - `action`: like `word` but also accepts `-`
//! - `enum`: first `|`-separated alternative that prefixes the text

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::pattern::RouteOption;

/// Signature shared by all validators
pub type ValidatorFn = dyn for<'a> Fn(&'a str, &RouteOption) -> &'a str + Send + Sync;

/// A registered validator
pub type Validator = Arc<ValidatorFn>;

/// Name to validator table owned by a route tree
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Validator>,
}

impl ValidatorRegistry {
    /// Registry without any validators
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Registry holding the built-in validators
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("any", any);
        registry.register("string", any);
        registry.register("int", int);
        registry.register("word", word);
        registry.register("action", action);
        registry.register("enum", enumeration);
        registry
    }

    /// Add or replace a validator
    pub fn register<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: for<'a> Fn(&'a str, &RouteOption) -> &'a str + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Add a validator that accepts the longest prefix matching `pattern`
    ///
    /// The expression is anchored at the start of the remaining text. The
    /// option's length bounds still apply to the matched prefix.
    pub fn register_regex(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<(), regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        self.register(name, move |remaining: &str, opt: &RouteOption| {
            match regex.find(remaining) {
                Some(m) if !m.as_str().is_empty() && opt.len_within(m.as_str().chars().count()) => {
                    &remaining[..m.end()]
                }
                _ => "",
            }
        });
        Ok(())
    }

    /// Look up a validator by name
    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

/// All remaining text, if its length is within bounds
pub fn any<'a>(remaining: &'a str, opt: &RouteOption) -> &'a str {
    let len = remaining.chars().count();
    if len == 0 || !opt.len_within(len) {
        return "";
    }
    remaining
}

/// Leading digits, capped at `max_len`
pub fn int<'a>(remaining: &'a str, opt: &RouteOption) -> &'a str {
    let digits = remaining
        .bytes()
        .take(usize::from(opt.max_len))
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 || digits < usize::from(opt.min_len) {
        return "";
    }
    &remaining[..digits]
}

/// Leading `[A-Za-z0-9_]` run
pub fn word<'a>(remaining: &'a str, opt: &RouteOption) -> &'a str {
    scan(remaining, opt, |b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Leading `[A-Za-z0-9_-]` run, used for controller action names
pub fn action<'a>(remaining: &'a str, opt: &RouteOption) -> &'a str {
    scan(remaining, opt, |b| {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
    })
}

/// First alternative of `enum_setting` that prefixes the text
pub fn enumeration<'a>(remaining: &'a str, opt: &RouteOption) -> &'a str {
    opt.enum_setting
        .split('|')
        .filter(|alt| !alt.is_empty())
        .find(|alt| remaining.starts_with(*alt))
        .map_or("", |alt| &remaining[..alt.len()])
}

#[inline]
fn scan<'a>(remaining: &'a str, opt: &RouteOption, accept: impl Fn(u8) -> bool) -> &'a str {
    let len = remaining.bytes().take_while(|b| accept(*b)).count();
    if len == 0 || !opt.len_within(len) {
        return "";
    }
    &remaining[..len]
}
