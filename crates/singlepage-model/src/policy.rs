//! Inclusion and grouping policies.
//!
//! Which classes and methods end up in the document, and which group each
//! method belongs to, is decided by an [`ExtractPolicy`]. The defaults
//! document test suites: classes named `Test*`, methods named `test_*`,
//! grouped by the first word after `test_`.

use regex::Regex;
use std::fmt;

use crate::{ModelError, ModelResult};

/// Decides whether a class or method name is documented.
pub trait NameFilter {
    /// Check whether `name` passes the filter.
    fn accepts(&self, name: &str) -> bool;
}

impl<F> NameFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts names starting with a fixed marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePrefix(pub String);

impl NamePrefix {
    /// Create a prefix filter.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }
}

impl NameFilter for NamePrefix {
    fn accepts(&self, name: &str) -> bool {
        name.starts_with(self.0.as_str())
    }
}

/// Derives a group name from a method name.
#[derive(Debug, Clone)]
pub struct GroupTemplate {
    pattern: Regex,
}

impl GroupTemplate {
    /// Default grouping: the token after `test_`, up to the next `_`.
    pub const DEFAULT_PATTERN: &'static str = "^test_([^_]+)";

    /// Compile a template. The first capture group yields the group name.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or has no capture group.
    pub fn new(pattern: &str) -> ModelResult<Self> {
        let pattern = Regex::new(pattern)?;
        if pattern.captures_len() < 2 {
            return Err(ModelError::MissingCapture(pattern.as_str().to_string()));
        }
        Ok(Self { pattern })
    }

    /// Template for `<prefix><token>`, where the token runs up to the next `_`.
    ///
    /// # Errors
    ///
    /// Never fails for a literal prefix; the result type matches [`Self::new`].
    pub fn for_prefix(prefix: &str) -> ModelResult<Self> {
        Self::new(&format!("^{}([^_]+)", regex::escape(prefix)))
    }

    /// The template's source pattern.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Group name for `method`, if the name matches.
    pub fn group_of<'n>(&self, method: &'n str) -> Option<&'n str> {
        self.pattern
            .captures(method)?
            .get(1)
            .map(|m| m.as_str())
            .filter(|name| !name.is_empty())
    }
}

impl Default for GroupTemplate {
    fn default() -> Self {
        Self {
            pattern: Regex::new(Self::DEFAULT_PATTERN).expect("default group pattern is valid"),
        }
    }
}

/// What to do with qualifying methods the group template doesn't match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Ungrouped {
    /// Leave them out of the document.
    #[default]
    Drop,
    /// Put them in a group with this name; an empty name drops them.
    Collect(String),
}

/// The complete extraction policy.
pub struct ExtractPolicy {
    classes: Box<dyn NameFilter>,
    methods: Box<dyn NameFilter>,
    groups: GroupTemplate,
    ungrouped: Ungrouped,
}

impl ExtractPolicy {
    /// Default class marker.
    pub const CLASS_PREFIX: &'static str = "Test";

    /// Default method marker.
    pub const METHOD_PREFIX: &'static str = "test_";

    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class filter.
    #[must_use]
    pub fn classes(mut self, filter: impl NameFilter + 'static) -> Self {
        self.classes = Box::new(filter);
        self
    }

    /// Set the method filter.
    #[must_use]
    pub fn methods(mut self, filter: impl NameFilter + 'static) -> Self {
        self.methods = Box::new(filter);
        self
    }

    /// Set the group template.
    #[must_use]
    pub fn groups(mut self, template: GroupTemplate) -> Self {
        self.groups = template;
        self
    }

    /// Set the handling of methods without a group.
    #[must_use]
    pub fn ungrouped(mut self, ungrouped: Ungrouped) -> Self {
        self.ungrouped = ungrouped;
        self
    }

    /// Check whether a class is documented.
    pub fn includes_class(&self, name: &str) -> bool {
        self.classes.accepts(name)
    }

    /// Check whether a method is documented.
    pub fn includes_method(&self, name: &str) -> bool {
        self.methods.accepts(name)
    }

    /// Group a documented method belongs to, or `None` to drop it.
    pub fn group_of<'n>(&'n self, method: &'n str) -> Option<&'n str> {
        match (self.groups.group_of(method), &self.ungrouped) {
            (Some(group), _) => Some(group),
            (None, Ungrouped::Collect(bucket)) if !bucket.is_empty() => Some(bucket.as_str()),
            (None, _) => None,
        }
    }
}

impl Default for ExtractPolicy {
    fn default() -> Self {
        Self {
            classes: Box::new(NamePrefix::new(Self::CLASS_PREFIX)),
            methods: Box::new(NamePrefix::new(Self::METHOD_PREFIX)),
            groups: GroupTemplate::default(),
            ungrouped: Ungrouped::Drop,
        }
    }
}

impl fmt::Debug for ExtractPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractPolicy")
            .field("groups", &self.groups.as_str())
            .field("ungrouped", &self.ungrouped)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ExtractPolicy::default();
        assert!(policy.includes_class("TestFoo"));
        assert!(!policy.includes_class("HelperFoo"));
        assert!(policy.includes_method("test_alpha_one"));
        assert!(!policy.includes_method("setup"));
        assert_eq!(policy.group_of("test_alpha_one"), Some("alpha"));
        assert_eq!(policy.group_of("test_beta"), Some("beta"));
        assert_eq!(policy.group_of("helper_check"), None);
    }

    #[test]
    fn test_empty_token_yields_no_group() {
        let template = GroupTemplate::default();
        assert_eq!(template.group_of("test__double"), None);
        assert_eq!(template.group_of("test_"), None);
    }

    #[test]
    fn test_collect_ungrouped() {
        let policy = ExtractPolicy::new().ungrouped(Ungrouped::Collect("misc".to_string()));
        assert_eq!(policy.group_of("helper_check"), Some("misc"));
        assert_eq!(policy.group_of("test_gamma"), Some("gamma"));
    }

    #[test]
    fn test_empty_bucket_drops_ungrouped() {
        let policy = ExtractPolicy::new().ungrouped(Ungrouped::Collect(String::new()));
        assert_eq!(policy.group_of("helper_check"), None);
        assert_eq!(policy.group_of("test_gamma"), Some("gamma"));
    }

    #[test]
    fn test_closure_filters() {
        let policy = ExtractPolicy::new()
            .classes(|name: &str| name.ends_with("Spec"))
            .methods(NamePrefix::new("it_"))
            .groups(GroupTemplate::for_prefix("it_").unwrap());
        assert!(policy.includes_class("ParserSpec"));
        assert!(!policy.includes_class("TestParser"));
        assert_eq!(policy.group_of("it_parses_numbers"), Some("parses"));
    }

    #[test]
    fn test_template_requires_capture() {
        assert!(matches!(
            GroupTemplate::new("^test_"),
            Err(ModelError::MissingCapture(_))
        ));
        assert!(matches!(
            GroupTemplate::new("^test_(["),
            Err(ModelError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_prefix_is_escaped() {
        let template = GroupTemplate::for_prefix("t.").unwrap();
        assert_eq!(template.group_of("t.case_x"), Some("case"));
        assert_eq!(template.group_of("tXcase_x"), None);
    }
}
