//! Route specificity ranking over compiled templates.
//!
//! A routing layer holding several templates that could all match the same
//! path needs a stable order to try them in: most specific first. The
//! heuristic is the number of literal (non-variable) characters in the
//! pattern, with the template's all-variables-emptied rendering doubling as
//! the identity used for equality and hashing, so two patterns that differ
//! only in variable names compare equal.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::resolver::EmptyResolver;
use crate::template::{MatchingMode, Template, Variable, VariableType};

/// A template wrapped for use as a routing table entry.
///
/// The template always matches in prefix mode so a route can consume the
/// front of a path and leave the remainder for nested routers, and its
/// default variable accepts one path segment (any `pchar` sequence, stopping
/// at `/`), the conventional meaning of `{name}` in a route.
///
/// # Example
///
/// ```
/// use uritemplate::RoutePattern;
///
/// let users = RoutePattern::new("/users/{id}");
/// let catch_all = RoutePattern::new("/{rest}");
/// assert!(users.literal_char_count() > catch_all.literal_char_count());
/// assert!(users.matches_with_empty("/users/42"));
/// assert!(!users.matches_with_empty("/users/42/pets"));
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
    template: Template,
    /// The pattern with every variable emptied; identity for Eq/Hash and the
    /// source of the literal character count.
    emptied: String,
}

impl RoutePattern {
    /// Build a route pattern from a raw `{name}` template.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let mut template = Template::with_mode(pattern, MatchingMode::StartsWith);
        template.set_default_variable(Variable::new(VariableType::UriSegment));
        Self::from_template(template)
    }

    /// Wrap an already configured template, forcing prefix matching.
    #[must_use]
    pub fn from_template(mut template: Template) -> Self {
        template.set_matching_mode(MatchingMode::StartsWith);
        let emptied = template.format(&EmptyResolver);
        Self { template, emptied }
    }

    /// The wrapped template.
    #[inline]
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Number of literal (non-variable) characters in the pattern, the route
    /// specificity score: more literal characters means more specific, tried
    /// first. Counted in characters, not bytes, so non-ASCII literals weigh
    /// the same as ASCII ones.
    #[inline]
    #[must_use]
    pub fn literal_char_count(&self) -> usize {
        self.emptied.chars().count()
    }

    /// Number of capturing variables in the pattern.
    #[must_use]
    pub fn capturing_group_count(&self) -> usize {
        self.template.variable_count()
    }

    /// True if the pattern matches the remaining path completely, leaving at
    /// most a bare `/` behind. Disambiguates "this route fully consumed the
    /// path" from "this route matched but left a non-trivial suffix".
    #[must_use]
    pub fn matches_with_empty(&self, remaining_path: &str) -> bool {
        match self.template.match_length(remaining_path) {
            Some(length) => {
                let rest = &remaining_path[length..];
                rest.is_empty() || rest == "/"
            }
            None => false,
        }
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.emptied == other.emptied
    }
}

impl Eq for RoutePattern {}

impl Hash for RoutePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.emptied.hash(state);
    }
}

impl PartialOrd for RoutePattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoutePattern {
    /// Sorts a routing table most-specific-first: descending literal
    /// character count, with the emptied rendering as a deterministic
    /// tie-break consistent with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .literal_char_count()
            .cmp(&self.literal_char_count())
            .then_with(|| self.emptied.cmp(&other.emptied))
    }
}
