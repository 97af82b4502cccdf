//! Variable resolvers for template formatting.
//!
//! A [`Resolver`] supplies the value of a named variable when a template is
//! formatted. Maps resolve directly, closures are adapted via
//! [`FnResolver`], and a parse result ([`crate::TemplateMatch`]) is itself a
//! resolver, so extracted variables can be fed straight back into a format
//! call.

use std::borrow::Cow;
use std::collections::HashMap;

/// Capability to resolve a variable name into a value at format time.
pub trait Resolver {
    /// Resolve a variable name, or `None` if the model has no value for it.
    /// Returning `None` is not an error; the template falls back to the
    /// variable's default value.
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Resolver for HashMap<String, String> {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<'v> Resolver for HashMap<&'v str, &'v str> {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(*value))
    }
}

/// Adapts a closure into a [`Resolver`].
///
/// # Example
///
/// ```
/// use uritemplate::{FnResolver, Template};
///
/// let template = Template::new("/pets/{id}");
/// let resolver = FnResolver::new(|name| match name {
///     "id" => Some("42".to_string()),
///     _ => None,
/// });
/// assert_eq!(template.format(&resolver), "/pets/42");
/// ```
pub struct FnResolver<F>(F);

impl<F> FnResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Wrap a closure as a resolver.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Resolver for FnResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        (self.0)(name).map(Cow::Owned)
    }
}

/// Resolves every variable to the empty string.
///
/// Formatting a template with this resolver yields its literal skeleton,
/// which is what route specificity ranking measures.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl Resolver for EmptyResolver {
    fn resolve(&self, _name: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(""))
    }
}
