//! # uritemplate
//!
//! A bidirectional URI template engine: `{name}` patterns compiled once into
//! regex matchers, matched many times against request paths, and formatted in
//! reverse from a pluggable variable model.
//!
//! ## Overview
//!
//! A template such as `/zoo/animals/{id}` serves two purposes in a routing
//! layer:
//!
//! - **Parsing** (hot path): match an incoming path and extract the named
//!   variables plus the number of characters consumed, so the routing layer
//!   can dispatch and hand the captures to the selected handler.
//! - **Formatting** (cold path): substitute each `{name}` with a value from
//!   a resolver to build outgoing URIs and redirects.
//!
//! Each variable can be described individually: the character class it
//! accepts, its default value, whether it may capture an empty string, and
//! whether it is a fixed literal. A variable repeated within one pattern is
//! forced to match the same substring at every occurrence.
//!
//! ## Architecture
//!
//! The library is organized into three modules:
//!
//! - **[`template`]** - the engine: variable descriptors, the pattern
//!   compiler, and [`Template`] with its `match`/`parse`/`format` operations
//! - **[`resolver`]** - the [`Resolver`] capability supplying variable
//!   values at format time
//! - **[`route_pattern`]** - [`RoutePattern`], which ranks overlapping
//!   templates by specificity for routing table ordering
//!
//! ## Example
//!
//! ```
//! use uritemplate::{Template, Variable, VariableType};
//!
//! let mut template = Template::new("/zoo/animals/{id}");
//! template.define_variable("id", Variable::new(VariableType::Digit));
//!
//! let matched = template.parse("/zoo/animals/42").unwrap();
//! assert_eq!(matched.get("id"), Some("42"));
//!
//! // Reverse path: a parse result is itself a resolver.
//! assert_eq!(template.format(&matched), "/zoo/animals/42");
//! ```
//!
//! ## Error handling
//!
//! Nothing in the engine is fatal. Malformed patterns are logged and the
//! offending token skipped, a failed match is an ordinary `None` (routing
//! layers probe many candidate templates per request), and an unresolvable
//! variable at format time falls back to its default value.

pub mod resolver;
pub mod route_pattern;
pub mod template;

pub use resolver::{EmptyResolver, FnResolver, Resolver};
pub use route_pattern::RoutePattern;
pub use template::{
    MatchingMode, Template, TemplateMatch, VarVec, Variable, VariableType, MAX_INLINE_VARS,
};
