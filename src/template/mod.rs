//! # Template Module
//!
//! URI template compilation, matching and formatting.
//!
//! ## Overview
//!
//! A template is a string mixing literal text with `{name}` placeholders,
//! usable in both directions:
//!
//! - **Parsing**: compile the pattern into a regex once, then match it
//!   repeatedly against candidate paths, extracting the captured variables.
//! - **Formatting**: substitute each placeholder with a value from a
//!   resolver, producing the literal rendering.
//!
//! ## Architecture
//!
//! The module works in two phases:
//!
//! 1. **Compilation**: a single scan of the pattern string turns literal
//!    characters into escaped regex text and each placeholder into a
//!    capturing group derived from its [`Variable`] descriptor, tracking
//!    first-occurrence order. Compilation is lazy and memoized per template.
//!
//! 2. **Matching**: the compiled regex is applied under the template's
//!    [`MatchingMode`]; on success the ordered variable list pairs each name
//!    with its capture group's substring.
//!
//! The same scanner drives compilation, formatting and variable-name
//! listing, so malformed patterns behave identically everywhere: a warning
//! is logged and the offending token is skipped.

mod compile;
mod core;
mod variable;

pub use compile::MAX_INLINE_VARS;
pub use core::{MatchingMode, Template, TemplateMatch, VarVec};
pub use variable::{Variable, VariableType};
