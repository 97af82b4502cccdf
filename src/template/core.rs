//! Template matching and formatting - hot path for route resolution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use super::compile::{self, CompiledPattern, Token, MAX_INLINE_VARS};
use super::variable::Variable;
use crate::resolver::Resolver;

/// Stack-allocated storage for captured variables.
///
/// Names are `Arc<str>` shared with the compiled template (known at
/// compilation time, cloned per match with an O(1) atomic increment); values
/// are per-input `String`s extracted from the matched text.
pub type VarVec = SmallVec<[(Arc<str>, String); MAX_INLINE_VARS]>;

/// How a compiled template is applied to candidate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// The whole input must match the template.
    #[default]
    Equals,
    /// A prefix of the input must match; trailing characters are permitted
    /// and not consumed.
    StartsWith,
}

/// Result of successfully parsing an input against a template.
#[derive(Debug, Clone)]
pub struct TemplateMatch {
    /// Captured variables in first-occurrence order. A value may be empty
    /// when its descriptor permitted a zero-length capture.
    pub variables: VarVec,
    /// Number of bytes consumed from the start of the input. Equal to the
    /// input length in [`MatchingMode::Equals`] mode.
    pub matched_length: usize,
}

impl TemplateMatch {
    /// Get a captured variable by name.
    ///
    /// Uses "last write wins" semantics for the unusual case of duplicate
    /// names in the capture list; with a single template that cannot happen
    /// (repeats share one capture), but merged capture lists from nested
    /// routers can carry duplicates.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert the captured variables to a `HashMap`.
    /// Note: this allocates - use [`TemplateMatch::get`] in hot paths instead.
    #[must_use]
    pub fn variables_map(&self) -> HashMap<String, String> {
        self.variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

// Lets a parse result feed a format call directly, which is what the reverse
// path of a router does when rebuilding an outgoing URI.
impl Resolver for TemplateMatch {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// String template with a pluggable model, supporting both parsing and
/// formatting.
///
/// Variables are written `{name}` and described by an optional per-template
/// descriptor map; any placeholder without an explicit descriptor falls back
/// to the template's default variable. Compilation to a regex happens lazily
/// on first use and is memoized, so the intended lifecycle is compile once at
/// route registration, match many at request time.
///
/// All configuration methods take `&mut self`, so a shared (`&`/`Arc`)
/// template is immutable and freely usable from multiple threads; the lazy
/// compilation step is atomically published.
///
/// # Example
///
/// ```
/// use uritemplate::{MatchingMode, Template, Variable, VariableType};
///
/// let mut template = Template::new("/zoo/animals/{id}");
/// template.define_variable("id", Variable::new(VariableType::Digit));
///
/// let matched = template.parse("/zoo/animals/42").unwrap();
/// assert_eq!(matched.get("id"), Some("42"));
/// assert_eq!(matched.matched_length, 15);
/// assert!(template.parse("/zoo/animals/lion").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    /// The raw pattern used for formatting and parsing.
    pattern: String,
    /// The matching mode applied when parsing.
    matching_mode: MatchingMode,
    /// Fallback descriptor for placeholders without an explicit entry in
    /// `variables`.
    default_variable: Variable,
    /// Per-name variable descriptors.
    variables: HashMap<String, Variable>,
    /// Percent-encode every resolved value when formatting.
    encoding_variables: bool,
    /// Memoized compilation of `pattern`; reset by every mutator.
    compiled: OnceCell<CompiledPattern>,
}

impl Template {
    /// Create a template matching the whole input, where every variable
    /// accepts any sequence of characters and formats absent variables as
    /// empty strings.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_mode(pattern, MatchingMode::default())
    }

    /// Create a template with an explicit matching mode.
    #[must_use]
    pub fn with_mode(pattern: impl Into<String>, matching_mode: MatchingMode) -> Self {
        Self {
            pattern: pattern.into(),
            matching_mode,
            default_variable: Variable::default(),
            variables: HashMap::new(),
            encoding_variables: false,
            compiled: OnceCell::new(),
        }
    }

    /// The raw pattern used for formatting and parsing.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The matching mode applied when parsing.
    #[inline]
    #[must_use]
    pub fn matching_mode(&self) -> MatchingMode {
        self.matching_mode
    }

    /// The fallback descriptor applied to placeholders without an explicit
    /// descriptor.
    #[inline]
    #[must_use]
    pub fn default_variable(&self) -> &Variable {
        &self.default_variable
    }

    /// The explicit per-name variable descriptors.
    #[inline]
    #[must_use]
    pub fn variables(&self) -> &HashMap<String, Variable> {
        &self.variables
    }

    /// True if every resolved value is percent-encoded when formatting.
    #[inline]
    #[must_use]
    pub fn is_encoding_variables(&self) -> bool {
        self.encoding_variables
    }

    /// Replace the raw pattern, invalidating the memoized compilation.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.compiled = OnceCell::new();
    }

    /// Replace the matching mode, invalidating the memoized compilation.
    pub fn set_matching_mode(&mut self, matching_mode: MatchingMode) {
        self.matching_mode = matching_mode;
        self.compiled = OnceCell::new();
    }

    /// Replace the fallback descriptor, invalidating the memoized
    /// compilation.
    pub fn set_default_variable(&mut self, default_variable: Variable) {
        self.default_variable = default_variable;
        self.compiled = OnceCell::new();
    }

    /// Enable or disable percent-encoding of every formatted value.
    pub fn set_encoding_variables(&mut self, encoding_variables: bool) {
        self.encoding_variables = encoding_variables;
    }

    /// Register a descriptor for a named variable, invalidating the memoized
    /// compilation.
    pub fn define_variable(&mut self, name: impl Into<String>, variable: Variable) {
        self.variables.insert(name.into(), variable);
        self.compiled = OnceCell::new();
    }

    /// The memoized compilation, built on first use.
    #[inline]
    pub(crate) fn compiled(&self) -> &CompiledPattern {
        self.compiled.get_or_init(|| {
            compile::compile(
                &self.pattern,
                &self.variables,
                &self.default_variable,
                self.matching_mode == MatchingMode::Equals,
            )
        })
    }

    /// Number of capturing variables in the pattern (repeats counted once).
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.compiled().variables.len()
    }

    /// Every well-formed `{name}` occurrence in the raw pattern, in order and
    /// with duplicates included.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        compile::scan(&self.pattern, |token| {
            if let Token::Variable(name) = token {
                names.push(name.to_string());
            }
        });
        names
    }

    /// Match the input under the active mode, returning the number of bytes
    /// consumed, or `None` if the template does not match.
    ///
    /// A non-match is an expected negative result, not an error; a routing
    /// layer calls this speculatively across many candidate templates.
    #[must_use]
    pub fn match_length(&self, input: &str) -> Option<usize> {
        let compiled = self.compiled();
        let regex = compiled.regex.as_ref()?;

        match regex.find(input) {
            Ok(found) => found.map(|m| m.end()),
            Err(err) => {
                // Backtrack limit exceeded on adversarial input; degrade to a
                // non-match instead of stalling the request path.
                warn!(
                    pattern = %self.pattern,
                    error = %err,
                    "template match aborted"
                );
                None
            }
        }
    }

    /// Match the input and extract the captured variables.
    ///
    /// On success the variables are returned in first-occurrence order along
    /// with the matched byte count; on non-match no partial results are
    /// produced. Captured values are taken verbatim from the input unless the
    /// variable's descriptor enables percent-decoding.
    #[must_use]
    pub fn parse(&self, input: &str) -> Option<TemplateMatch> {
        let compiled = self.compiled();
        let regex = compiled.regex.as_ref()?;

        let captures = match regex.captures(input) {
            Ok(Some(captures)) => captures,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    pattern = %self.pattern,
                    error = %err,
                    "template parse aborted"
                );
                return None;
            }
        };

        let matched_length = captures.get(0).map(|m| m.end())?;
        let mut variables = VarVec::new();

        for (index, name) in compiled.variables.iter().enumerate() {
            let raw = captures
                .get(index + 1)
                .map(|group| group.as_str())
                .unwrap_or("");
            let value = if self.descriptor(name).is_decoding_on_parse() {
                decode_value(raw)
            } else {
                raw.to_string()
            };
            variables.push((Arc::clone(name), value));
        }

        debug!(
            pattern = %self.pattern,
            input = %input,
            matched_length,
            variables = ?variables,
            "template matched"
        );

        Some(TemplateMatch {
            variables,
            matched_length,
        })
    }

    /// Create a formatted string by substituting every variable with the
    /// value produced by the resolver.
    ///
    /// Variables the resolver cannot supply fall back to their descriptor's
    /// default value. Literal text passes through unchanged; malformed tokens
    /// follow the same log-and-skip policy as compilation.
    pub fn format(&self, resolver: &impl Resolver) -> String {
        let mut result = String::with_capacity(self.pattern.len());

        compile::scan(&self.pattern, |token| match token {
            Token::Literal(c) => result.push(c),
            Token::Variable(name) => {
                let variable = self.descriptor(name);
                let value = resolver
                    .resolve(name)
                    .unwrap_or_else(|| Cow::Borrowed(variable.default_value()));

                if self.encoding_variables || variable.is_encoding_on_format() {
                    result.push_str(&urlencoding::encode(&value));
                } else {
                    result.push_str(&value);
                }
            }
        });

        result
    }

    /// The descriptor in effect for a named variable.
    #[inline]
    fn descriptor(&self, name: &str) -> &Variable {
        self.variables.get(name).unwrap_or(&self.default_variable)
    }
}

/// Percent-decode a captured value, keeping it verbatim when the encoding is
/// not valid UTF-8 after decoding.
fn decode_value(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            warn!(value = %raw, error = %err, "captured value failed percent-decoding");
            raw.to_string()
        }
    }
}
