//! Variable descriptors for URI template placeholders.
//!
//! A [`Variable`] describes how a single `{name}` placeholder behaves when a
//! template is matched or formatted: which characters it accepts, whether it
//! may capture an empty string, and whether it is a true variable at all or a
//! fixed literal. Descriptors are pure data; all regex synthesis lives in the
//! pattern compiler.

use serde::{Deserialize, Serialize};

/// Character class accepted by a template variable.
///
/// The first group of variants are plain character classes; the `Uri*`
/// variants starting at [`VariableType::UriSegment`] are grouped productions
/// from RFC 3986 (they admit percent-encoded triples, so they compile to
/// non-capturing group repetitions rather than a single character class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// Any character.
    #[default]
    All,
    /// ASCII letters.
    Alpha,
    /// ASCII digits.
    Digit,
    /// ASCII letters and digits.
    AlphaDigit,
    /// RFC 3986 unreserved characters: letters, digits, `-`, `.`, `_`, `~`.
    UriUnreserved,
    /// All legal URI characters: unreserved, gen-delims, sub-delims and
    /// percent-encoded triples.
    UriAll,
    /// Word characters (`\w`).
    Word,
    /// Path segment characters (`pchar`): excludes `/`, admits `%xx`.
    UriSegment,
    /// Path characters: `pchar` plus `/`.
    UriPath,
    /// Query characters: `pchar` plus `/` and `?`.
    UriQuery,
    /// Query parameter characters: query characters minus the `&` and `=`
    /// parameter separators.
    UriQueryParam,
    /// Fragment characters, identical to the query production.
    UriFragment,
}

/// Descriptor for a single template variable.
///
/// When no descriptor is registered for a placeholder name, the template's
/// default variable applies, so open patterns only need descriptors for the
/// variables that deviate from it.
///
/// # Example
///
/// ```
/// use uritemplate::{Variable, VariableType};
///
/// let id = Variable::new(VariableType::Digit);
/// let version = Variable::default().with_fixed(true).with_default_value("v1");
/// assert!(version.is_fixed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    /// Character class accepted when matching.
    var_type: VariableType,
    /// Value substituted when the variable is absent from the format model,
    /// and the literal matched when the variable is fixed.
    default_value: String,
    /// Required variables must capture at least one character.
    required: bool,
    /// Fixed variables match their default value literally and never vary.
    fixed: bool,
    /// Percent-decode the captured value when parsing.
    decoding_on_parse: bool,
    /// Percent-encode the resolved value when formatting.
    encoding_on_format: bool,
}

impl Default for Variable {
    fn default() -> Self {
        Self {
            var_type: VariableType::All,
            default_value: String::new(),
            required: true,
            fixed: false,
            decoding_on_parse: false,
            encoding_on_format: false,
        }
    }
}

impl Variable {
    /// Create a descriptor of the given type with all other fields defaulted
    /// (empty default value, required, not fixed).
    #[must_use]
    pub fn new(var_type: VariableType) -> Self {
        Self {
            var_type,
            ..Self::default()
        }
    }

    /// Set the value used when the variable is absent from the format model.
    /// For fixed variables this is also the literal the matcher requires.
    #[must_use]
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    /// Set whether the variable must capture at least one character.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set whether the variable is a fixed literal rather than a capture.
    #[must_use]
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Set whether captured values are percent-decoded on parse.
    #[must_use]
    pub fn with_decoding_on_parse(mut self, decoding_on_parse: bool) -> Self {
        self.decoding_on_parse = decoding_on_parse;
        self
    }

    /// Set whether resolved values are percent-encoded on format.
    #[must_use]
    pub fn with_encoding_on_format(mut self, encoding_on_format: bool) -> Self {
        self.encoding_on_format = encoding_on_format;
        self
    }

    /// Character class accepted when matching.
    #[inline]
    #[must_use]
    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    /// Value substituted when the variable is absent from the format model.
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// True if the variable must capture at least one character.
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// True if the variable matches its default value literally.
    #[inline]
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// True if captured values are percent-decoded on parse.
    #[inline]
    #[must_use]
    pub fn is_decoding_on_parse(&self) -> bool {
        self.decoding_on_parse
    }

    /// True if resolved values are percent-encoded on format.
    #[inline]
    #[must_use]
    pub fn is_encoding_on_format(&self) -> bool {
        self.encoding_on_format
    }
}
