//! Pattern compiler: translates a raw `{name}` template into a regex.
//!
//! The compiler performs a single left-to-right scan of the template string.
//! Literal characters are escaped so they match themselves exactly, each new
//! `{name}` token becomes a capturing group derived from its variable
//! descriptor, and a repeated name becomes a back-reference to its first
//! capture group so that both occurrences are forced to match the same
//! substring.
//!
//! Malformed patterns (unterminated `{`, empty names, invalid characters
//! inside a token) never fail compilation. They are logged as warnings and
//! the offending token is skipped, so a bad route degrades to a pattern that
//! simply does not match rather than taking the routing layer down. Callers
//! are expected to catch pattern mistakes in their route registration tests.
//!
//! The same scanner drives the formatter and `variable_names`, keeping the
//! token grammar and the malformed-pattern policy identical in every
//! direction.

use std::collections::HashMap;
use std::sync::Arc;

use fancy_regex::Regex;
use tracing::{debug, warn};

use super::variable::{Variable, VariableType};

/// Maximum number of captured variables before heap allocation.
/// Most route templates have well under 8 placeholders.
pub const MAX_INLINE_VARS: usize = 8;

// Character class bodies, escaped for use inside `[...]`.
const ALPHA: &str = "a-zA-Z";
const DIGIT: &str = "0-9";
const HEXA: &str = "0-9A-Fa-f";
const URI_UNRESERVED: &str = r"a-zA-Z0-9\-\._~";
const URI_GEN_DELIMS: &str = r"\:\/\?\#\[\]\@";
const URI_SUB_DELIMS: &str = r"\!\$\&\'\(\)\*\+\,\;\=";
const QUERY_PARAM_DELIMS: &str = r"\!\$\'\(\)\*\+\,\;";

/// One token of a template pattern.
pub(crate) enum Token<'a> {
    /// A literal character outside any variable.
    Literal(char),
    /// A well-formed `{name}` occurrence; the name is non-empty.
    Variable(&'a str),
}

/// True for RFC 3986 unreserved characters, the only ones legal in a
/// variable name.
#[inline]
pub(crate) fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Scan a raw pattern, emitting one token per literal character and one per
/// well-formed variable.
///
/// Malformed input follows the log-and-skip policy: an invalid character
/// inside a variable token is dropped (the rest of the name is still
/// collected), an empty `{}` emits nothing, a stray `}` outside a variable is
/// dropped, and a `{` left unterminated at the end of the pattern discards
/// everything scanned since it.
pub(crate) fn scan(pattern: &str, mut emit: impl FnMut(Token<'_>)) {
    let mut in_variable = false;
    let mut name = String::new();

    for c in pattern.chars() {
        if in_variable {
            if is_unreserved(c) {
                name.push(c);
            } else if c == '}' {
                if name.is_empty() {
                    warn!(pattern = %pattern, "empty variable name in template pattern");
                } else {
                    emit(Token::Variable(&name));
                    name.clear();
                }
                in_variable = false;
            } else {
                warn!(
                    pattern = %pattern,
                    character = %c,
                    "invalid character inside a template variable"
                );
            }
        } else if c == '{' {
            in_variable = true;
        } else if c == '}' {
            warn!(pattern = %pattern, "stray '}}' outside a template variable");
        } else {
            emit(Token::Literal(c));
        }
    }

    if in_variable {
        warn!(pattern = %pattern, "unterminated variable at end of template pattern");
    }
}

/// A compiled template pattern.
///
/// Built once per template and reused for every match; variable names are
/// `Arc<str>` so captures can share them without copying.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    /// The anchored regex, or `None` when compilation degraded; a degraded
    /// pattern matches nothing.
    pub regex: Option<Regex>,
    /// Variable names in first-occurrence order; index `i` corresponds to
    /// capture group `i + 1`.
    pub variables: Vec<Arc<str>>,
}

impl CompiledPattern {
    /// A pattern that matches nothing and captures nothing.
    pub fn degraded() -> Self {
        Self {
            regex: None,
            variables: Vec::new(),
        }
    }
}

/// Compile a raw pattern into an anchored regex plus the ordered variable
/// list.
///
/// `whole_input` selects between whole-string matching (an end anchor is
/// appended) and prefix matching (trailing input is permitted).
pub(crate) fn compile(
    pattern: &str,
    variables: &HashMap<String, Variable>,
    default_variable: &Variable,
    whole_input: bool,
) -> CompiledPattern {
    let mut source = String::with_capacity(pattern.len() + 16);
    source.push('^');
    let mut names: Vec<Arc<str>> = Vec::new();

    scan(pattern, |token| match token {
        Token::Literal(c) => quote_char(c, &mut source),
        Token::Variable(name) => {
            if let Some(index) = names.iter().position(|n| n.as_ref() == name) {
                // The variable is used several times in the pattern; a
                // back-reference enforces that every occurrence matches the
                // same substring.
                source.push('\\');
                source.push_str(&(index + 1).to_string());
            } else {
                let variable = variables.get(name).unwrap_or(default_variable);
                source.push_str(&variable_fragment(variable));
                names.push(Arc::from(name));
            }
        }
    });

    if whole_input {
        source.push('$');
    }

    match Regex::new(&source) {
        Ok(regex) => {
            debug!(
                pattern = %pattern,
                regex = %source,
                variables = ?names,
                "template pattern compiled"
            );
            CompiledPattern {
                regex: Some(regex),
                variables: names,
            }
        }
        Err(err) => {
            // Should not happen for synthesized sources; degrade to a
            // never-matching pattern rather than panicking at request time.
            warn!(
                pattern = %pattern,
                regex = %source,
                error = %err,
                "template pattern failed to compile, it will never match"
            );
            CompiledPattern::degraded()
        }
    }
}

/// Regex fragment for a single variable, always exactly one capture group.
///
/// Fixed variables compile to their quoted default value so matching is a
/// literal equality check; everything else compiles per the descriptor's
/// character class, with `+` repetition when required and `*` otherwise.
pub(crate) fn variable_fragment(variable: &Variable) -> String {
    if variable.is_fixed() {
        let mut quoted = String::with_capacity(variable.default_value().len() + 2);
        quoted.push('(');
        for c in variable.default_value().chars() {
            quote_char(c, &mut quoted);
        }
        quoted.push(')');
        return quoted;
    }

    let pct_encoded = format!("\\%[{HEXA}][{HEXA}]");
    let pchar = format!("[{URI_UNRESERVED}{URI_SUB_DELIMS}\\:\\@]|(?:{pct_encoded})");
    let query = format!("{pchar}|\\/|\\?");
    let query_param_char =
        format!("[{URI_UNRESERVED}{QUERY_PARAM_DELIMS}\\:\\@]|(?:{pct_encoded})");

    let required = variable.is_required();
    match variable.var_type() {
        // The dot loses its meaning inside a character class, so ALL stays a
        // bare dot.
        VariableType::All => repeat_class(".", required),
        VariableType::Alpha => repeat_class(&format!("[{ALPHA}]"), required),
        VariableType::Digit => repeat_class(&format!("[{DIGIT}]"), required),
        VariableType::AlphaDigit => repeat_class(&format!("[{ALPHA}{DIGIT}]"), required),
        VariableType::UriUnreserved => repeat_class(&format!("[{URI_UNRESERVED}]"), required),
        VariableType::UriAll => repeat_group(
            &format!(
                "[{URI_GEN_DELIMS}{URI_SUB_DELIMS}{URI_UNRESERVED}]|(?:{pct_encoded})"
            ),
            required,
        ),
        VariableType::Word => repeat_class(r"\w", required),
        VariableType::UriSegment => repeat_group(&pchar, required),
        VariableType::UriPath => repeat_group(&format!("{pchar}|\\/"), required),
        VariableType::UriQuery | VariableType::UriFragment => repeat_group(&query, required),
        VariableType::UriQueryParam => {
            repeat_group(&format!("{query_param_char}|\\/|\\?"), required)
        }
    }
}

/// Capturing group repeating a single character class.
fn repeat_class(class: &str, required: bool) -> String {
    format!("({class}{})", if required { "+" } else { "*" })
}

/// Capturing group repeating a non-capturing alternation, used for the
/// grouped URI productions that admit percent-encoded triples.
fn repeat_group(content: &str, required: bool) -> String {
    format!("((?:{content}){})", if required { "+" } else { "*" })
}

/// Escape a literal pattern character that would otherwise carry regex
/// meaning.
///
/// `<` and `>` stay unescaped: they are ordinary characters here, while
/// `\<`/`\>` are start/end-of-word assertions.
pub(crate) fn quote_char(c: char, out: &mut String) {
    if matches!(
        c,
        '\\' | '.'
            | '+'
            | '*'
            | '?'
            | '('
            | ')'
            | '|'
            | '['
            | ']'
            | '{'
            | '}'
            | '^'
            | '$'
            | '#'
            | '&'
            | '-'
            | '~'
            | ':'
            | '!'
    ) {
        out.push('\\');
    }
    out.push(c);
}
