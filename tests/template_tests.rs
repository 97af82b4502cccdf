use std::collections::HashMap;

use uritemplate::{FnResolver, MatchingMode, Template, Variable, VariableType};

fn segment_template(pattern: &str, mode: MatchingMode) -> Template {
    let mut template = Template::with_mode(pattern, mode);
    template.set_default_variable(Variable::new(VariableType::UriSegment));
    template
}

#[test]
fn test_literal_template_equals_mode() {
    let template = Template::new("/zoo/animals");
    assert_eq!(template.match_length("/zoo/animals"), Some(12));
    assert_eq!(template.match_length("/zoo/animal"), None);
    assert_eq!(template.match_length("/zoo/animals/extra"), None);
}

#[test]
fn test_parse_extracts_variables_in_occurrence_order() {
    let template = segment_template("/{first}/{second}", MatchingMode::Equals);
    let matched = template.parse("/alpha/beta").unwrap();

    assert_eq!(matched.matched_length, 11);
    assert_eq!(matched.variables[0].0.as_ref(), "first");
    assert_eq!(matched.variables[0].1, "alpha");
    assert_eq!(matched.variables[1].0.as_ref(), "second");
    assert_eq!(matched.variables[1].1, "beta");
    assert_eq!(matched.get("second"), Some("beta"));
    assert_eq!(matched.get("missing"), None);
}

#[test]
fn test_matching_mode_distinction() {
    // Prefix mode consumes the matching front of the path and reports how
    // far it got; whole-string mode rejects the same input outright.
    let prefix = segment_template("/a/{b}", MatchingMode::StartsWith);
    assert_eq!(prefix.match_length("/a/123/extra"), Some("/a/123".len()));

    let exact = segment_template("/a/{b}", MatchingMode::Equals);
    assert_eq!(exact.match_length("/a/123/extra"), None);
    assert_eq!(exact.match_length("/a/123"), Some(6));
}

#[test]
fn test_equals_mode_consumes_whole_input() {
    let template = segment_template("/pets/{id}", MatchingMode::Equals);
    let matched = template.parse("/pets/1234").unwrap();
    assert_eq!(matched.matched_length, "/pets/1234".len());
}

#[test]
fn test_repeated_variable_must_capture_identical_substrings() {
    let template = Template::new("/{a}/{a}");
    let matched = template.parse("/x/x").unwrap();
    // One capture for both occurrences.
    assert_eq!(matched.variables.len(), 1);
    assert_eq!(matched.get("a"), Some("x"));

    assert!(template.parse("/x/y").is_none());
}

#[test]
fn test_optional_variable_captures_empty_string() {
    let mut template = Template::new("/{x}");
    template.define_variable("x", Variable::default().with_required(false));

    let matched = template.parse("/").unwrap();
    assert_eq!(matched.get("x"), Some(""));
}

#[test]
fn test_required_variable_rejects_empty_capture() {
    let mut template = Template::new("/{x}");
    template.define_variable("x", Variable::default().with_required(true));
    assert!(template.parse("/").is_none());
}

#[test]
fn test_fixed_variable_matches_only_its_default() {
    let mut template = Template::new("/api/{version}");
    template.define_variable(
        "version",
        Variable::default().with_fixed(true).with_default_value("v1"),
    );

    let matched = template.parse("/api/v1").unwrap();
    assert_eq!(matched.get("version"), Some("v1"));
    assert!(template.parse("/api/v2").is_none());
}

#[test]
fn test_typed_variable_constrains_capture() {
    let mut template = Template::new("/items/{id}");
    template.define_variable("id", Variable::new(VariableType::Digit));

    assert!(template.parse("/items/123").is_some());
    assert!(template.parse("/items/12a").is_none());
}

#[test]
fn test_round_trip_parse_then_format() {
    let mut template = Template::new("/{user}/docs/{id}");
    template.define_variable("user", Variable::new(VariableType::AlphaDigit));
    template.define_variable("id", Variable::new(VariableType::AlphaDigit));

    let input = "/alice42/docs/7";
    let matched = template.parse(input).unwrap();
    let formatted = template.format(&matched);

    assert_eq!(formatted, input);
    assert!(template.parse(&formatted).is_some());
}

#[test]
fn test_format_with_map_resolver() {
    let template = Template::new("/zoo/{animal}/toys/{toy}");
    let mut values: HashMap<&str, &str> = HashMap::new();
    values.insert("animal", "lion");
    values.insert("toy", "ball");

    assert_eq!(template.format(&values), "/zoo/lion/toys/ball");
}

#[test]
fn test_format_with_closure_resolver() {
    let template = Template::new("/{scheme}://{host}");
    let resolver = FnResolver::new(|name| match name {
        "scheme" => Some("https".to_string()),
        "host" => Some("example.com".to_string()),
        _ => None,
    });

    assert_eq!(template.format(&resolver), "/https://example.com");
}

#[test]
fn test_format_falls_back_to_default_value() {
    let mut template = Template::new("/api/{version}/status");
    template.define_variable(
        "version",
        Variable::default().with_default_value("latest"),
    );

    let empty: HashMap<&str, &str> = HashMap::new();
    assert_eq!(template.format(&empty), "/api/latest/status");
}

#[test]
fn test_decoding_on_parse() {
    let mut template = Template::new("/files/{name}");
    template.define_variable(
        "name",
        Variable::new(VariableType::UriSegment).with_decoding_on_parse(true),
    );

    let matched = template.parse("/files/a%20b").unwrap();
    assert_eq!(matched.get("name"), Some("a b"));
}

#[test]
fn test_encoding_on_format() {
    let mut template = Template::new("/files/{name}");
    template.define_variable(
        "name",
        Variable::new(VariableType::UriSegment).with_encoding_on_format(true),
    );

    let mut values: HashMap<&str, &str> = HashMap::new();
    values.insert("name", "a b");
    assert_eq!(template.format(&values), "/files/a%20b");
}

#[test]
fn test_template_wide_encoding() {
    let mut template = Template::new("/{x}");
    template.set_encoding_variables(true);

    let mut values: HashMap<&str, &str> = HashMap::new();
    values.insert("x", "a/b");
    assert_eq!(template.format(&values), "/a%2Fb");
}

#[test]
fn test_variable_names_includes_duplicates_in_order() {
    let template = Template::new("/{a}/{b}/{a}");
    assert_eq!(template.variable_names(), vec!["a", "b", "a"]);
}

#[test]
fn test_set_pattern_invalidates_compilation() {
    let mut template = Template::new("/old/{id}");
    assert!(template.parse("/old/1").is_some());

    template.set_pattern("/new/{id}");
    assert!(template.parse("/old/1").is_none());
    assert!(template.parse("/new/1").is_some());
}

#[test]
fn test_shared_template_matches_concurrently() {
    use std::sync::Arc;
    use std::thread;

    let template = Arc::new(segment_template("/pets/{id}", MatchingMode::Equals));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let template = Arc::clone(&template);
            thread::spawn(move || {
                let path = format!("/pets/{i}");
                let matched = template.parse(&path).unwrap();
                assert_eq!(matched.get("id"), Some(format!("{i}").as_str()));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_adversarial_input_degrades_to_no_match() {
    // Repeated variable plus a stack of greedy captures forces the
    // backtracking engine; the backtrack limit must turn this into an
    // ordinary non-match instead of a hang or a panic.
    let template = Template::new("{a}{a}{b}{c}{d}{e}!");
    let input = "a".repeat(64);
    assert_eq!(template.match_length(&input), None);
}
