//! Grammar conformance: exact encodings and round trips over a JSON-style corpus.

#![recursion_limit = "256"]

use serde_json::json;
use serde_qsn::{
    decode, encode, parse, parse_optional, parse_with_options, stringify, stringify_optional,
    Error, QsnMap, QsnOptions, Value,
};

fn v(json: serde_json::Value) -> Value {
    serde_json::from_value(json).unwrap()
}

fn assert_round_trip(value: &Value) -> String {
    let encoded = stringify(value).unwrap();
    assert_eq!(&parse(&encoded).unwrap(), value, "encoded as {}", encoded);
    assert_eq!(&decode(&encode(value).unwrap()).unwrap(), value);
    encoded
}

#[test]
fn test_null_and_booleans() {
    assert_eq!(assert_round_trip(&Value::Null), "!n");
    assert_eq!(assert_round_trip(&Value::Bool(true)), "!t");
    assert_eq!(assert_round_trip(&Value::Bool(false)), "!f");
}

#[test]
fn test_numbers() {
    let cases: &[(f64, &str)] = &[
        (1234567890.0, "!1234567890"),
        (0.123456789e-12, "!1.23456789e-13"),
        (-9876.54321, "!-9876.54321"),
        (23456789012e66, "!2.3456789012e76"),
        (0.0, "!0"),
        (1.0, "!1"),
        (0.5, "!0.5"),
        (98.6, "!98.6"),
        (99.44, "!99.44"),
        (1066.0, "!1066"),
        (1e1, "!10"),
        (0.1e1, "!1"),
        (1e-1, "!0.1"),
        (2.0, "!2"),
        (-42.0, "!-42"),
    ];
    for &(n, expected) in cases {
        assert_eq!(assert_round_trip(&Value::Number(n)), expected);
    }
}

#[test]
fn test_exponent_has_no_plus_sign() {
    assert_eq!(stringify(&Value::Number(1.234e25)).unwrap(), "!1.234e25");
    assert_eq!(parse("!1.234e+25").unwrap(), Value::Number(1.234e25));
}

#[test]
fn test_strings() {
    let cases = [
        "",
        ";",
        "@",
        "/",
        "|",
        "&",
        " ",
        "\"",
        "\\",
        "\u{8}\u{c}\t",
        "/ & /",
        "abcdefghijklmnopqrstuvwyz",
        "ABCDEFGHIJKLMNOPQRSTUVWYZ",
        "0123456789",
        "space character",
        "`1~!@#$%^&*()_+-={':[,]}|;.</>?",
        "\u{0123}\u{4567}\u{89AB}\u{CDEF}\u{abcd}\u{ef4A}",
        "// /* <!-- --",
        "# -- --> */",
        "@:0&@:0&@:0&:0",
        "{\"object with 1 member\":[\"array with 1 element\"]}",
        "&#34; \u{0022} %22 0x22 034 &#x22;",
        "/\\\"\u{CAFE}\u{BABE}\u{AB98}\u{FCDE}\u{bcda}\u{ef4A}\u{8}\u{c}\t`1~!@#$%^&*()_+-=[]{}|;:',./<>?",
    ];
    for s in cases {
        assert_round_trip(&Value::from(s));
    }
}

#[test]
fn test_string_encodings() {
    assert_eq!(stringify(&Value::from("")).unwrap(), "''");
    assert_eq!(stringify(&Value::from("@:0&@:0")).unwrap(), "@!:0&@!:0");
    assert_eq!(stringify(&Value::from("it's (1)")).unwrap(), "it!'s !(1!)");
    assert_eq!(stringify(&Value::from("!n")).unwrap(), "!!n");
    assert_eq!(parse("!!n").unwrap(), Value::from("!n"));
}

#[test]
fn test_arrays() {
    let cases = [
        (json!([]), "()"),
        (json!([[0]]), "((!0))"),
        (json!([[[[[0]]]]]), "(((((!0)))))"),
        (json!([[[[[[0]]]]]]), "((((((!0))))))"),
        (json!([[[[[[[[0]]]]]]]]), "((((((((!0))))))))"),
        (json!([[[[[0], 0]], 0]]), "(((((!0),!0)),!0))"),
        (json!([1, [2, [3, null]]]), "(!1,(!2,(!3,!n)))"),
        (json!([1, "two", false, null]), "(!1,two,!f,!n)"),
        (json!([null]), "(!n)"),
    ];
    for (json, expected) in cases {
        assert_eq!(assert_round_trip(&v(json)), expected);
    }
}

#[test]
fn test_deep_mixed_nesting() {
    let mut value = Value::from("leaf)");
    for i in 0..40 {
        let mut entry = QsnMap::new();
        entry.insert(
            format!("k{}:(", i),
            Value::Array(vec![value, Value::from(")!")]),
        );
        value = Value::Array(vec![Value::Object(entry), Value::from(")!"), Value::Null]);
    }

    let encoded = assert_round_trip(&value);
    assert!(encoded.starts_with("((k39!:!(:(((k38!:!(:("));
    assert!(encoded.ends_with("!n),!)!!)),!)!!,!n)"));
    assert_eq!(parse_with_options(&encoded, &QsnOptions::strict()).unwrap(), value);
}

#[test]
fn test_objects() {
    let cases = [
        (json!({}), "(:)"),
        (json!({"": ""}), "('':'')"),
        (
            json!({"a": 1, "b": "two", "c": false, "d": null}),
            "(a:!1,b:two,c:!f,d:!n)",
        ),
    ];
    for (json, expected) in cases {
        assert_eq!(assert_round_trip(&v(json)), expected);
    }
}

#[test]
fn test_mixed_empty_collections() {
    assert_eq!(assert_round_trip(&v(json!([{}, {}]))), "((:),(:))");
    assert_eq!(assert_round_trip(&v(json!([[], []]))), "((),())");
    assert_eq!(assert_round_trip(&v(json!([[], {}]))), "((),(:))");
    assert_eq!(assert_round_trip(&v(json!([{}, []]))), "((:),())");
    assert_eq!(assert_round_trip(&v(json!([{"[]": "{}"}]))), "(([]:{}))");
}

#[test]
fn test_complex_structures() {
    assert_round_trip(&v(json!({
        "foo": [2, {"bar": [4, {"baz": [6, {"deep enough": 7}]}]}]
    })));

    assert_round_trip(&v(json!({
        "num": 1,
        "alpha": "abc",
        "ignore": "me",
        "change": "to a function",
        "toUpper": true,
        "obj": {"nested_num": 50, "alpha": "abc", "nullable": null},
        "arr": [1, 7, 2]
    })));

    assert_round_trip(&v(json!([
        "JSON makeTest Pattern pass1",
        {"object with 1 member": ["array with 1 element"]},
        {},
        [],
        -42,
        true,
        false,
        null,
        {
            "integer": 1234567890,
            "real": -9876.54321,
            "e": 0.123456789e-12,
            "E": 1.23456789e34,
            "": 23456789012e66,
            "zero": 0,
            "one": 1,
            "space": " ",
            "quote": "\"",
            "backslash": "\\",
            "controls": "\u{8}\u{c}\n\r\t",
            "slash": "/ & /",
            "alpha": "abcdefghijklmnopqrstuvwyz",
            "ALPHA": "ABCDEFGHIJKLMNOPQRSTUVWYZ",
            "digit": "0123456789",
            "0123456789": "digit",
            "special": "`1~!@#$%^&*()_+-={':[,]}|;.</>?",
            "hex": "\u{0123}\u{4567}\u{89AB}\u{CDEF}\u{abcd}\u{ef4A}",
            "true": true,
            "false": false,
            "null": null,
            "array": [],
            "object": {},
            "address": "50 St. James Street",
            "url": "http://www.JSON.org/",
            "comment": "// /* <!-- --",
            "# -- --> */": " ",
            " s p a c e d ": [1, 2, 3, 4, 5, 6, 7],
            "compact": [1, 2, 3, 4, 5, 6, 7],
            "jsontext": "{\"object with 1 member\":[\"array with 1 element\"]}",
            "quotes": "&#34; \u{0022} %22 0x22 034 &#x22;",
            "/\\\"\u{CAFE}\u{BABE}\u{AB98}\u{FCDE}\u{bcda}\u{ef4A}\u{8}\u{c}\n\r\t`1~!@#$%^&*()_+-=[]{}|;:',./<>?":
                "A key can be any string"
        },
        0.5,
        98.6,
        99.44,
        1066,
        1e1,
        0.1e1,
        1e-1,
        1,
        2,
        2,
        "beans"
    ])));
}

#[test]
fn test_grammar_characters_in_keys_and_values() {
    let value = v(json!({"!key,:(": "!value,:("}));
    let encoded = assert_round_trip(&value);
    assert_eq!(encoded, "(!!key!,!:!(:!!value!,!:!()");
}

#[test]
fn test_object_order_is_preserved() {
    let value = parse("(z:!1,a:!2,m:!3)").unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_unescaped_colon_reads_as_object() {
    assert_eq!(parse("(a:b)").unwrap(), v(json!({"a": "b"})));
    assert_eq!(stringify(&v(json!(["a:b"]))).unwrap(), "(a!:b)");
    assert_eq!(parse("(a!:b)").unwrap(), v(json!(["a:b"])));
    assert_eq!(parse("(a,b:c)").unwrap(), v(json!(["a", "b:c"])));
}

#[test]
fn test_missing_value() {
    assert_eq!(stringify_optional(None).unwrap(), "");
    assert_eq!(parse_optional("").unwrap(), None);
    assert_eq!(parse(""), Err(Error::Empty));
    assert_ne!(parse("''").unwrap(), Value::Null);
}

#[test]
fn test_decoding_errors() {
    let decoding = [
        "(", "(a", "(a))", "()()", "!", "a!", "(!1,)", "(,)", "(a:!1,b)", "!1.2.3",
        "!1e999", "!-",
    ];
    for text in decoding {
        let err = parse(text).unwrap_err();
        assert!(err.is_decoding(), "{:?} gave {:?}", text, err);
    }
    assert!(matches!(parse("!1.2.3"), Err(Error::InvalidNumber { offset: 0, .. })));
    assert!(matches!(parse("(a"), Err(Error::UnbalancedBrackets { .. })));
    assert_eq!(parse("(a,b!!!)"), Err(Error::DanglingEscape { offset: 6 }));
    assert_eq!(parse("(k:v!)"), Err(Error::DanglingEscape { offset: 4 }));

    // A bare closing bracket is not a collection, so lenient mode reads it as text.
    assert_eq!(parse(")").unwrap(), Value::from(")"));
}

#[test]
fn test_encoding_errors() {
    for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = stringify(&Value::Array(vec![Value::Number(n)])).unwrap_err();
        assert!(err.is_encoding());
    }
}
