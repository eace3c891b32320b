use serde_qsn::escape::needs_escape;
use serde_qsn::{qsn, stringify, QsnMap, Value};

#[test]
fn test_qsn_macro_null() {
    let value = qsn!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn test_qsn_macro_booleans() {
    assert_eq!(qsn!(true), Value::Bool(true));
    assert_eq!(qsn!(false), Value::Bool(false));
}

#[test]
fn test_qsn_macro_numbers() {
    assert_eq!(qsn!(42), Value::Number(42.0));
    assert_eq!(qsn!(3.5), Value::Number(3.5));
    assert_eq!(qsn!(-123), Value::Number(-123.0));
    assert_eq!(qsn!([(-1), 2]), Value::Array(vec![Value::Number(-1.0), Value::Number(2.0)]));
}

#[test]
fn test_qsn_macro_strings() {
    assert_eq!(qsn!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(qsn!(""), Value::String("".to_string()));
}

#[test]
fn test_qsn_macro_arrays() {
    assert_eq!(qsn!([]), Value::Array(vec![]));

    let mixed_array = qsn!([1, "hello", true, null]);
    assert_eq!(
        mixed_array,
        Value::Array(vec![
            Value::Number(1.0),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );
    assert_eq!(stringify(&mixed_array).unwrap(), "(!1,hello,!t,!n)");
}

#[test]
fn test_qsn_macro_objects() {
    assert_eq!(qsn!({}), Value::Object(QsnMap::new()));

    let simple_object = qsn!({
        "name": "Alice",
        "age": 30
    });

    match simple_object {
        Value::Object(ref obj) => {
            assert_eq!(obj.len(), 2);
            assert_eq!(obj.get("name"), Some(&Value::String("Alice".to_string())));
            assert_eq!(obj.get("age"), Some(&Value::Number(30.0)));
        }
        _ => panic!("Expected object"),
    }
}

#[test]
fn test_qsn_macro_nested() {
    let nested = qsn!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    if let Some(Value::Object(user)) = nested.get("user") {
        assert_eq!(user.get("id"), Some(&Value::Number(123.0)));
        assert_eq!(user.get("active"), Some(&Value::Bool(true)));
    } else {
        panic!("Expected user to be an object");
    }

    assert_eq!(
        stringify(&nested).unwrap(),
        "(user:(id:!123,name:Bob,active:!t),tags:(admin,developer),count:!42)"
    );
}

#[test]
fn test_value_methods() {
    let null_val = qsn!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_number());
    assert!(!null_val.is_string());
    assert!(!null_val.is_array());
    assert!(!null_val.is_object());

    let bool_val = qsn!(true);
    assert_eq!(bool_val.as_bool(), Some(true));

    let str_val = qsn!("hello");
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = qsn!([1, 2, 3]);
    assert_eq!(array_val.as_array().map(Vec::len), Some(3));

    let obj_val = qsn!({"key": "value"});
    assert_eq!(obj_val.as_object().map(QsnMap::len), Some(1));
}

#[test]
fn test_escaping_needs() {
    assert!(!needs_escape("hello"));
    assert!(needs_escape("hello,world"));
    assert!(needs_escape("key:value"));
    assert!(needs_escape("(x)"));
    assert!(needs_escape("it's"));
    assert!(needs_escape("wow!"));

    // Literal-looking strings are unambiguous without escaping.
    assert!(!needs_escape("true"));
    assert!(!needs_escape("123"));
    assert!(!needs_escape("null"));
}
