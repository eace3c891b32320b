/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// ```rust
/// use serde_qsn::qsn;
///
/// let value = qsn!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "score": (-1.5),
///     "extra": null
/// });
/// assert_eq!(value.to_string(), "(name:Alice,tags:(a,b),score:!-1.5,extra:!n)");
/// ```
///
/// Elements and values are single token trees, so negative numbers and other
/// compound expressions need parentheses.
#[macro_export]
macro_rules! qsn {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::qsn!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::QsnMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::QsnMap::new();
        $(
            object.insert($key.to_string(), $crate::qsn!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression goes through `Serialize`.
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
