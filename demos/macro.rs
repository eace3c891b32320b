//! Using the qsn! macro for dynamic value construction.
//!
//! Run with: cargo run --example macro

use serde_qsn::{qsn, stringify, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let null_val = qsn!(null);
    let bool_val = qsn!(true);
    let number = qsn!(1.5e-9);
    let text = qsn!("Hello, QSN!");

    println!("Primitives:");
    println!("  null:   {}", stringify(&null_val)?);
    println!("  bool:   {}", stringify(&bool_val)?);
    println!("  number: {}", stringify(&number)?);
    println!("  text:   {}\n", stringify(&text)?);

    let numbers = qsn!([1, 2, 3, 4, 5]);
    let mixed = qsn!([1, "two", true, null, [], {}]);

    println!("Arrays:");
    println!("  Numbers: {}", stringify(&numbers)?);
    println!("  Mixed:   {}\n", stringify(&mixed)?);

    let config = qsn!({
        "app": {
            "name": "MyApp",
            "version": "1.0.0"
        },
        "database": {
            "host": "localhost",
            "port": 5432
        },
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Nested structures:");
    println!("{}\n", stringify(&config)?);

    let items = vec![
        qsn!({"id": 1, "status": "active"}),
        qsn!({"id": 2, "status": "pending"}),
    ];

    let summary = qsn!({
        "total": 2,
        "items": items
    });

    println!("Dynamic construction:");
    println!("{}\n", stringify(&summary)?);

    if let Some(Value::Object(app)) = config.get("app") {
        if let Some(name) = app.get("name").and_then(Value::as_str) {
            println!("Accessing values:");
            println!("  App name: {}", name);
        }
    }

    Ok(())
}
