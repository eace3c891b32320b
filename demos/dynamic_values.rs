//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_qsn::{from_value, parse, to_value, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Parse text whose shape is only known at runtime
    let config = parse("(host:localhost,port:!8080,features:(auth,logging),debug:!t)")?;
    println!("Parsed config: {:?}\n", config);

    // Access values dynamically
    if let Some(Value::String(host)) = config.get("host") {
        println!("Accessing field 'host': {}", host);
    }

    if let Some(port) = config.get("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}", port);
    }

    if let Some(features) = config.get("features").and_then(Value::as_array) {
        println!("Accessing field 'features': {} items\n", features.len());
    }

    // Convert existing struct to Value and back
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as QSN: {}\n", user_value);

    let user_back: User = from_value(user_value.clone())?;
    println!("User back: {:?}\n", user_back);

    // Runtime type checking
    println!("Type checks:");
    println!("  kind:      {}", user_value.kind());
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());

    Ok(())
}
