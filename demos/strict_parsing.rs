//! Lenient and strict decoding, depth limits and error reporting.
//!
//! Run with: cargo run --example strict_parsing

use serde_qsn::{parse, parse_with_options, QsnOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let strict = QsnOptions::strict();

    // Hand-written input the encoder would never produce
    for text in ["a!b", "(k:!1,k:!2)", "x(y)"] {
        println!("{:>12} lenient -> {:?}", text, parse(text)?);
        match parse_with_options(text, &strict) {
            Ok(value) => println!("{:>12} strict  -> {:?}", text, value),
            Err(e) => println!("{:>12} strict  -> error: {}", text, e),
        }
    }
    println!();

    // Untrusted input with a nesting budget
    let limited = QsnOptions::new().with_max_depth(4);
    let deep = format!("{}!0{}", "(".repeat(10), ")".repeat(10));
    if let Err(e) = parse_with_options(&deep, &limited) {
        println!("Depth limit: {}\n", e);
    }

    // Decoding errors report the byte offset into the input
    for text in ["(a:!1,b:(!2,!3)", "(x,!1.2.3)", "(a:!1,b)", "tail!"] {
        if let Err(e) = parse(text) {
            println!("{:?}: {} (offset {:?})", text, e, e.offset());
        }
    }

    Ok(())
}
