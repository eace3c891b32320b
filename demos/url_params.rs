//! Carrying structured state in a query string.
//!
//! Run with: cargo run --example url_params

use serde::{Deserialize, Serialize};
use serde_qsn::uri::{decode_component, encode_component};
use serde_qsn::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Order {
    Newest,
    Price { descending: bool },
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ListingState {
    query: String,
    categories: Vec<String>,
    price: Option<(f64, f64)>,
    order: Order,
    page: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let state = ListingState {
        query: "blue shoes".to_string(),
        categories: vec!["men".to_string(), "running/trail".to_string()],
        price: Some((25.0, 99.99)),
        order: Order::Price { descending: true },
        page: 2,
    };

    let component = encode_component(&to_string(&state)?);
    let url = format!("https://shop.example.com/list?state={}", component);
    println!("URL:\n  {}\n", url);

    let param = url
        .split_once("state=")
        .map(|(_, param)| param)
        .ok_or("missing state parameter")?;
    let state_back: ListingState = from_str(&decode_component(param)?)?;
    assert_eq!(state, state_back);
    println!("✓ Restored state: {:?}", state_back);

    Ok(())
}
