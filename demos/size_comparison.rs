//! QSN vs percent-encoded JSON inside a URL.
//!
//! Run with: cargo run --example size_comparison

use serde::Serialize;
use serde_qsn::uri::encode_component;
use std::error::Error;

#[derive(Debug, Serialize)]
struct Column {
    field: String,
    width: u32,
    visible: bool,
}

#[derive(Debug, Serialize)]
struct TableView {
    columns: Vec<Column>,
    sort: Vec<(String, String)>,
    filter: Option<String>,
    page_size: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let view = TableView {
        columns: vec![
            Column {
                field: "name".to_string(),
                width: 240,
                visible: true,
            },
            Column {
                field: "created_at".to_string(),
                width: 120,
                visible: false,
            },
        ],
        sort: vec![("name".to_string(), "asc".to_string())],
        filter: Some("status:open".to_string()),
        page_size: 50,
    };

    let json = encode_component(&serde_json::to_string(&view)?);
    let qsn = encode_component(&serde_qsn::to_string(&view)?);

    println!("JSON in URL ({} bytes):\n  {}\n", json.len(), json);
    println!("QSN in URL ({} bytes):\n  {}\n", qsn.len(), qsn);

    let savings = 100.0 * (1.0 - qsn.len() as f64 / json.len() as f64);
    println!("QSN is {:.0}% shorter", savings);

    Ok(())
}
