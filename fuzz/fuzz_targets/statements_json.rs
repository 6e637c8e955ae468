//! Statement document fuzzer.
//!
//! Tests that loading a statement collection from arbitrary JSON never panics,
//! and that any document that loads survives a write/load round trip.

use honggfuzz::fuzz;
use sql_template_rs::SqlStatements;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(json) = std::str::from_utf8(data) else {
                return;
            };
            let Ok(statements) = SqlStatements::from_json(json) else {
                return;
            };
            let written = statements.to_json().expect("Failed to write loaded document");
            let reloaded = SqlStatements::from_json(&written).expect("Failed to reload document");
            assert!(statements.iter().eq(reloaded.iter()));
        });
    }
}
