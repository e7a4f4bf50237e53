//! Async Signup Example
//!
//! Demonstrates running validators from async code with `validate_async`.
//! Validators that do blocking lookups run on the tokio blocking pool.

use std::sync::Arc;
use std::time::Duration;

use fieldcheck::validators::BytesArePresent;
use fieldcheck::{from_fn, validate_async, Validator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Driver events show up when built with the `tracing` feature.
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    println!("Async Signup Example");
    println!("====================");

    let taken = vec!["admin".to_string(), "root".to_string()];
    let username = "admin".to_string();

    let units: Vec<Arc<dyn Validator>> = vec![
        Arc::new(BytesArePresent::new("Username", username.as_bytes())),
        Arc::new(from_fn(move |errors| {
            // Stand-in for a blocking database lookup.
            std::thread::sleep(Duration::from_millis(20));
            if taken.contains(&username) {
                errors.add("username", "Username is already taken.");
            }
        })),
    ];

    let errors = validate_async(units).await?;
    println!("{}", errors.to_json());

    Ok(())
}
