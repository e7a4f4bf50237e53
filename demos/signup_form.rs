//! Signup Form Example
//!
//! Demonstrates validating a form with fieldcheck.
//! Shows practical patterns including:
//! - Built-in field rules
//! - Ad hoc validators with `from_fn`
//! - Custom keys through a `KeyGenerator`
//! - Treating the report as an error value

use chrono::{Duration, Utc};
use fieldcheck::keys::KeyGenerator;
use fieldcheck::validators::{BytesArePresent, IntsAreEqual, TimeIsBeforeTime};
use fieldcheck::{from_fn, try_validate, validate, ErrorReport, HasErrors, Validator};

struct Signup {
    username: String,
    email: String,
    pin: i64,
    pin_confirmation: i64,
    trial_starts: chrono::DateTime<Utc>,
    trial_ends: chrono::DateTime<Utc>,
}

// ==================== Validating a form ====================

/// Example 1: Mixing built-in rules and closures
fn example_signup(form: &Signup) -> ErrorReport {
    println!("\n=== Example 1: Signup Form ===");

    let keys = KeyGenerator::new().with_key("Pin Confirmation", "pin");

    let username = BytesArePresent::new("Username", form.username.as_bytes());
    let pin = IntsAreEqual::new("Pin Confirmation", form.pin, form.pin_confirmation)
        .with_message("PINs do not match.")
        .with_keys(&keys);
    let trial = TimeIsBeforeTime::new(
        "Trial Starts",
        form.trial_starts,
        "Trial Ends",
        form.trial_ends,
    );
    let email = form.email.clone();
    let email = from_fn(move |errors| {
        if !email.contains('@') {
            errors.add("email", "Email must contain @.");
        }
        if email.len() > 64 {
            errors.add("email", "Email is too long.");
        }
    });

    let errors = validate(&[&username as &dyn Validator, &pin, &trial, &email]);

    println!("Fields with errors: {}", errors.count());
    for key in errors.keys() {
        println!("  {}: {:?}", key, errors.get(&key));
    }
    println!("JSON: {}", errors.to_json());

    errors
}

// ==================== Report as an error ====================

/// Example 2: Returning the report through `?`
fn example_as_error(form: &Signup) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Example 2: Report as Error ===");

    let errors = validate!(BytesArePresent::new("Username", form.username.as_bytes()));
    if errors.has_any() {
        return Err(Box::new(errors));
    }

    println!("Username ok");
    Ok(())
}

// ==================== Isolating faults ====================

/// Example 3: A validator that panics does not hide the others' findings
fn example_fault_isolation() {
    println!("\n=== Example 3: Fault Isolation ===");

    let healthy = BytesArePresent::new("Username", "");
    let broken = from_fn(|_| panic!("lookup service unavailable"));

    match try_validate(&[&healthy as &dyn Validator, &broken]) {
        Ok(errors) => println!("No faults: {}", errors.to_json()),
        Err(err) => {
            println!("Driver error: {}", err);
            println!("Still collected: {}", err.report().to_json());
        }
    }
}

fn main() {
    println!("Signup Form Examples");
    println!("====================");

    let now = Utc::now();
    let form = Signup {
        username: String::new(),
        email: "not-an-email".to_string(),
        pin: 1234,
        pin_confirmation: 4321,
        trial_starts: now,
        trial_ends: now - Duration::days(1),
    };

    example_signup(&form);

    if let Err(err) = example_as_error(&form) {
        println!("Rejected:\n{}", err);
    }

    example_fault_isolation();

    println!("\n=== All examples completed successfully! ===");
}
