//! Built-in field rules
//!
//! Each rule captures a field name, the value(s) it checks and an optional
//! custom message, then records at most one message when evaluated. Messages are
//! keyed by [`to_underscore`](crate::keys::to_underscore) of the field name unless
//! an explicit key is set with `with_key` or resolved through a
//! [`KeyGenerator`](crate::keys::KeyGenerator) with `with_keys`.
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use fieldcheck::validate;
//! use fieldcheck::validators::{BytesArePresent, IntsAreEqual, TimeIsBeforeTime};
//!
//! let now = Utc::now();
//! let errors = validate!(
//!     BytesArePresent::new("Name", b"Mark"),
//!     IntsAreEqual::new("Number", 1, 2),
//!     TimeIsBeforeTime::new("Opens At", now, "Closes At", now - Duration::hours(1)),
//! );
//!
//! assert_eq!(errors.get("number"), vec!["1 is not equal to 2"]);
//! assert_eq!(errors.get("opens_at"), vec!["Opens At must be before Closes At."]);
//! assert!(errors.get("name").is_empty());
//! ```

mod bytes_are_present;
mod ints_are_equal;
mod time_is_before_time;

pub use bytes_are_present::BytesArePresent;
pub use ints_are_equal::IntsAreEqual;
pub use time_is_before_time::TimeIsBeforeTime;

use crate::keys::to_underscore;

fn field_key(name: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => key.to_string(),
        None => to_underscore(name),
    }
}
