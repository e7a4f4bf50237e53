//! Testing utilities and helpers for fieldcheck
//!
//! This module provides assertion macros for inspecting an [`ErrorReport`](crate::ErrorReport)
//! and, with the `proptest` feature, an `Arbitrary` implementation for
//! generating reports in property tests.
//!
//! # Examples
//!
//! ## Assertion Macros
//!
//! ```rust
//! use fieldcheck::{assert_has_error, assert_no_errors, ErrorReport};
//!
//! let clean = ErrorReport::new();
//! assert_no_errors!(clean);
//!
//! let errors = ErrorReport::new();
//! errors.add("name", "Name can not be blank.");
//! assert_has_error!(errors, "name");
//! assert_has_error!(errors, "name", "Name can not be blank.");
//! ```

/// Assert that a report recorded nothing.
///
/// This macro will panic with the report's canonical form if any message was recorded.
///
/// # Example
///
/// ```rust
/// use fieldcheck::{assert_no_errors, validate};
///
/// let errors = validate!();
/// assert_no_errors!(errors);
/// ```
#[macro_export]
macro_rules! assert_no_errors {
    ($report:expr) => {
        match &$report {
            report => {
                if $crate::HasErrors::has_any(report) {
                    panic!("Expected no errors, got: {}", report.to_json());
                }
            }
        }
    };
}

/// Assert that a report holds messages under a key.
///
/// With a third argument, also assert that the exact message is among them.
///
/// # Example
///
/// ```rust
/// use fieldcheck::{assert_has_error, ErrorReport};
///
/// let errors = ErrorReport::new();
/// errors.add("age", "Must be 18 or older");
/// assert_has_error!(errors, "age");
/// assert_has_error!(errors, "age", "Must be 18 or older");
/// ```
#[macro_export]
macro_rules! assert_has_error {
    ($report:expr, $key:expr) => {
        match &$report {
            report => {
                let key: &str = $key;
                if report.get(key).is_empty() {
                    panic!(
                        "Expected errors under {:?}, got: {}",
                        key,
                        report.to_json()
                    );
                }
            }
        }
    };
    ($report:expr, $key:expr, $message:expr) => {
        match &$report {
            report => {
                let key: &str = $key;
                let message: &str = $message;
                let messages = report.get(key);
                if !messages.iter().any(|m| m == message) {
                    panic!(
                        "Expected {:?} under {:?}, got: {:?}",
                        message, key, messages
                    );
                }
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::ErrorReport {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(("[a-z]{1,8}", "[ -~]{0,24}"), 0..16)
            .prop_map(|pairs: Vec<(String, String)>| pairs.into_iter().collect::<Self>())
            .boxed()
    }
}
