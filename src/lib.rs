//! # fieldcheck
//!
//! Run independent field validators in parallel and collect every error into
//! one keyed report.
//!
//! ## Model
//!
//! - [`ErrorReport`] is a thread-safe map from field key to messages.
//! - [`Validator`] is anything that inspects its data and records into a report.
//! - [`validate()`] runs each validator on its own thread against one fresh report,
//!   waits for all of them, and returns the report.
//!
//! Checks never stop the run: every validator executes and every finding is kept.
//!
//! ## Quick Example
//!
//! ```rust
//! use fieldcheck::validators::{BytesArePresent, IntsAreEqual};
//! use fieldcheck::{from_fn, validate, HasErrors};
//!
//! let email = String::from("not-an-email");
//! let errors = validate!(
//!     BytesArePresent::new("Name", b""),
//!     IntsAreEqual::new("Password Confirmation", 1234, 1243)
//!         .with_message("Passwords do not match."),
//!     from_fn(move |errors| {
//!         if !email.contains('@') {
//!             errors.add("email", "Email must contain @.");
//!         }
//!     }),
//! );
//!
//! assert!(errors.has_any());
//! assert_eq!(errors.count(), 3);
//! assert_eq!(errors.get("name"), vec!["Name can not be blank."]);
//! assert_eq!(errors.get("password_confirmation"), vec!["Passwords do not match."]);
//! ```
//!
//! ## Features
//!
//! - `async` - `validate_async` on the tokio blocking pool
//! - `tracing` - debug/error events from the drivers
//! - `proptest` - `Arbitrary` for [`ErrorReport`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod driver;
pub mod error;
pub mod keys;
pub mod report;
pub mod testing;
pub mod validator;
pub mod validators;

// Re-exports
#[cfg(feature = "async")]
pub use driver::validate_async;
pub use driver::{try_validate, validate};
pub use error::{DriverError, FaultKind, UnitFault};
pub use keys::KeyGenerator;
pub use report::{ErrorReport, HasErrors};
pub use validator::{from_fn, Validator, ValidatorFn};

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "async")]
    pub use crate::driver::validate_async;
    pub use crate::driver::{try_validate, validate};
    pub use crate::error::{DriverError, FaultKind, UnitFault};
    pub use crate::keys::KeyGenerator;
    pub use crate::report::{ErrorReport, HasErrors};
    pub use crate::validator::{from_fn, Validator, ValidatorFn};
}
