//! The validator capability
//!
//! A validator is anything that can inspect its own captured data and record
//! problems into a shared [`ErrorReport`]. The drivers in [`crate::driver`] only
//! ever see this trait, so new field rules plug in without touching them.
//!
//! # Examples
//!
//! ## Named validator
//!
//! ```
//! use fieldcheck::{validate, ErrorReport, Validator};
//!
//! struct Adult {
//!     age: u32,
//! }
//!
//! impl Validator for Adult {
//!     fn is_valid(&self, errors: &ErrorReport) {
//!         if self.age < 18 {
//!             errors.add("age", "Must be 18 or older");
//!         }
//!     }
//! }
//!
//! let errors = validate(&[&Adult { age: 12 }]);
//! assert_eq!(errors.get("age"), vec!["Must be 18 or older"]);
//! ```
//!
//! ## Ad hoc validator
//!
//! ```
//! use fieldcheck::{from_fn, validate};
//!
//! let password = String::from("hunter2");
//! let long_enough = from_fn(move |errors| {
//!     if password.len() < 8 {
//!         errors.add("password", "Password is too short.");
//!     }
//! });
//!
//! assert!(validate(&[&long_enough]).get("password").len() == 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::ErrorReport;

/// A single check that records its findings into a shared report.
///
/// Implementations receive a shared reference and may call
/// [`ErrorReport::add`] any number of times. They must return once done; the
/// driver waits for every validator before handing the report back.
///
/// `Send + Sync` is required because each validator is evaluated on its own thread.
pub trait Validator: Send + Sync {
    /// Inspect the captured data and record any problems into `errors`.
    fn is_valid(&self, errors: &ErrorReport);
}

impl<V: Validator + ?Sized> Validator for &V {
    fn is_valid(&self, errors: &ErrorReport) {
        (**self).is_valid(errors)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn is_valid(&self, errors: &ErrorReport) {
        (**self).is_valid(errors)
    }
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn is_valid(&self, errors: &ErrorReport) {
        (**self).is_valid(errors)
    }
}

/// A closure wrapped as a [`Validator`].
///
/// Created by [`from_fn`].
#[derive(Clone, Copy)]
pub struct ValidatorFn<F> {
    f: F,
}

impl<F> Validator for ValidatorFn<F>
where
    F: Fn(&ErrorReport) + Send + Sync,
{
    #[inline]
    fn is_valid(&self, errors: &ErrorReport) {
        (self.f)(errors)
    }
}

impl<F> fmt::Debug for ValidatorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFn").finish_non_exhaustive()
    }
}

/// Wrap any `Fn(&ErrorReport)` as a [`Validator`].
///
/// # Example
///
/// ```rust
/// use fieldcheck::{from_fn, ErrorReport, Validator};
///
/// let v = from_fn(|errors| errors.add("k", "m"));
/// let errors = ErrorReport::new();
/// v.is_valid(&errors);
/// assert_eq!(errors.get("k"), vec!["m"]);
/// ```
pub fn from_fn<F>(f: F) -> ValidatorFn<F>
where
    F: Fn(&ErrorReport) + Send + Sync,
{
    ValidatorFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails(&'static str);

    impl Validator for AlwaysFails {
        fn is_valid(&self, errors: &ErrorReport) {
            errors.add(self.0, format!("there's an error with {}", self.0));
        }
    }

    #[test]
    fn test_from_fn_records() {
        let errors = ErrorReport::new();
        from_fn(|e| {
            e.add("k", "m1");
            e.add("k", "m2");
        })
        .is_valid(&errors);

        assert_eq!(errors.get("k"), vec!["m1", "m2"]);
    }

    #[test]
    fn test_from_fn_without_findings() {
        let errors = ErrorReport::new();
        from_fn(|_| {}).is_valid(&errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_blanket_impls_delegate() {
        let errors = ErrorReport::new();

        let by_ref = &AlwaysFails("a");
        let boxed: Box<dyn Validator> = Box::new(AlwaysFails("b"));
        let shared: Arc<dyn Validator> = Arc::new(AlwaysFails("c"));

        by_ref.is_valid(&errors);
        boxed.is_valid(&errors);
        shared.is_valid(&errors);

        assert_eq!(errors.keys(), vec!["a", "b", "c"]);
    }
}
