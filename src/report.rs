//! Keyed error report shared by concurrently running validators
//!
//! This module provides the `ErrorReport` type, a thread-safe multi-map from a field
//! key to the messages recorded against it. Every validator in a run receives a shared
//! reference to the same report and records problems through [`ErrorReport::add`].
//!
//! # Examples
//!
//! ## Recording messages
//!
//! ```
//! use fieldcheck::ErrorReport;
//!
//! let errors = ErrorReport::new();
//! errors.add("email", "Email can not be blank.");
//! errors.add("email", "Email must contain @.");
//! errors.add("age", "Age must be 18 or older.");
//!
//! assert_eq!(errors.count(), 2);
//! assert_eq!(errors.get("email"), vec!["Email can not be blank.", "Email must contain @."]);
//! ```
//!
//! ## Canonical form
//!
//! ```
//! use fieldcheck::ErrorReport;
//!
//! let errors = ErrorReport::new();
//! errors.add("v1", "there's an error with v1");
//!
//! assert_eq!(errors.to_json(), r#"{"errors":{"v1":["there's an error with v1"]}}"#);
//! ```
//!
//! ## As an error value
//!
//! ```
//! use fieldcheck::ErrorReport;
//!
//! let errors = ErrorReport::new();
//! errors.add("a", "first");
//! errors.add("b", "second");
//!
//! let err: Box<dyn std::error::Error> = Box::new(errors);
//! assert_eq!(err.to_string(), "first\nsecond");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

type ErrorMap = BTreeMap<String, Vec<String>>;

/// Messages collected during a validation run, grouped by field key
///
/// The map lives behind a private mutex, so the only way to mutate a report is
/// through [`add`](ErrorReport::add) and the operations built on it. Keys iterate
/// in sorted order.
///
/// A report with at least one message is also an error value: its
/// [`Display`](fmt::Display) output is every message joined by `\n`, without keys.
///
/// # Examples
///
/// ```
/// use fieldcheck::{ErrorReport, HasErrors};
///
/// let errors = ErrorReport::new();
/// assert!(!errors.has_any());
///
/// errors.add("name", "Name can not be blank.");
/// assert!(errors.has_any());
/// assert_eq!(errors.keys(), vec!["name"]);
/// ```
#[derive(Default)]
pub struct ErrorReport {
    errors: Mutex<ErrorMap>,
}

impl ErrorReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ErrorMap> {
        // A validator that panicked mid-run must not stop the others from recording.
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `message` to the messages stored under `key`.
    ///
    /// Safe to call from many threads at once. Calls made in sequence by one
    /// thread keep their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldcheck::ErrorReport;
    ///
    /// let errors = ErrorReport::new();
    /// errors.add("k", "m1");
    /// errors.add("k", "m2");
    /// assert_eq!(errors.get("k"), vec!["m1", "m2"]);
    /// ```
    pub fn add(&self, key: impl Into<String>, message: impl Into<String>) {
        self.lock()
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    /// Replay every message of `other` into this report.
    ///
    /// Equivalent to calling [`add`](ErrorReport::add) for each key/message pair
    /// of `other`, so it is not atomic as a whole. Meant for combining reports
    /// whose runs have already finished.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldcheck::ErrorReport;
    ///
    /// let first = ErrorReport::new();
    /// first.add("name", "Name can not be blank.");
    ///
    /// let second = ErrorReport::new();
    /// second.add("name", "Name is too short.");
    /// second.add("age", "Age must be positive.");
    ///
    /// first.merge(&second);
    /// assert_eq!(first.count(), 2);
    /// assert_eq!(first.get("name").len(), 2);
    /// ```
    pub fn merge(&self, other: &ErrorReport) {
        for (key, messages) in other.snapshot() {
            for message in messages {
                self.add(key.clone(), message);
            }
        }
    }

    /// Messages recorded under `key`, or an empty vector when there are none.
    pub fn get(&self, key: &str) -> Vec<String> {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    /// Number of distinct keys with at least one message.
    ///
    /// This counts keys, not messages; see [`message_count`](ErrorReport::message_count).
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Total number of messages across every key.
    pub fn message_count(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Every key that currently holds messages.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// A copy of the full key → messages map as it is right now.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.lock().clone()
    }

    /// Consume the report and return the underlying map.
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize the report to its canonical JSON form, `{"errors":{key:[messages]}}`.
    pub fn to_json(&self) -> String {
        // A map of strings has no way to fail serialization.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Presence check for anything that may or may not carry validation errors.
///
/// Implemented for [`ErrorReport`], references to implementors and `Option`s of
/// implementors, so an absent report answers `false` instead of needing a match.
///
/// # Examples
///
/// ```
/// use fieldcheck::{ErrorReport, HasErrors};
///
/// let missing: Option<ErrorReport> = None;
/// assert!(!missing.has_any());
///
/// let errors = ErrorReport::new();
/// errors.add("k", "m");
/// assert!(Some(&errors).has_any());
/// ```
pub trait HasErrors {
    /// Returns `true` if at least one message has been recorded.
    fn has_any(&self) -> bool;
}

impl HasErrors for ErrorReport {
    fn has_any(&self) -> bool {
        self.count() > 0
    }
}

impl<T: HasErrors + ?Sized> HasErrors for &T {
    fn has_any(&self) -> bool {
        (**self).has_any()
    }
}

impl<T: HasErrors> HasErrors for Option<T> {
    fn has_any(&self) -> bool {
        self.as_ref().is_some_and(HasErrors::has_any)
    }
}

impl Clone for ErrorReport {
    fn clone(&self) -> Self {
        Self {
            errors: Mutex::new(self.snapshot()),
        }
    }
}

impl PartialEq for ErrorReport {
    fn eq(&self, other: &Self) -> bool {
        // Locking the same mutex twice would deadlock.
        std::ptr::eq(self, other) || self.snapshot() == other.snapshot()
    }
}

impl Eq for ErrorReport {}

impl fmt::Debug for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReport")
            .field("errors", &*self.lock())
            .finish()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.lock();
        let mut messages = errors.values().flatten();

        if let Some(first) = messages.next() {
            f.write_str(first)?;
        }
        for message in messages {
            write!(f, "\n{}", message)?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

#[derive(Serialize)]
struct ReportRef<'a> {
    errors: &'a ErrorMap,
}

#[derive(Deserialize)]
struct ReportOwned {
    errors: ErrorMap,
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let errors = self.lock();
        ReportRef { errors: &*errors }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ReportOwned { errors } = ReportOwned::deserialize(deserializer)?;
        Ok(errors
            .into_iter()
            .flat_map(|(key, messages)| messages.into_iter().map(move |m| (key.clone(), m)))
            .collect())
    }
}

impl<K: Into<String>, M: Into<String>> Extend<(K, M)> for ErrorReport {
    fn extend<I: IntoIterator<Item = (K, M)>>(&mut self, iter: I) {
        let errors = self.errors.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (key, message) in iter {
            errors.entry(key.into()).or_default().push(message.into());
        }
    }
}

impl<K: Into<String>, M: Into<String>> FromIterator<(K, M)> for ErrorReport {
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut report = ErrorReport::new();
        report.extend(iter);
        report
    }
}
