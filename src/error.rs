//! Faults raised while running validators
//!
//! A failed check is not an error in this crate: it is a message inside an
//! [`ErrorReport`]. The types here cover the other case, a validator that
//! panicked or was cancelled instead of returning. The report collected from
//! every other validator travels with the error so nothing recorded is lost.

use std::any::Any;
use std::fmt;

use crate::ErrorReport;

/// How a validator failed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The validator panicked while evaluating.
    Panicked,
    /// The validator's task was cancelled before it finished, e.g. on runtime shutdown.
    Cancelled,
}

/// A validator that did not return normally during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFault {
    /// Position of the validator in the collection handed to the driver.
    pub index: usize,
    /// Whether the validator panicked or was cancelled.
    pub kind: FaultKind,
    /// The panic payload rendered as text, or a description of the cancellation.
    pub message: String,
}

impl UnitFault {
    pub(crate) fn from_panic(index: usize, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "validator panicked with a non-string payload".to_string()
        };

        Self {
            index,
            kind: FaultKind::Panicked,
            message,
        }
    }

    #[cfg(feature = "async")]
    pub(crate) fn from_join_error(index: usize, err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            Self::from_panic(index, err.into_panic().as_ref())
        } else {
            Self {
                index,
                kind: FaultKind::Cancelled,
                message: "validator task was cancelled".to_string(),
            }
        }
    }
}

impl fmt::Display for UnitFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::Panicked => {
                write!(f, "validator #{} panicked: {}", self.index, self.message)
            }
            FaultKind::Cancelled => {
                write!(f, "validator #{} was cancelled: {}", self.index, self.message)
            }
        }
    }
}

/// Error returned by the fault-isolating drivers.
///
/// # Examples
///
/// ```
/// use fieldcheck::{from_fn, try_validate, DriverError, FaultKind, Validator};
///
/// let ok = from_fn(|errors| errors.add("name", "Name can not be blank."));
/// let broken = from_fn(|_| panic!("lookup table missing"));
///
/// match try_validate(&[&ok as &dyn Validator, &broken]) {
///     Err(DriverError::UnitsFailed { report, faults }) => {
///         assert_eq!(report.get("name"), vec!["Name can not be blank."]);
///         assert_eq!(faults[0].index, 1);
///         assert_eq!(faults[0].kind, FaultKind::Panicked);
///         assert_eq!(faults[0].message, "lookup table missing");
///     }
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// One or more validators panicked or were cancelled. `report` holds
    /// everything recorded by the run, including by the failed validators
    /// before they stopped.
    #[error("{} validator(s) failed: {}", .faults.len(), render_faults(.faults))]
    UnitsFailed {
        /// Messages collected from the run.
        report: ErrorReport,
        /// One entry per failed validator, ordered by index.
        faults: Vec<UnitFault>,
    },
}

impl DriverError {
    /// The report collected before the fault was detected.
    pub fn report(&self) -> &ErrorReport {
        match self {
            DriverError::UnitsFailed { report, .. } => report,
        }
    }

    /// Consume the error and keep only the collected report.
    pub fn into_report(self) -> ErrorReport {
        match self {
            DriverError::UnitsFailed { report, .. } => report,
        }
    }

    /// The validators that failed.
    pub fn faults(&self) -> &[UnitFault] {
        match self {
            DriverError::UnitsFailed { faults, .. } => faults,
        }
    }
}

fn render_faults(faults: &[UnitFault]) -> String {
    faults
        .iter()
        .map(UnitFault::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
