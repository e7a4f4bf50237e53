//! Concurrent validation drivers.
//!
//! This module provides functions for running validators in parallel:
//! - `validate` - Run all validators, re-raise a validator panic after joining
//! - `try_validate` - Run all validators, report panics as a [`DriverError`]
//! - `validate_async` - Same as `try_validate` on the tokio blocking pool (feature `async`)
//! - `validate!` - Macro form of `validate` taking validators by value
//!
//! Every driver creates one fresh [`ErrorReport`], evaluates each validator on its
//! own thread against that report, waits for all of them and returns it. There is no
//! ordering between validators, and no timeout or cancellation: wrap the call if a
//! deadline is needed.
//!
//! If the OS refuses to start a thread, the blocking drivers run that validator on
//! the calling thread after the others have been started, so every validator is
//! still evaluated exactly once.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::error::{DriverError, UnitFault};
use crate::{ErrorReport, Validator};

type Panics = Vec<(usize, Box<dyn Any + Send + 'static>)>;

/// Run every validator concurrently and return the collected report.
///
/// Blocks until all validators have finished. If any validator panics, the
/// remaining ones still run to completion, then the first panic (by slice
/// position) is resumed on the calling thread. Use [`try_validate`] to get the
/// panic back as a value instead.
///
/// # Example
///
/// ```rust
/// use fieldcheck::{from_fn, validate, HasErrors, Validator};
///
/// let v1 = from_fn(|errors| errors.add("v1", "there's an error with v1"));
/// let v2 = from_fn(|errors| errors.add("v2", "there's an error with v2"));
///
/// let errors = validate(&[&v1 as &dyn Validator, &v2]);
/// assert_eq!(errors.count(), 2);
/// assert!(errors.has_any());
/// ```
pub fn validate(units: &[&dyn Validator]) -> ErrorReport {
    let (errors, panics) = run_with(units, &OsThreads);

    if let Some((_, payload)) = panics.into_iter().next() {
        std::panic::resume_unwind(payload);
    }

    errors
}

/// Run every validator concurrently, isolating panics.
///
/// Returns `Ok(report)` when every validator returned normally. When one or
/// more panicked, returns [`DriverError::UnitsFailed`] holding the report
/// collected from the whole run together with one [`UnitFault`] per panic.
/// A validator that could not get its own thread runs on the calling thread
/// and its panic is reported the same way.
///
/// # Example
///
/// ```rust
/// use fieldcheck::{from_fn, try_validate, Validator};
///
/// let check = from_fn(|errors| errors.add("name", "Name can not be blank."));
/// let errors = try_validate(&[&check as &dyn Validator]).unwrap();
/// assert_eq!(errors.get("name"), vec!["Name can not be blank."]);
/// ```
pub fn try_validate(units: &[&dyn Validator]) -> Result<ErrorReport, DriverError> {
    let (errors, panics) = run_with(units, &OsThreads);

    if panics.is_empty() {
        return Ok(errors);
    }

    let faults = panics
        .iter()
        .map(|(index, payload)| UnitFault::from_panic(*index, payload.as_ref()))
        .collect();

    Err(DriverError::UnitsFailed {
        report: errors,
        faults,
    })
}

/// Starts the thread a single validator runs on.
trait SpawnUnit {
    fn spawn<'scope, 'env, F>(
        &self,
        scope: &'scope thread::Scope<'scope, 'env>,
        index: usize,
        job: F,
    ) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>
    where
        F: FnOnce() + Send + 'scope;
}

/// One named OS thread per validator.
#[derive(Debug, Clone, Copy)]
struct OsThreads;

impl SpawnUnit for OsThreads {
    fn spawn<'scope, 'env, F>(
        &self,
        scope: &'scope thread::Scope<'scope, 'env>,
        index: usize,
        job: F,
    ) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>
    where
        F: FnOnce() + Send + 'scope,
    {
        thread::Builder::new()
            .name(format!("fieldcheck-unit-{index}"))
            .spawn_scoped(scope, job)
    }
}

fn run_with<S: SpawnUnit>(units: &[&dyn Validator], spawner: &S) -> (ErrorReport, Panics) {
    let errors = ErrorReport::new();
    if units.is_empty() {
        return (errors, Vec::new());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(units = units.len(), "running validators");

    let shared = &errors;
    let mut panics: Panics = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(units.len());
        let mut refused = Vec::new();

        // Each thread owns its own copy of the unit reference.
        for (index, unit) in units.iter().copied().enumerate() {
            match spawner.spawn(scope, index, move || unit.is_valid(shared)) {
                Ok(handle) => handles.push((index, handle)),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(index, error = %_err, "could not spawn validator thread, running inline");
                    refused.push((index, unit));
                }
            }
        }

        let mut panics: Panics = refused
            .into_iter()
            .filter_map(|(index, unit)| {
                panic::catch_unwind(AssertUnwindSafe(|| unit.is_valid(shared)))
                    .err()
                    .map(|payload| (index, payload))
            })
            .collect();

        panics.extend(
            handles
                .into_iter()
                .filter_map(|(index, handle)| handle.join().err().map(|payload| (index, payload))),
        );
        panics
    });
    panics.sort_by_key(|(index, _)| *index);

    #[cfg(feature = "tracing")]
    {
        for (index, payload) in &panics {
            let fault = UnitFault::from_panic(*index, payload.as_ref());
            tracing::error!(index = fault.index, reason = %fault.message, "validator panicked");
        }
        tracing::debug!(
            keys = errors.count(),
            panicked = panics.len(),
            "validators finished"
        );
    }

    (errors, panics)
}

/// Run every validator on the tokio blocking pool, isolating panics.
///
/// The async counterpart of [`try_validate`]. Validators are owned (`Arc`) because
/// blocking tasks must be `'static`. Must be called from within a tokio runtime.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fieldcheck::{from_fn, validate_async, Validator};
///
/// # tokio_test::block_on(async {
/// let units: Vec<Arc<dyn Validator>> = vec![
///     Arc::new(from_fn(|errors| errors.add("v1", "there's an error with v1"))),
///     Arc::new(from_fn(|errors| errors.add("v2", "there's an error with v2"))),
/// ];
///
/// let errors = validate_async(units).await.unwrap();
/// assert_eq!(errors.count(), 2);
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn validate_async(
    units: Vec<std::sync::Arc<dyn Validator>>,
) -> Result<ErrorReport, DriverError> {
    use std::sync::Arc;

    if units.is_empty() {
        return Ok(ErrorReport::new());
    }
    let errors = Arc::new(ErrorReport::new());

    #[cfg(feature = "tracing")]
    tracing::debug!(units = units.len(), "running validators on blocking pool");

    let tasks: Vec<_> = units
        .into_iter()
        .map(|unit| {
            let errors = Arc::clone(&errors);
            tokio::task::spawn_blocking(move || unit.is_valid(&errors))
        })
        .collect();

    let faults: Vec<UnitFault> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .enumerate()
        .filter_map(|(index, joined)| {
            joined
                .err()
                .map(|join_err| UnitFault::from_join_error(index, join_err))
        })
        .collect();

    #[cfg(feature = "tracing")]
    for fault in &faults {
        tracing::error!(index = fault.index, reason = %fault.message, "validator task failed");
    }

    // Every task has been joined, so no other handle to the report remains.
    let report = Arc::try_unwrap(errors).unwrap_or_else(|shared| (*shared).clone());

    if faults.is_empty() {
        Ok(report)
    } else {
        Err(DriverError::UnitsFailed { report, faults })
    }
}

/// Run validators given by value, as [`validate()`] does.
///
/// # Example
///
/// ```rust
/// use fieldcheck::validators::{BytesArePresent, IntsAreEqual};
///
/// let errors = fieldcheck::validate!(
///     BytesArePresent::new("Name", b""),
///     IntsAreEqual::new("Number", 1, 2),
/// );
/// assert_eq!(errors.count(), 2);
/// ```
#[macro_export]
macro_rules! validate {
    ($($unit:expr),* $(,)?) => {
        $crate::validate(&[$(&$unit as &dyn $crate::Validator),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_fn, HasErrors};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    struct V1;

    impl Validator for V1 {
        fn is_valid(&self, errors: &ErrorReport) {
            errors.add("v1", "there's an error with v1");
        }
    }

    struct V2;

    impl Validator for V2 {
        fn is_valid(&self, errors: &ErrorReport) {
            errors.add("v2", "there's an error with v2");
        }
    }

    #[test]
    fn test_validate_two_units() {
        let errors = validate(&[&V1, &V2]);

        assert_eq!(errors.count(), 2);
        assert!(errors.has_any());
        assert_eq!(errors.get("v1"), vec!["there's an error with v1"]);
        assert_eq!(errors.get("v2"), vec!["there's an error with v2"]);
        assert_eq!(
            errors.to_json(),
            r#"{"errors":{"v1":["there's an error with v1"],"v2":["there's an error with v2"]}}"#
        );
    }

    #[test]
    fn test_validate_no_units() {
        let errors = validate(&[]);
        assert_eq!(errors.count(), 0);
        assert!(!errors.has_any());
    }

    #[test]
    fn test_validate_macro() {
        let errors = validate!(V1, V2, from_fn(|e| e.add("v3", "third")));
        assert_eq!(errors.count(), 3);

        let empty = validate!();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_every_unit_runs_exactly_once() {
        let calls: Vec<AtomicUsize> = (0..16).map(|_| AtomicUsize::new(0)).collect();
        let units: Vec<_> = (0..16)
            .map(|i| {
                let calls = &calls;
                from_fn(move |errors| {
                    calls[i].fetch_add(1, Ordering::SeqCst);
                    errors.add(format!("unit-{}", i), i.to_string());
                })
            })
            .collect();
        let refs: Vec<&dyn Validator> = units.iter().map(|u| u as &dyn Validator).collect();

        let errors = validate(&refs);

        assert_eq!(errors.count(), 16);
        for (i, count) in calls.iter().enumerate() {
            assert_eq!(count.load(Ordering::SeqCst), 1);
            assert_eq!(errors.get(&format!("unit-{}", i)), vec![i.to_string()]);
        }
    }

    #[test]
    fn test_units_run_in_parallel() {
        // Would deadlock if units ran one after another.
        let barrier = Barrier::new(4);
        let unit = from_fn(|errors| {
            barrier.wait();
            errors.add("met", "at barrier");
        });

        let errors = validate(&[&unit, &unit, &unit, &unit]);
        assert_eq!(errors.get("met").len(), 4);
    }

    #[test]
    fn test_own_sequence_order_preserved() {
        let ordered = from_fn(|errors| {
            errors.add("k", "m1");
            errors.add("k", "m2");
        });
        let noise = from_fn(|errors| errors.add("other", "x"));

        let errors = validate(&[&ordered, &noise]);
        assert_eq!(errors.get("k"), vec!["m1", "m2"]);
    }

    #[test]
    fn test_try_validate_ok() {
        let errors = try_validate(&[&V1]).unwrap();
        assert_eq!(errors.keys(), vec!["v1"]);
    }

    #[test]
    fn test_try_validate_isolates_panics() {
        let broken = from_fn(|errors| {
            errors.add("broken", "recorded before panic");
            panic!("unit exploded");
        });

        let err = try_validate(&[&V1, &broken, &V2]).unwrap_err();

        assert_eq!(err.faults().len(), 1);
        assert_eq!(err.faults()[0].index, 1);
        assert_eq!(err.faults()[0].message, "unit exploded");

        let report = err.into_report();
        assert_eq!(report.count(), 3);
        assert_eq!(report.get("broken"), vec!["recorded before panic"]);
    }

    #[test]
    fn test_validate_propagates_panic_after_join() {
        let finished = AtomicUsize::new(0);
        let broken = from_fn(|_| panic!("unit exploded"));
        let healthy = from_fn(|_| {
            finished.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            validate(&[&broken, &healthy, &healthy])
        }));

        let payload = outcome.unwrap_err();
        let fault = UnitFault::from_panic(0, payload.as_ref());
        assert_eq!(fault.message, "unit exploded");
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    struct RefuseSpawn {
        refused: Vec<usize>,
    }

    impl SpawnUnit for RefuseSpawn {
        fn spawn<'scope, 'env, F>(
            &self,
            scope: &'scope thread::Scope<'scope, 'env>,
            index: usize,
            job: F,
        ) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>
        where
            F: FnOnce() + Send + 'scope,
        {
            if self.refused.contains(&index) {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"))
            } else {
                OsThreads.spawn(scope, index, job)
            }
        }
    }

    #[test]
    fn test_refused_spawn_runs_unit_inline() {
        let calls: Vec<AtomicUsize> = (0..6).map(|_| AtomicUsize::new(0)).collect();
        let units: Vec<_> = (0..6)
            .map(|i| {
                let calls = &calls;
                from_fn(move |errors| {
                    calls[i].fetch_add(1, Ordering::SeqCst);
                    errors.add(format!("unit-{}", i), i.to_string());
                })
            })
            .collect();
        let refs: Vec<&dyn Validator> = units.iter().map(|u| u as &dyn Validator).collect();

        let (errors, panics) = run_with(&refs, &RefuseSpawn { refused: vec![1, 4] });

        assert!(panics.is_empty());
        assert_eq!(errors.count(), 6);
        for count in &calls {
            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_refused_spawn_captures_inline_panic() {
        let broken = from_fn(|errors| {
            errors.add("broken", "recorded before panic");
            panic!("inline unit exploded");
        });

        let (errors, panics) = run_with(
            &[&V1, &broken, &V2, &broken],
            &RefuseSpawn { refused: vec![1] },
        );

        assert_eq!(errors.count(), 3);
        assert_eq!(errors.get("broken").len(), 2);
        let faults: Vec<_> = panics
            .iter()
            .map(|(index, payload)| UnitFault::from_panic(*index, payload.as_ref()))
            .collect();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].index, 1);
        assert_eq!(faults[0].message, "inline unit exploded");
        assert_eq!(faults[1].index, 3);
    }

    #[test]
    fn test_every_spawn_refused() {
        let all = RefuseSpawn {
            refused: vec![0, 1],
        };
        let (errors, panics) = run_with(&[&V1, &V2], &all);

        assert!(panics.is_empty());
        assert_eq!(errors.keys(), vec!["v1", "v2"]);
    }
}
