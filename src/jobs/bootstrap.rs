use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::RuntimeKind;

/// Result of a bootstrap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Started,
    AlreadyStarted,
    Disabled,
    UnsupportedRuntime,
}

/// Ensures a background job is started at most once per process. The flag is
/// owned here rather than inherited from any hosting-runtime single-call
/// guarantee, so re-entering the startup path is safe.
pub struct JobBootstrap {
    started: AtomicBool,
}

impl JobBootstrap {
    pub const fn new() -> Self {
        Self { started: AtomicBool::new(false) }
    }

    /// Decide whether to start the job, and start it through the injected
    /// `starter` at most once. Restricted runtimes are a silent no-op; the
    /// opt-out flag logs a single diagnostic line. A starter error propagates
    /// to the caller and is not retried; the flag stays set so a later
    /// bootstrap attempt cannot double-start a partially started job.
    pub fn bootstrap<F, E>(&self, runtime: RuntimeKind, enabled: bool, starter: F) -> Result<BootstrapOutcome, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if runtime == RuntimeKind::Restricted {
            return Ok(BootstrapOutcome::UnsupportedRuntime);
        }

        if !enabled {
            tracing::info!("maintenance job disabled by configuration");
            return Ok(BootstrapOutcome::Disabled);
        }

        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(BootstrapOutcome::AlreadyStarted);
        }

        starter()?;
        Ok(BootstrapOutcome::Started)
    }
}

impl Default for JobBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, PartialEq)]
    struct StartFailed;

    #[test]
    fn test_disabled_never_invokes_starter() {
        let guard = JobBootstrap::new();
        let calls = AtomicUsize::new(0);

        let outcome = guard
            .bootstrap::<_, StartFailed>(RuntimeKind::Full, false, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert_eq!(outcome, BootstrapOutcome::Disabled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restricted_runtime_never_invokes_starter() {
        let guard = JobBootstrap::new();
        let calls = AtomicUsize::new(0);

        let outcome = guard
            .bootstrap::<_, StartFailed>(RuntimeKind::Restricted, true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert_eq!(outcome, BootstrapOutcome::UnsupportedRuntime);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_second_bootstrap_is_a_no_op() {
        let guard = JobBootstrap::new();
        let calls = AtomicUsize::new(0);
        let starter = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<(), StartFailed>(())
        };

        assert_eq!(
            guard.bootstrap(RuntimeKind::Full, true, starter).unwrap(),
            BootstrapOutcome::Started
        );
        assert_eq!(
            guard.bootstrap(RuntimeKind::Full, true, starter).unwrap(),
            BootstrapOutcome::AlreadyStarted
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_starter_error_propagates_and_is_not_retried() {
        let guard = JobBootstrap::new();
        let calls = AtomicUsize::new(0);

        let result = guard.bootstrap(RuntimeKind::Full, true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StartFailed)
        });
        assert_eq!(result, Err(StartFailed));

        // The guard made its decision; a retry does not start the job again
        let outcome = guard
            .bootstrap::<_, StartFailed>(RuntimeKind::Full, true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome, BootstrapOutcome::AlreadyStarted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
