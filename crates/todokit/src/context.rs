//! Execution context
//!
//! Carries the process-wide overrides for privilege elevation and output
//! suppression, the failure policy, and the providers used to start
//! commands and fetch files. One context is built by the caller and
//! passed by reference to every step.

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, ExecOutcome, Invocation, SystemRunner};
use fetchkit::Downloader;

/// A tri-state override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    /// No opinion; the next level down decides
    #[default]
    Unset,
    /// Forced on
    On,
    /// Forced off
    Off,
}

impl Toggle {
    /// Build from a pair of mutually exclusive flags.
    pub fn from_flags(on: bool, off: bool) -> Self {
        match (on, off) {
            (true, _) => Self::On,
            (false, true) => Self::Off,
            (false, false) => Self::Unset,
        }
    }

    /// `None` when unset.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::On => Some(true),
            Self::Off => Some(false),
        }
    }

    /// The forced value, or `fallback` when unset.
    pub fn resolve(self, fallback: bool) -> bool {
        self.as_option().unwrap_or(fallback)
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::On,
            Some(false) => Self::Off,
        }
    }
}

/// What to do when an external command does not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log a warning and keep going
    #[default]
    Ignore,
    /// Fail the step, which stops the todo list
    Strict,
}

/// Shared state for one run
pub struct ExecContext {
    /// Privilege elevation override
    pub privilege: Toggle,
    /// Output suppression override
    pub quiet: Toggle,
    /// Reaction to failing commands
    pub failure_policy: FailurePolicy,
    runner: Box<dyn CommandRunner>,
    downloader: Downloader,
}

impl ExecContext {
    /// A context that starts real processes, with every override unset.
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemRunner))
    }

    /// A context using a custom command runner.
    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            privilege: Toggle::Unset,
            quiet: Toggle::Unset,
            failure_policy: FailurePolicy::Ignore,
            runner,
            downloader: Downloader::new(),
        }
    }

    /// Set the privilege override.
    #[must_use]
    pub fn with_privilege(mut self, privilege: Toggle) -> Self {
        self.privilege = privilege;
        self
    }

    /// Set the quiet override.
    #[must_use]
    pub fn with_quiet(mut self, quiet: Toggle) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Replace the downloader.
    #[must_use]
    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = downloader;
        self
    }

    /// Decide elevation for a command that may carry its own preference.
    ///
    /// An explicit preference wins, then the privilege override, then no
    /// elevation. Package managers resolve elevation this way.
    pub fn elevation(&self, explicit: Option<bool>) -> bool {
        explicit.or(self.privilege.as_option()).unwrap_or(false)
    }

    /// Decide elevation for a step.
    ///
    /// The privilege override replaces the step's own `sudo` setting; with
    /// no override the step decides, defaulting to no elevation.
    pub fn step_elevation(&self, own: Option<bool>) -> bool {
        self.privilege.as_option().or(own).unwrap_or(false)
    }

    /// Whether standard output of commands is discarded.
    pub fn is_quiet(&self) -> bool {
        self.quiet.resolve(false)
    }

    /// Downloader shared by download steps.
    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Run a command, applying the quiet override and the failure policy.
    ///
    /// Under [`FailurePolicy::Ignore`] a failing command is logged and its
    /// outcome returned; under [`FailurePolicy::Strict`] it becomes
    /// [`Error::ExternalCommandFailed`].
    pub fn run(&self, invocation: Invocation) -> Result<ExecOutcome> {
        let invocation = invocation.quiet(self.is_quiet());
        log::debug!("Running: {invocation}");

        let outcome = self.runner.run(&invocation);
        if outcome.is_success() {
            return Ok(outcome);
        }

        match self.failure_policy {
            FailurePolicy::Ignore => {
                log::warn!("Command `{invocation}` {outcome}");
                Ok(outcome)
            }
            FailurePolicy::Strict => Err(Error::ExternalCommandFailed {
                command: invocation.command_line(),
                outcome,
            }),
        }
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("privilege", &self.privilege)
            .field("quiet", &self.quiet)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;

    #[test]
    fn test_toggle() {
        assert_eq!(Toggle::from_flags(true, false), Toggle::On);
        assert_eq!(Toggle::from_flags(false, true), Toggle::Off);
        assert_eq!(Toggle::from_flags(false, false), Toggle::Unset);
        assert!(Toggle::Unset.resolve(true));
        assert!(!Toggle::Off.resolve(true));
        assert_eq!(Toggle::from(Some(true)), Toggle::On);
    }

    #[test]
    fn test_elevation_precedence() {
        let ctx = ExecContext::new();
        assert!(!ctx.elevation(None));
        assert!(ctx.elevation(Some(true)));

        let forced_off = ExecContext::new().with_privilege(Toggle::Off);
        assert!(forced_off.elevation(Some(true)));
        assert!(!forced_off.elevation(None));

        let forced_on = ExecContext::new().with_privilege(Toggle::On);
        assert!(forced_on.elevation(None));
        assert!(!forced_on.elevation(Some(false)));
    }

    #[test]
    fn test_step_elevation_override_wins() {
        let plain = ExecContext::new();
        assert!(!plain.step_elevation(None));
        assert!(plain.step_elevation(Some(true)));

        let forced_off = ExecContext::new().with_privilege(Toggle::Off);
        assert!(!forced_off.step_elevation(Some(true)));
        assert!(!forced_off.step_elevation(None));

        let forced_on = ExecContext::new().with_privilege(Toggle::On);
        assert!(forced_on.step_elevation(Some(false)));
        assert!(forced_on.step_elevation(None));
    }

    #[test]
    fn test_run_applies_quiet() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner)).with_quiet(Toggle::On);

        ctx.run(Invocation::new("echo", ["hi"])).unwrap();

        let calls = log.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].quiet);
    }

    #[test]
    fn test_failure_ignored_by_default() {
        let (runner, log) = RecordingRunner::failing_on("false");
        let ctx = ExecContext::with_runner(Box::new(runner));

        let outcome = ctx.run(Invocation::new("false", Vec::<String>::new())).unwrap();
        assert_eq!(outcome, ExecOutcome::Exited(1));
        assert_eq!(log.calls().len(), 1);
    }

    #[test]
    fn test_failure_strict() {
        let (runner, _log) = RecordingRunner::failing_on("false");
        let ctx = ExecContext::with_runner(Box::new(runner))
            .with_failure_policy(FailurePolicy::Strict);

        let err = ctx
            .run(Invocation::new("false", Vec::<String>::new()))
            .unwrap_err();
        match err {
            Error::ExternalCommandFailed { command, outcome } => {
                assert_eq!(command, "false");
                assert_eq!(outcome, ExecOutcome::Exited(1));
            }
            other => panic!("Expected ExternalCommandFailed, got {other:?}"),
        }
    }
}
