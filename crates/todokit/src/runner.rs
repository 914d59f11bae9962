//! External command invocation
//!
//! Every process the engine starts goes through a [`CommandRunner`], so
//! tests can record invocations instead of spawning real tools.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Program used to elevate an invocation.
pub const ELEVATION_PROGRAM: &str = "sudo";

/// A fully resolved external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
    /// Prefix the command with the elevation program
    pub elevated: bool,
    /// Discard standard output
    pub quiet: bool,
}

impl Invocation {
    /// Create an invocation without elevation or output suppression.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            elevated: false,
            quiet: false,
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Set whether the command runs elevated.
    #[must_use]
    pub fn elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Set whether standard output is discarded.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The argument vector that will actually be executed.
    pub fn argv(&self) -> Vec<&str> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        if self.elevated {
            argv.push(ELEVATION_PROGRAM);
        }
        argv.push(self.program.as_str());
        argv.extend(self.args.iter().map(String::as_str));
        argv
    }

    /// Shell-quoted rendering of [`Self::argv`] for messages.
    pub fn command_line(&self) -> String {
        shell_words::join(self.argv())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// A command line from configuration, split into words once.
///
/// Quoting follows POSIX shell rules, but nothing else about a shell
/// applies: no globbing, no variables, no pipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    raw: String,
    words: Vec<String>,
}

impl CommandTemplate {
    /// Split a command line. `field` and `context` locate it in error messages.
    pub fn parse(raw: &str, field: &str, context: &str) -> Result<Self> {
        let words = shell_words::split(raw)
            .map_err(|e| Error::invalid(field, format!("{raw:?} ({e})"), context))?;
        if words.is_empty() {
            return Err(Error::invalid(field, format!("{raw:?}"), context));
        }
        Ok(Self {
            raw: raw.to_string(),
            words,
        })
    }

    /// The command line as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Build an invocation, appending each extra value as its own argument.
    pub fn invocation<S: AsRef<str>>(&self, extra: &[S]) -> Invocation {
        let (program, args) = self
            .words
            .split_first()
            .map_or(("", &[][..]), |(p, a)| (p.as_str(), a));
        Invocation::new(
            program,
            args.iter()
                .map(String::as_str)
                .chain(extra.iter().map(|s| s.as_ref())),
        )
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// What happened to an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Exited with status zero
    Success,
    /// Exited with a non-zero status
    Exited(i32),
    /// Killed by a signal
    Signaled(i32),
    /// Could not be spawned at all
    NotStarted(String),
}

impl ExecOutcome {
    /// Whether the command succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Classify a finished process.
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return Self::Success;
        }
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Exited(-1)
    }
}

impl fmt::Display for ExecOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "succeeded"),
            Self::Exited(code) => write!(f, "exited with status {code}"),
            Self::Signaled(signal) => write!(f, "was terminated by signal {signal}"),
            Self::NotStarted(reason) => write!(f, "could not be started: {reason}"),
        }
    }
}

/// Starts external commands
///
/// Implement this trait to intercept process creation.
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and report how it ended
    fn run(&self, invocation: &Invocation) -> ExecOutcome;
}

/// Runs commands as real child processes, inheriting stdin and stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> ExecOutcome {
        let argv = invocation.argv();
        let Some((program, args)) = argv.split_first() else {
            return ExecOutcome::NotStarted("empty command".to_string());
        };

        let stdout = if invocation.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        match Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
        {
            Ok(status) => ExecOutcome::from_status(status),
            Err(e) => ExecOutcome::NotStarted(e.to_string()),
        }
    }
}
