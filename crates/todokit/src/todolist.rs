//! Todo lists: named, ordered sequences of steps.

use crate::config::{ConfigSource, Tree};
use crate::context::ExecContext;
use crate::error::{Error, Result};
use crate::step::Step;
use crate::step::factory::Loader;
use std::path::Path;

/// An ordered sequence of steps, run first to last.
///
/// Cleanup steps run after the main steps no matter how those ended.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    name: Option<String>,
    steps: Vec<Step>,
    cleanup: Vec<Step>,
}

impl TodoList {
    pub(crate) const KIND: &'static str = "todo list";

    /// Create a list without cleanup steps.
    pub fn new(name: Option<String>, steps: Vec<Step>) -> Self {
        Self {
            name,
            steps,
            cleanup: Vec::new(),
        }
    }

    /// Steps to run after the main steps, even when one of them failed.
    #[must_use]
    pub fn with_cleanup(mut self, cleanup: Vec<Step>) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Build one list from a tree; list references to other files are
    /// resolved relative to the working directory.
    pub fn from_tree(tree: &Tree, name: Option<&str>, source: &dyn ConfigSource) -> Result<Self> {
        Loader::new(source).build(tree, None, name)
    }

    /// Build lists in the order named. No names builds all, in file order.
    pub fn from_tree_many(
        tree: &Tree,
        names: &[String],
        source: &dyn ConfigSource,
    ) -> Result<Vec<Self>> {
        Loader::new(source).build_many(tree, None, names)
    }

    /// Load one list from a file.
    pub fn from_file(source: &dyn ConfigSource, path: &Path, name: Option<&str>) -> Result<Self> {
        Loader::new(source).load_file(path, name)
    }

    /// Load several lists from a file.
    pub fn from_file_many(
        source: &dyn ConfigSource,
        path: &Path,
        names: &[String],
    ) -> Result<Vec<Self>> {
        Loader::new(source).load_file_many(path, names)
    }

    /// Name from the config file; composite lists may have none.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Main steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Cleanup steps.
    pub fn cleanup(&self) -> &[Step] {
        &self.cleanup
    }

    /// Number of main steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no main steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// The failure is returned as [`Error::StepFailed`] after the cleanup
    /// steps have run. A failing cleanup step is only logged when a main
    /// step already failed.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let total = self.steps.len();
        let mut failure = None;

        for (index, step) in self.steps.iter().enumerate() {
            log::info!("[{}/{}] {}: {}", index + 1, total, self.label(), step);
            if let Err(e) = step.execute(ctx) {
                failure = Some(Error::StepFailed {
                    list: self.label().to_string(),
                    index: index + 1,
                    step: step.to_string(),
                    cause: Box::new(e),
                });
                break;
            }
        }

        for step in &self.cleanup {
            log::debug!("{}: cleanup: {}", self.label(), step);
            if let Err(e) = step.execute(ctx) {
                if failure.is_some() {
                    log::warn!("Cleanup of {} failed: {}", self.label(), e);
                } else {
                    failure = Some(e);
                }
            }
        }

        failure.map_or(Ok(()), Err)
    }
}
