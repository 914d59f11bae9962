//! # todokit
//!
//! Declarative todo lists and package collections.
//!
//! A todo list is an ordered sequence of steps read from a JSON or YAML
//! file. Steps run commands, download and unpack archives, clone and build
//! repositories, embed other todo lists, or install collections of
//! pseudo-packages through whichever package managers provide them.
//!
//! ## Core Concepts
//!
//! - **PackageManager**: install/uninstall command templates plus an
//!   elevation default
//! - **PseudoPackageTable**: abstract package names mapped to real names per
//!   package manager
//! - **Collection**: pseudo-packages resolved into one bucket per manager,
//!   first match in priority order
//! - **Step**: one unit of work; built from a `type` tag by the factory
//! - **TodoList**: named, ordered steps, run fail-fast
//! - **ExecContext**: privilege and quiet overrides, failure policy, and the
//!   command runner every step goes through
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use todokit::{ExecContext, FailurePolicy, FileSource, Toggle, TodoList};
//!
//! let lists = TodoList::from_file_many(&FileSource, Path::new("setup.yaml"), &[])?;
//! let ctx = ExecContext::new()
//!     .with_quiet(Toggle::On)
//!     .with_failure_policy(FailurePolicy::Strict);
//!
//! for list in &lists {
//!     list.execute(&ctx)?;
//! }
//! # Ok::<(), todokit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod location;
pub mod package_manager;
pub mod pseudo;
pub mod runner;
pub mod step;
pub mod temp;
pub mod todolist;

#[cfg(test)]
pub(crate) mod testing;

pub use collection::{Bucket, Collection};
pub use config::{ConfigFormat, ConfigSource, FileSource, Tree};
pub use context::{ExecContext, FailurePolicy, Toggle};
pub use error::{Error, Result};
pub use package_manager::PackageManager;
pub use pseudo::{PseudoPackageTable, Resolution};
pub use runner::{CommandRunner, CommandTemplate, ExecOutcome, Invocation, SystemRunner};
pub use step::Step;
pub use todolist::TodoList;
