//! Steps: the executable units of a todo list.
//!
//! Every variant implements the same `execute` capability. Variants that
//! need a file or directory to exist only look for it at execution time;
//! everything derivable from configuration (destinations, temp paths,
//! nested lists and collections) is settled when the step is built.

mod collection;
mod download;
mod execute;
pub mod factory;
mod git;
mod list;
mod make;
mod remove;
mod unpack;

pub use download::DownloadStep;
pub use execute::ExecuteStep;
pub use factory::{STEP_TYPES, StepBuilder};
pub use git::GitCloneStep;
pub use make::{MakeStep, download_make, git_make};
pub use remove::RemoveStep;
pub use unpack::{LocalUnpackStep, RemoteUnpackStep};

use crate::collection::Collection;
use crate::context::ExecContext;
use crate::error::{Error, Result};
use crate::todolist::TodoList;
use std::fmt;
use std::path::PathBuf;

/// One unit of work
#[derive(Debug, Clone)]
pub enum Step {
    /// Run a command line
    Execute(ExecuteStep),
    /// Fetch a URL into a directory
    Download(DownloadStep),
    /// Extract an archive already on disk
    LocalUnpack(LocalUnpackStep),
    /// Fetch an archive to a temp file, extract it, drop the temp file
    RemoteUnpack(RemoteUnpackStep),
    /// Clone a git repository
    GitClone(GitCloneStep),
    /// Run `make` in a directory
    Make(MakeStep),
    /// Install a collection
    CollectionInstall(Collection),
    /// Uninstall a collection
    CollectionUninstall(Collection),
    /// Run another todo list
    List(TodoList),
    /// Delete a file or directory tree
    Remove(RemoveStep),
    /// Do nothing
    NoOp,
}

impl Step {
    /// Run the step to completion.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        match self {
            Self::Execute(step) => step.execute(ctx),
            Self::Download(step) => step.execute(ctx),
            Self::LocalUnpack(step) => step.execute(ctx),
            Self::RemoteUnpack(step) => step.execute(ctx),
            Self::GitClone(step) => step.execute(ctx),
            Self::Make(step) => step.execute(ctx),
            Self::CollectionInstall(collection) => collection.install(ctx),
            Self::CollectionUninstall(collection) => collection.uninstall(ctx),
            Self::List(list) => list.execute(ctx),
            Self::Remove(step) => step.execute(),
            Self::NoOp => Ok(()),
        }
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Execute(_) => "execute",
            Self::Download(_) => "download",
            Self::LocalUnpack(_) | Self::RemoteUnpack(_) => "unpack",
            Self::GitClone(_) => "git",
            Self::Make(_) => "make",
            Self::CollectionInstall(_) | Self::CollectionUninstall(_) => "collection",
            Self::List(_) => "list",
            Self::Remove(_) => "remove",
            Self::NoOp => "noop",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute(step) => write!(f, "run `{}`", step.command()),
            Self::Download(step) => write!(f, "download {}", step.url()),
            Self::LocalUnpack(step) => write!(f, "unpack {}", step.archive().display()),
            Self::RemoteUnpack(step) => write!(f, "download and unpack {}", step.url()),
            Self::GitClone(step) => {
                write!(f, "clone {} into {}", step.url(), step.destination().display())
            }
            Self::Make(step) => match step.target() {
                Some(target) => write!(f, "make {} in {}", target, step.dir().display()),
                None => write!(f, "make in {}", step.dir().display()),
            },
            Self::CollectionInstall(c) => write!(f, "install collection {}", c.name()),
            Self::CollectionUninstall(c) => write!(f, "uninstall collection {}", c.name()),
            Self::List(list) => write!(f, "todo list {}", list.label()),
            Self::Remove(step) => write!(f, "remove {}", step.path().display()),
            Self::NoOp => write!(f, "nothing"),
        }
    }
}

/// Working directory, used for destinations that default to "here".
pub(crate) fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| Error::io(".", e))
}
