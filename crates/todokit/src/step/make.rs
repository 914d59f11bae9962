use super::factory::{Loader, Scope};
use super::{GitCloneStep, RemoteUnpackStep, RemoveStep, Step};
use crate::config::{Fields, expand_path};
use crate::context::ExecContext;
use crate::error::Result;
use crate::location::{is_repository_url, is_url};
use crate::runner::Invocation;
use crate::temp;
use crate::todolist::TodoList;
use std::path::{Path, PathBuf};

/// Runs `make -C <dir> [target]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeStep {
    dir: PathBuf,
    target: Option<String>,
    sudo: Option<bool>,
}

impl MakeStep {
    /// Build `target` (or the default target) in `dir`.
    pub fn new(dir: impl Into<PathBuf>, target: Option<String>, sudo: Option<bool>) -> Self {
        Self {
            dir: dir.into(),
            target,
            sudo,
        }
    }

    /// Directory holding the Makefile.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Make target.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Run make.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let mut invocation = Invocation::new("make", ["-C"]).path_arg(&self.dir);
        if let Some(target) = &self.target {
            invocation = invocation.arg(target);
        }
        ctx.run(invocation.elevated(ctx.step_elevation(self.sudo)))
            .map(|_| ())
    }
}

/// Clone a repository to a temp dir, build it, then remove the clone.
pub fn git_make(url: &str, target: Option<String>, sudo: Option<bool>) -> Result<Step> {
    let scratch = temp::new_path();
    let steps = vec![
        Step::GitClone(GitCloneStep::new(url, Some(scratch.clone()))?),
        Step::Make(MakeStep::new(&scratch, target, sudo)),
    ];
    Ok(scratch_list(url, steps, scratch))
}

/// Download and extract an archive to a temp dir, build it, then remove it.
pub fn download_make(url: &str, target: Option<String>, sudo: Option<bool>) -> Step {
    let scratch = temp::new_path();
    let steps = vec![
        Step::RemoteUnpack(RemoteUnpackStep::new(url, Some(scratch.clone()))),
        Step::Make(MakeStep::new(&scratch, target, sudo)),
    ];
    scratch_list(url, steps, scratch)
}

fn scratch_list(url: &str, steps: Vec<Step>, scratch: PathBuf) -> Step {
    Step::List(
        TodoList::new(Some(format!("make {url}")), steps)
            .with_cleanup(vec![Step::Remove(RemoveStep::new(scratch))]),
    )
}

/// A local `path` builds in place; a URL is fetched first, by git when it
/// ends in `.git`, by download otherwise.
pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, _loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    let path = command.str("path")?;
    let target = command.opt_str("target")?.map(str::to_string);
    let sudo = command.opt_bool("sudo")?;

    if !is_url(path) {
        Ok(Step::Make(MakeStep::new(expand_path(path), target, sudo)))
    } else if is_repository_url(path) {
        git_make(path, target, sudo)
    } else {
        Ok(download_make(path, target, sudo))
    }
}
