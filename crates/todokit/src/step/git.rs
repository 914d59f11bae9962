use super::factory::{Loader, Scope};
use super::{Step, current_dir};
use crate::config::{Fields, expand_path};
use crate::context::ExecContext;
use crate::error::{Error, Result};
use crate::location::repo_name_from_url;
use crate::runner::Invocation;
use std::path::{Path, PathBuf};

const GIT_ACTIONS: &[&str] = &["clone"];

/// Clones a repository with `git clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCloneStep {
    url: String,
    destination: PathBuf,
}

impl GitCloneStep {
    /// Without a destination, the repository goes to `<cwd>/<repo name>`.
    pub fn new(url: &str, destination: Option<PathBuf>) -> Result<Self> {
        let destination = match destination {
            Some(dest) => dest,
            None => default_destination(url)?,
        };
        Ok(Self {
            url: url.to_string(),
            destination,
        })
    }

    /// Clone URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Where the clone goes.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run `git clone`.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let invocation = Invocation::new("git", ["clone", self.url.as_str()])
            .path_arg(&self.destination)
            .elevated(ctx.step_elevation(None));
        ctx.run(invocation).map(|_| ())
    }
}

fn default_destination(url: &str) -> Result<PathBuf> {
    let name = repo_name_from_url(url)
        .ok_or_else(|| Error::invalid("url", url, "git clone (no repository name in URL)"))?;
    Ok(current_dir()?.join(name))
}

pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, _loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    let action = command.str("action")?;
    if !GIT_ACTIONS.contains(&action) {
        return Err(Error::invalid("action", action, command.context()));
    }

    let url = command.str("url")?;
    let destination = command.opt_str("path")?.map(expand_path);
    GitCloneStep::new(url, destination).map(Step::GitClone)
}
