use super::factory::{Loader, Scope};
use super::{Step, current_dir};
use crate::config::{Fields, expand_path};
use crate::context::ExecContext;
use crate::error::{Error, Result};
use crate::location::is_url;
use crate::temp;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn destination(to: Option<&Path>) -> Result<PathBuf> {
    match to {
        Some(dir) => Ok(dir.to_path_buf()),
        None => current_dir(),
    }
}

/// Extracts an archive that is already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUnpackStep {
    archive: PathBuf,
    to: Option<PathBuf>,
}

impl LocalUnpackStep {
    /// Unpack `archive` into `to`, or the working directory.
    pub fn new(archive: impl Into<PathBuf>, to: Option<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            to,
        }
    }

    /// Archive path.
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Target directory, if configured.
    pub fn to(&self) -> Option<&Path> {
        self.to.as_deref()
    }

    /// Extract the archive.
    pub fn execute(&self, _ctx: &ExecContext) -> Result<()> {
        let dest = destination(self.to.as_deref())?;
        fetchkit::unpack(&self.archive, &dest)?;
        Ok(())
    }
}

/// Downloads an archive to a fresh temp file, extracts it, and removes the
/// temp file whether or not extraction worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUnpackStep {
    url: String,
    to: Option<PathBuf>,
}

impl RemoteUnpackStep {
    /// Fetch `url` and unpack it into `to`, or the working directory.
    pub fn new(url: impl Into<String>, to: Option<PathBuf>) -> Self {
        Self { url: url.into(), to }
    }

    /// Archive URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Target directory, if configured.
    pub fn to(&self) -> Option<&Path> {
        self.to.as_deref()
    }

    /// Download and extract.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let dest = destination(self.to.as_deref())?;
        let archive = temp::new_path();

        let result = ctx
            .downloader()
            .download_to_file(&self.url, &archive)
            .and_then(|_| fetchkit::unpack(&archive, &dest))
            .map(|_| ())
            .map_err(Error::from);

        match fs::remove_file(&archive) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not remove {}: {}", archive.display(), e),
        }

        result
    }
}

/// `archive` may be a URL or a local path; `to` defaults to the working
/// directory.
pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, _loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    let archive = command.str("archive")?;
    let to = command.opt_str("to")?.map(expand_path);

    if is_url(archive) {
        Ok(Step::RemoteUnpack(RemoteUnpackStep::new(archive, to)))
    } else {
        Ok(Step::LocalUnpack(LocalUnpackStep::new(expand_path(archive), to)))
    }
}
