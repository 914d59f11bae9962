use super::factory::{Loader, Scope};
use super::{Step, current_dir};
use crate::config::{Fields, expand_path};
use crate::context::ExecContext;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Downloads a URL into a directory, named after the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStep {
    url: String,
    to: Option<PathBuf>,
}

impl DownloadStep {
    /// Without `to`, the file lands in the working directory at execution time.
    pub fn new(url: impl Into<String>, to: Option<PathBuf>) -> Self {
        Self { url: url.into(), to }
    }

    /// Source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Target directory, if configured.
    pub fn to(&self) -> Option<&Path> {
        self.to.as_deref()
    }

    /// Fetch the URL.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let dir = match &self.to {
            Some(dir) => dir.clone(),
            None => current_dir()?,
        };
        ctx.downloader().download_into_dir(&self.url, &dir)?;
        Ok(())
    }
}

pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, _loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    Ok(Step::Download(DownloadStep::new(
        command.str("url")?,
        command.opt_str("to")?.map(expand_path),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::RecordingRunner;
    use tempfile::TempDir;

    #[test]
    fn test_download_failure_is_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let (runner, _log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));

        let step = DownloadStep::new("http://", Some(tmp.path().to_path_buf()));
        let err = step.execute(&ctx).unwrap_err();
        assert!(matches!(err, Error::Fetch(fetchkit::Error::HttpError { .. })));
    }
}
