//! Classifying the locations written in step configs.

use url::Url;

/// Suffix that marks a URL as a git repository.
pub const REPOSITORY_SUFFIX: &str = ".git";

/// Whether `location` is a remote URL rather than a local path.
///
/// A URL needs a scheme and a host, so Windows drive letters and
/// `file:` paths stay local.
pub fn is_url(location: &str) -> bool {
    Url::parse(location).is_ok_and(|url| url.has_host() && url.scheme() != "file")
}

/// Whether a URL points at a git repository.
pub fn is_repository_url(location: &str) -> bool {
    location.trim_end_matches('/').ends_with(REPOSITORY_SUFFIX)
}

/// Repository name from a clone URL: the last path segment without `.git`.
///
/// Handles scp-like `git@host:owner/repo.git` URLs. Returns `None` when no
/// name remains.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let path = path.strip_suffix(REPOSITORY_SUFFIX).unwrap_or(path);
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);

    let name = path.rsplit(['/', ':']).next()?;
    if name.is_empty() || path == name {
        None
    } else {
        Some(name.to_string())
    }
}
