pub mod execute;
pub mod packages;

use std::path::{Path, PathBuf};

/// Expand `~` in a path given on the command line.
pub fn config_path(path: &Path) -> PathBuf {
    todokit::config::expand_path(&path.to_string_lossy())
}
