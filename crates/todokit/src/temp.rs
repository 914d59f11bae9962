//! Collision-resistant scratch paths for composite steps.

use std::path::PathBuf;

const TEMP_PREFIX: &str = "zztools";

/// A fresh path under the system temp directory. Nothing is created.
pub fn new_path() -> PathBuf {
    std::env::temp_dir().join(format!("{TEMP_PREFIX}-{}", uuid::Uuid::new_v4()))
}
