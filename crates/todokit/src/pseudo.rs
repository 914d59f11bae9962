//! Pseudo-packages: abstract names mapped to real names per manager.
//!
//! ```yaml
//! ripgrep:
//!   apt: ripgrep
//!   brew: ripgrep
//! fd:
//!   apt: fd-find
//!   brew: fd
//! ```

use crate::config::{ConfigSource, Tree, type_name};
use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use std::collections::BTreeMap;
use std::path::Path;

/// Lookup table from pseudo-name to real name per package manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoPackageTable {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

/// Where a pseudo-package ended up after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Assigned to the manager at `manager` in the priority list
    Assigned {
        /// Index into the priority list
        manager: usize,
        /// Name the manager knows the package by
        real_name: String,
    },
    /// The table has no entry for the pseudo-name
    Unavailable,
    /// None of the given managers provides it
    NoManager,
}

impl PseudoPackageTable {
    /// Build from a `{pseudo: {manager: real}}` tree.
    ///
    /// Every entry must be a non-empty mapping of strings.
    pub fn from_tree(tree: &Tree) -> Result<Self> {
        let map = tree
            .as_object()
            .ok_or_else(|| Error::invalid("<root>", type_name(tree), "pseudo-package file"))?;

        let mut entries = BTreeMap::new();
        for (pseudo, value) in map {
            let context = format!("pseudo-package `{pseudo}`");
            let names = value
                .as_object()
                .ok_or_else(|| Error::invalid("<entry>", type_name(value), &context))?;
            if names.is_empty() {
                return Err(Error::invalid("<entry>", "an empty mapping", &context));
            }

            let mut real = BTreeMap::new();
            for (manager, name) in names {
                let name = name
                    .as_str()
                    .ok_or_else(|| Error::invalid(manager, type_name(name), &context))?;
                real.insert(manager.clone(), name.to_string());
            }
            entries.insert(pseudo.clone(), real);
        }

        Ok(Self { entries })
    }

    /// Load from a file.
    pub fn from_file(source: &dyn ConfigSource, path: &Path) -> Result<Self> {
        let tree = source.load(path)?;
        Self::from_tree(&tree).map_err(|e| e.in_file(path))
    }

    /// Whether the pseudo-name is known at all.
    pub fn contains(&self, pseudo: &str) -> bool {
        self.entries.contains_key(pseudo)
    }

    /// Real name of `pseudo` for `manager`.
    pub fn real_name(&self, pseudo: &str, manager: &str) -> Option<&str> {
        self.entries.get(pseudo)?.get(manager).map(String::as_str)
    }

    /// Number of pseudo-packages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a pseudo-name against managers in priority order; the first
    /// manager with an entry wins.
    pub fn resolve(&self, pseudo: &str, managers: &[PackageManager]) -> Resolution {
        let Some(names) = self.entries.get(pseudo) else {
            return Resolution::Unavailable;
        };
        managers
            .iter()
            .enumerate()
            .find_map(|(index, pm)| {
                names.get(pm.name()).map(|real| Resolution::Assigned {
                    manager: index,
                    real_name: real.clone(),
                })
            })
            .unwrap_or(Resolution::NoManager)
    }
}
