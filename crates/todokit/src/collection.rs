//! Collections: named sets of pseudo-packages bound to package managers.
//!
//! An entry is either a plain list of pseudo-names or a mapping that can
//! also pull in other collections from the same file:
//!
//! ```yaml
//! base:
//!   - git
//!   - ripgrep
//! desktop:
//!   packages: [firefox]
//!   collections: [base]
//! ```
//!
//! Resolution happens once, at construction. Each pseudo-name goes to the
//! first manager in priority order that provides it; names that cannot be
//! placed are logged and skipped.

use crate::config::{self, ConfigSource, Fields, Tree, string_list};
use crate::context::ExecContext;
use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::pseudo::{PseudoPackageTable, Resolution};
use std::path::Path;

const KIND: &str = "collection";

/// Packages assigned to one manager, as `(pseudo, real)` pairs in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    manager: String,
    packages: Vec<(String, String)>,
}

impl Bucket {
    fn new(manager: &str) -> Self {
        Self {
            manager: manager.to_string(),
            packages: Vec::new(),
        }
    }

    /// Name of the manager this bucket belongs to.
    pub fn manager(&self) -> &str {
        &self.manager
    }

    /// Real name assigned to a pseudo-name.
    pub fn get(&self, pseudo: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|(p, _)| p == pseudo)
            .map(|(_, real)| real.as_str())
    }

    /// Whether the pseudo-name was placed here.
    pub fn contains(&self, pseudo: &str) -> bool {
        self.get(pseudo).is_some()
    }

    /// Real names, in request order.
    pub fn real_names(&self) -> Vec<&str> {
        self.packages.iter().map(|(_, real)| real.as_str()).collect()
    }

    /// `(pseudo, real)` pairs, in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no package was placed here.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// A resolved collection
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    managers: Vec<PackageManager>,
    buckets: Vec<Bucket>,
    children: Vec<Collection>,
}

impl Collection {
    /// Resolve `packages` against `managers`, which are in priority order.
    ///
    /// Every manager gets a bucket, possibly empty.
    pub fn new<S: AsRef<str>>(
        name: &str,
        packages: &[S],
        table: &PseudoPackageTable,
        managers: &[PackageManager],
    ) -> Self {
        let mut buckets: Vec<Bucket> = managers.iter().map(|pm| Bucket::new(pm.name())).collect();

        for pseudo in packages.iter().map(AsRef::as_ref) {
            if buckets.iter().any(|b| b.contains(pseudo)) {
                log::debug!("{name}: {pseudo} requested twice");
                continue;
            }
            match table.resolve(pseudo, managers) {
                Resolution::Assigned { manager, real_name } => {
                    buckets[manager]
                        .packages
                        .push((pseudo.to_string(), real_name));
                }
                Resolution::Unavailable => {
                    log::warn!("Package {pseudo} is not available, skipping");
                }
                Resolution::NoManager => {
                    log::warn!("Package {pseudo} has no valid packagemanager, skipping");
                }
            }
        }

        Self {
            name: name.to_string(),
            managers: managers.to_vec(),
            buckets,
            children: Vec::new(),
        }
    }

    /// Attach nested collections, handled after this one's own packages.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Collection>) -> Self {
        self.children = children;
        self
    }

    /// Build one collection from a config tree; see [`config::select`].
    pub fn from_tree(
        tree: &Tree,
        name: Option<&str>,
        table: &PseudoPackageTable,
        managers: &[PackageManager],
    ) -> Result<Self> {
        let (name, entry) = config::select(tree, name, KIND)?;
        Self::build(tree, name, entry, table, managers, &mut Vec::new())
    }

    /// Build collections in the order named. No names builds all, in file order.
    pub fn from_tree_many(
        tree: &Tree,
        names: &[String],
        table: &PseudoPackageTable,
        managers: &[PackageManager],
    ) -> Result<Vec<Self>> {
        config::select_many(tree, names, KIND)?
            .into_iter()
            .map(|(name, entry)| Self::build(tree, name, entry, table, managers, &mut Vec::new()))
            .collect()
    }

    /// Load one collection from a file.
    pub fn from_file(
        source: &dyn ConfigSource,
        path: &Path,
        name: Option<&str>,
        table: &PseudoPackageTable,
        managers: &[PackageManager],
    ) -> Result<Self> {
        let tree = source.load(path)?;
        Self::from_tree(&tree, name, table, managers).map_err(|e| e.in_file(path))
    }

    /// Load several collections from a file.
    pub fn from_file_many(
        source: &dyn ConfigSource,
        path: &Path,
        names: &[String],
        table: &PseudoPackageTable,
        managers: &[PackageManager],
    ) -> Result<Vec<Self>> {
        let tree = source.load(path)?;
        Self::from_tree_many(&tree, names, table, managers).map_err(|e| e.in_file(path))
    }

    fn build(
        tree: &Tree,
        name: &str,
        entry: &Tree,
        table: &PseudoPackageTable,
        managers: &[PackageManager],
        visiting: &mut Vec<String>,
    ) -> Result<Self> {
        if visiting.iter().any(|v| v == name) {
            let mut chain: Vec<&str> = visiting.iter().map(String::as_str).collect();
            chain.push(name);
            return Err(Error::CyclicReference {
                chain: chain.join(" -> "),
            });
        }

        let context = format!("{KIND} `{name}`");
        let (packages, nested) = if entry.is_array() {
            (string_list(entry, "<entry>", &context)?, Vec::new())
        } else {
            let fields = Fields::of(entry, context)?;
            (fields.str_list("packages")?, fields.str_list("collections")?)
        };

        visiting.push(name.to_string());
        let children = nested
            .iter()
            .map(|child| {
                let (child_name, child_entry) = config::select(tree, Some(child), KIND)?;
                Self::build(tree, child_name, child_entry, table, managers, visiting)
            })
            .collect::<Result<Vec<_>>>();
        visiting.pop();

        Ok(Self::new(name, &packages, table, managers).with_children(children?))
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Packages assigned to one manager, or `None` for an unknown manager.
    pub fn packages(&self, manager: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.manager == manager)
    }

    /// All buckets, in manager priority order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Nested collections.
    pub fn children(&self) -> &[Collection] {
        &self.children
    }

    /// Managers in priority order.
    pub fn managers(&self) -> &[PackageManager] {
        &self.managers
    }

    /// Number of packages placed in this collection and its children.
    pub fn package_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum::<usize>()
            + self.children.iter().map(Self::package_count).sum::<usize>()
    }

    /// Install every bucket with one call per manager, then the children.
    pub fn install(&self, ctx: &ExecContext) -> Result<()> {
        log::info!("Installing collection {}", self.name);
        for (pm, bucket) in self.managers.iter().zip(&self.buckets) {
            pm.install(&bucket.real_names(), None, ctx)?;
        }
        self.children.iter().try_for_each(|child| child.install(ctx))
    }

    /// Uninstall every bucket with one call per manager, then the children.
    pub fn uninstall(&self, ctx: &ExecContext) -> Result<()> {
        log::info!("Uninstalling collection {}", self.name);
        for (pm, bucket) in self.managers.iter().zip(&self.buckets) {
            pm.uninstall(&bucket.real_names(), None, ctx)?;
        }
        self.children.iter().try_for_each(|child| child.uninstall(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, capture_warnings};
    use serde_json::json;

    fn pm(name: &str) -> PackageManager {
        PackageManager::new(name, &format!("{name} install"), &format!("{name} remove"), None)
            .unwrap()
    }

    fn table() -> PseudoPackageTable {
        PseudoPackageTable::from_tree(&json!({
            "foo": {"apt": "foo-apt", "brew": "foo-brew"},
            "bar": {"brew": "bar"},
            "baz": {"pacman": "baz"}
        }))
        .unwrap()
    }

    #[test]
    fn test_first_match_goes_to_priority_manager() {
        let managers = vec![pm("apt"), pm("brew")];
        let collection = Collection::new("dev", &["foo"], &table(), &managers);

        assert_eq!(collection.packages("apt").unwrap().get("foo"), Some("foo-apt"));
        assert!(collection.packages("brew").unwrap().is_empty());
    }

    #[test]
    fn test_priority_order_flips_assignment() {
        let managers = vec![pm("brew"), pm("apt")];
        let collection = Collection::new("dev", &["foo"], &table(), &managers);

        assert_eq!(collection.packages("brew").unwrap().get("foo"), Some("foo-brew"));
        assert!(collection.packages("apt").unwrap().is_empty());
    }

    #[test]
    fn test_unplaceable_names_land_nowhere() {
        let managers = vec![pm("apt"), pm("brew")];
        let collection = Collection::new("dev", &["missing", "baz", "bar"], &table(), &managers);

        assert_eq!(collection.package_count(), 1);
        assert_eq!(collection.packages("brew").unwrap().real_names(), vec!["bar"]);
        assert!(collection.buckets().iter().all(|b| !b.contains("missing")));
        assert!(collection.buckets().iter().all(|b| !b.contains("baz")));
        assert_eq!(collection.packages("pacman"), None);
    }

    #[test]
    fn test_unplaceable_names_are_warned_about() {
        let managers = vec![pm("apt"), pm("brew")];

        let (collection, warnings) = capture_warnings(|| {
            Collection::new("dev", &["missing", "baz", "foo"], &table(), &managers)
        });

        assert_eq!(collection.package_count(), 1);
        assert_eq!(
            warnings,
            vec![
                "Package missing is not available, skipping",
                "Package baz has no valid packagemanager, skipping",
            ]
        );
    }

    #[test]
    fn test_resolved_names_are_not_warned_about() {
        let managers = vec![pm("apt")];
        let (_, warnings) = capture_warnings(|| Collection::new("dev", &["foo"], &table(), &managers));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_every_manager_gets_a_bucket() {
        let managers = vec![pm("apt"), pm("brew"), pm("pacman")];
        let collection = Collection::new::<&str>("empty", &[], &table(), &managers);

        let names: Vec<_> = collection.buckets().iter().map(Bucket::manager).collect();
        assert_eq!(names, vec!["apt", "brew", "pacman"]);
    }

    #[test]
    fn test_duplicates_are_kept_once() {
        let managers = vec![pm("brew")];
        let collection = Collection::new("dev", &["bar", "bar"], &table(), &managers);
        assert_eq!(collection.packages("brew").unwrap().len(), 1);
    }

    #[test]
    fn test_install_one_call_per_bucket() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let managers = vec![pm("apt"), pm("brew"), pm("pacman")];
        let collection = Collection::new("dev", &["foo", "bar", "baz"], &table(), &managers);

        collection.install(&ctx).unwrap();

        assert_eq!(
            log.lines(),
            vec!["apt install foo-apt", "brew install bar", "pacman install baz"]
        );
    }

    #[test]
    fn test_install_skips_empty_buckets() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let managers = vec![pm("apt"), pm("brew")];
        let collection = Collection::new("dev", &["foo"], &table(), &managers);

        collection.install(&ctx).unwrap();

        assert_eq!(log.lines(), vec!["apt install foo-apt"]);
    }

    #[test]
    fn test_nested_collections_uninstall_recursively() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let managers = vec![pm("apt"), pm("brew")];
        let tree = json!({
            "base": ["bar"],
            "desktop": {"packages": ["foo"], "collections": ["base"]}
        });

        let collection = Collection::from_tree(&tree, Some("desktop"), &table(), &managers).unwrap();
        assert_eq!(collection.children().len(), 1);
        assert_eq!(collection.package_count(), 2);

        collection.uninstall(&ctx).unwrap();

        assert_eq!(log.lines(), vec!["apt remove foo-apt", "brew remove bar"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let managers = vec![pm("apt")];
        let tree = json!({
            "a": {"collections": ["b"]},
            "b": {"packages": ["foo"], "collections": ["a"]}
        });

        let err = Collection::from_tree(&tree, Some("a"), &table(), &managers).unwrap_err();
        match err {
            Error::CyclicReference { chain } => assert_eq!(chain, "a -> b -> a"),
            other => panic!("Expected CyclicReference, got {other:?}"),
        }
    }

    #[test]
    fn test_from_tree_many_all_in_file_order() {
        let managers = vec![pm("brew")];
        let tree = json!({"second": ["bar"], "first": ["foo"]});
        let all = Collection::from_tree_many(&tree, &[], &table(), &managers).unwrap();
        let names: Vec<_> = all.iter().map(Collection::name).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_unknown_nested_collection() {
        let managers = vec![pm("apt")];
        let tree = json!({"a": {"collections": ["ghost"]}});
        let err = Collection::from_tree(&tree, None, &table(), &managers).unwrap_err();
        assert!(matches!(err, Error::NameNotFound { .. }));
    }

    #[test]
    fn test_invalid_entry_shape() {
        let managers = vec![pm("apt")];
        let tree = json!({"a": "git"});
        let err = Collection::from_tree(&tree, None, &table(), &managers).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }
}
