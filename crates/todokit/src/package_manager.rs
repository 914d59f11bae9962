//! Package managers: named install/uninstall command templates.
//!
//! Config shape, one entry per manager:
//!
//! ```yaml
//! apt:
//!   install: apt-get install -y
//!   uninstall: apt-get remove -y
//!   sudo: true
//! ```

use crate::config::{self, ConfigSource, Fields, Tree};
use crate::context::ExecContext;
use crate::error::Result;
use crate::runner::{CommandTemplate, ExecOutcome};
use std::path::Path;

const KIND: &str = "package manager";

/// A named external package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    name: String,
    install: CommandTemplate,
    uninstall: CommandTemplate,
    sudo: Option<bool>,
}

impl PackageManager {
    /// Create a manager from its command templates.
    pub fn new(name: &str, install: &str, uninstall: &str, sudo: Option<bool>) -> Result<Self> {
        let context = format!("{KIND} `{name}`");
        Ok(Self {
            name: name.to_string(),
            install: CommandTemplate::parse(install, "install", &context)?,
            uninstall: CommandTemplate::parse(uninstall, "uninstall", &context)?,
            sudo,
        })
    }

    fn from_entry(name: &str, entry: &Tree) -> Result<Self> {
        let fields = Fields::of(entry, format!("{KIND} `{name}`"))?;
        Self::new(
            name,
            fields.str("install")?,
            fields.str("uninstall")?,
            fields.opt_bool("sudo")?,
        )
    }

    /// Build one manager from a config tree; see [`config::select`].
    pub fn from_tree(tree: &Tree, name: Option<&str>) -> Result<Self> {
        let (name, entry) = config::select(tree, name, KIND)?;
        Self::from_entry(name, entry)
    }

    /// Build managers in the order named. No names builds all, in file order.
    pub fn from_tree_many(tree: &Tree, names: &[String]) -> Result<Vec<Self>> {
        config::select_many(tree, names, KIND)?
            .into_iter()
            .map(|(name, entry)| Self::from_entry(name, entry))
            .collect()
    }

    /// Load one manager from a file.
    pub fn from_file(source: &dyn ConfigSource, path: &Path, name: Option<&str>) -> Result<Self> {
        let tree = source.load(path)?;
        Self::from_tree(&tree, name).map_err(|e| e.in_file(path))
    }

    /// Load several managers from a file.
    pub fn from_file_many(
        source: &dyn ConfigSource,
        path: &Path,
        names: &[String],
    ) -> Result<Vec<Self>> {
        let tree = source.load(path)?;
        Self::from_tree_many(&tree, names).map_err(|e| e.in_file(path))
    }

    /// Manager name, as used in pseudo-package tables.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install command template.
    pub fn install_template(&self) -> &CommandTemplate {
        &self.install
    }

    /// Uninstall command template.
    pub fn uninstall_template(&self) -> &CommandTemplate {
        &self.uninstall
    }

    /// Configured elevation default.
    pub fn sudo(&self) -> Option<bool> {
        self.sudo
    }

    /// Decide elevation: explicit override, then this manager's default,
    /// then the context override.
    pub fn elevation(&self, override_privilege: Option<bool>, ctx: &ExecContext) -> bool {
        ctx.elevation(override_privilege.or(self.sudo))
    }

    /// Install packages with a single command.
    ///
    /// Returns `None` without spawning anything when `packages` is empty.
    pub fn install<S: AsRef<str>>(
        &self,
        packages: &[S],
        override_privilege: Option<bool>,
        ctx: &ExecContext,
    ) -> Result<Option<ExecOutcome>> {
        self.run(&self.install, packages, override_privilege, ctx)
    }

    /// Uninstall packages with a single command.
    pub fn uninstall<S: AsRef<str>>(
        &self,
        packages: &[S],
        override_privilege: Option<bool>,
        ctx: &ExecContext,
    ) -> Result<Option<ExecOutcome>> {
        self.run(&self.uninstall, packages, override_privilege, ctx)
    }

    fn run<S: AsRef<str>>(
        &self,
        template: &CommandTemplate,
        packages: &[S],
        override_privilege: Option<bool>,
        ctx: &ExecContext,
    ) -> Result<Option<ExecOutcome>> {
        if packages.is_empty() {
            log::debug!("{}: nothing to do", self.name);
            return Ok(None);
        }
        let invocation = template
            .invocation(packages)
            .elevated(self.elevation(override_privilege, ctx));
        ctx.run(invocation).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FailurePolicy, Toggle};
    use crate::error::Error;
    use crate::testing::RecordingRunner;
    use serde_json::json;

    fn pm_tree() -> Tree {
        json!({
            "apt": {"install": "apt-get install -y", "uninstall": "apt-get remove -y", "sudo": true},
            "brew": {"install": "brew install", "uninstall": "brew uninstall"},
            "pip": {"install": "pip install --user", "uninstall": "pip uninstall -y", "sudo": false}
        })
    }

    #[test]
    fn test_from_tree_named() {
        let pm = PackageManager::from_tree(&pm_tree(), Some("brew")).unwrap();
        assert_eq!(pm.name(), "brew");
        assert_eq!(pm.install_template().as_str(), "brew install");
        assert_eq!(pm.sudo(), None);
    }

    #[test]
    fn test_from_tree_many_order() {
        let all = PackageManager::from_tree_many(&pm_tree(), &[]).unwrap();
        let names: Vec<_> = all.iter().map(PackageManager::name).collect();
        assert_eq!(names, vec!["apt", "brew", "pip"]);

        let picked =
            PackageManager::from_tree_many(&pm_tree(), &["pip".into(), "apt".into()]).unwrap();
        assert_eq!(picked[0].name(), "pip");
        assert_eq!(picked[1].name(), "apt");
    }

    #[test]
    fn test_missing_template() {
        let tree = json!({"apt": {"install": "apt-get install"}});
        let err = PackageManager::from_tree(&tree, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing field `uninstall` in package manager `apt`"
        );
    }

    #[test]
    fn test_install_batches_into_one_command() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let pm = PackageManager::from_tree(&pm_tree(), Some("brew")).unwrap();

        pm.install(&["git", "ripgrep"], None, &ctx).unwrap();

        assert_eq!(log.lines(), vec!["brew install git ripgrep"]);
    }

    #[test]
    fn test_empty_install_spawns_nothing() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let pm = PackageManager::from_tree(&pm_tree(), Some("apt")).unwrap();

        let outcome = pm.install::<&str>(&[], Some(true), &ctx).unwrap();
        assert_eq!(outcome, None);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_uninstall_uses_uninstall_template() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner));
        let pm = PackageManager::from_tree(&pm_tree(), Some("apt")).unwrap();

        pm.uninstall(&["curl"], None, &ctx).unwrap();

        assert_eq!(log.lines(), vec!["sudo apt-get remove -y curl"]);
    }

    #[test]
    fn test_elevation_precedence() {
        let (runner, _log) = RecordingRunner::new();
        let forced_on = ExecContext::with_runner(Box::new(runner)).with_privilege(Toggle::On);
        let apt = PackageManager::from_tree(&pm_tree(), Some("apt")).unwrap();
        let brew = PackageManager::from_tree(&pm_tree(), Some("brew")).unwrap();
        let pip = PackageManager::from_tree(&pm_tree(), Some("pip")).unwrap();

        // argument beats manager default
        assert!(!apt.elevation(Some(false), &forced_on));
        // manager default beats context override
        assert!(!pip.elevation(None, &forced_on));
        // context override applies when the manager has no default
        assert!(brew.elevation(None, &forced_on));

        let plain = ExecContext::new();
        assert!(!brew.elevation(None, &plain));
        assert!(apt.elevation(None, &plain));
    }

    #[test]
    fn test_manager_sudo_beats_no_sudo_override() {
        let (runner, log) = RecordingRunner::new();
        let ctx = ExecContext::with_runner(Box::new(runner)).with_privilege(Toggle::Off);
        let apt = PackageManager::new("apt", "apt-get install -y", "apt-get remove -y", Some(true))
            .unwrap();
        let brew = PackageManager::new("brew", "brew install", "brew uninstall", None).unwrap();

        apt.install(&["curl"], None, &ctx).unwrap();
        brew.install(&["curl"], None, &ctx).unwrap();

        assert_eq!(
            log.lines(),
            vec!["sudo apt-get install -y curl", "brew install curl"]
        );
    }

    #[test]
    fn test_failed_install_strict() {
        let (runner, _log) = RecordingRunner::failing_on("brew");
        let ctx = ExecContext::with_runner(Box::new(runner))
            .with_failure_policy(FailurePolicy::Strict);
        let pm = PackageManager::from_tree(&pm_tree(), Some("brew")).unwrap();

        let err = pm.install(&["git"], None, &ctx).unwrap_err();
        assert!(matches!(err, Error::ExternalCommandFailed { .. }));
    }
}
