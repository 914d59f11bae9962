//! `zztools install` / `zztools uninstall`: apply collections directly.

use anyhow::{Context as _, Result};
use todokit::{Collection, FileSource, PackageManager, PseudoPackageTable};

use super::config_path;
use crate::Context;
use crate::cli::PackageArgs;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
}

impl Action {
    const fn verb(self) -> &'static str {
        match self {
            Self::Install => "Installed",
            Self::Uninstall => "Uninstalled",
        }
    }
}

pub fn run(ctx: &Context, args: &PackageArgs, action: Action) -> Result<()> {
    let source = FileSource;

    let package_file = config_path(&args.package_file);
    let table = PseudoPackageTable::from_file(&source, &package_file)
        .with_context(|| format!("Failed to load packages from {}", package_file.display()))?;

    let manager_file = config_path(&args.packagemanager_file);
    let managers = PackageManager::from_file_many(&source, &manager_file, &args.packagemanagers)
        .with_context(|| {
            format!("Failed to load package managers from {}", manager_file.display())
        })?;

    let collection_file = config_path(&args.collection_file);
    let collections = Collection::from_file_many(
        &source,
        &collection_file,
        &args.collections,
        &table,
        &managers,
    )
    .with_context(|| format!("Failed to load collections from {}", collection_file.display()))?;

    for collection in &collections {
        if !ctx.quiet {
            ui::info(&format!(
                "{}: {} package(s)",
                collection.name(),
                collection.package_count()
            ));
        }
        match action {
            Action::Install => collection.install(&ctx.exec),
            Action::Uninstall => collection.uninstall(&ctx.exec),
        }
        .with_context(|| format!("Collection {} failed", collection.name()))?;
    }

    if !ctx.quiet {
        ui::success(&format!("{} {} collection(s)", action.verb(), collections.len()));
    }
    Ok(())
}
