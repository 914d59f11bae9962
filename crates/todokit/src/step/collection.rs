use super::Step;
use super::factory::{Loader, Scope};
use crate::collection::Collection;
use crate::config::{Fields, expand_path};
use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::pseudo::PseudoPackageTable;

/// Load the three files a collection needs and resolve it now, so a bad
/// file fails the whole todo list before anything runs.
pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    let action = command.str("action")?;
    let wrap: fn(Collection) -> Step = match action {
        "install" => Step::CollectionInstall,
        "uninstall" => Step::CollectionUninstall,
        other => return Err(Error::invalid("action", other, command.context())),
    };

    let collection_file = command.nested("collection")?;
    let managers_file = command.nested("packagemanagers")?;
    let pseudo_file = command.nested("pseudopackages")?;
    let source = loader.source();

    let table = PseudoPackageTable::from_file(source, &expand_path(pseudo_file.str("path")?))?;
    let managers = PackageManager::from_file_many(
        source,
        &expand_path(managers_file.str("path")?),
        &managers_file.str_list("allowed_packagemanagers")?,
    )?;
    let collection = Collection::from_file(
        source,
        &expand_path(collection_file.str("path")?),
        collection_file.opt_str("name")?,
        &table,
        &managers,
    )?;

    Ok(wrap(collection))
}
