use super::Step;
use super::factory::{Loader, Scope};
use crate::config::{Fields, expand_path};
use crate::error::{Error, Result};

/// Embed another todo list: from another file when `path` is given,
/// otherwise a sibling list in the current file.
pub(super) fn build(fields: &Fields<'_>, scope: &Scope<'_>, loader: &mut Loader<'_>) -> Result<Step> {
    let command = fields.nested("command")?;
    let path = command.opt_str("path")?.filter(|p| !p.is_empty());
    let name = command.opt_str("name")?.filter(|n| !n.is_empty());

    let list = match (path, name) {
        (Some(path), name) => loader.load_file(&expand_path(path), name)?,
        (None, Some(name)) => loader.build(scope.tree, scope.file, Some(name))?,
        (None, None) => return Err(Error::missing("path` or `name", command.context())),
    };
    Ok(Step::List(list))
}
