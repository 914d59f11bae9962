//! Building steps and todo lists from config trees.
//!
//! The `type` tag of a step picks its builder from [`STEP_TYPES`]. Builders
//! that reach into other todo lists go through the [`Loader`], which keeps
//! the chain of lists under construction and rejects loops.

use super::{Step, collection, download, execute, git, list, make, unpack};
use crate::config::{self, ConfigSource, Fields, Tree};
use crate::error::{Error, Result};
use crate::todolist::TodoList;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds one step from its config mapping.
pub type StepBuilder = fn(&Fields<'_>, &Scope<'_>, &mut Loader<'_>) -> Result<Step>;

/// User-facing step tags and their builders.
pub const STEP_TYPES: &[(&str, StepBuilder)] = &[
    ("collection", collection::build),
    ("execute", execute::build),
    ("download", download::build),
    ("unpack", unpack::build),
    ("git", git::build),
    ("list", list::build),
    ("make", make::build),
];

/// Find the builder for a step tag.
pub fn lookup(tag: &str) -> Option<StepBuilder> {
    STEP_TYPES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, builder)| *builder)
}

/// The file a step was read from.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// The whole document, for sibling lookups
    pub tree: &'a Tree,
    /// Where it came from; `None` for in-memory trees
    pub file: Option<&'a Path>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListKey {
    file: Option<PathBuf>,
    name: String,
}

impl ListKey {
    fn new(file: Option<&Path>, name: &str) -> Self {
        Self {
            file: file.map(|f| fs::canonicalize(f).unwrap_or_else(|_| f.to_path_buf())),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{} ({})", self.name, file.display()),
            None => f.write_str(&self.name),
        }
    }
}

/// Builds todo lists, following list references across files.
pub struct Loader<'s> {
    source: &'s dyn ConfigSource,
    stack: Vec<ListKey>,
}

impl<'s> Loader<'s> {
    /// Create a loader reading from `source`.
    pub fn new(source: &'s dyn ConfigSource) -> Self {
        Self {
            source,
            stack: Vec::new(),
        }
    }

    /// Where configs are read from.
    pub fn source(&self) -> &'s dyn ConfigSource {
        self.source
    }

    /// Load a file and build one todo list from it.
    pub fn load_file(&mut self, path: &Path, name: Option<&str>) -> Result<TodoList> {
        let tree = self.source.load(path)?;
        self.build(&tree, Some(path), name)
            .map_err(|e| e.in_file(path))
    }

    /// Load a file and build several todo lists from it.
    pub fn load_file_many(&mut self, path: &Path, names: &[String]) -> Result<Vec<TodoList>> {
        let tree = self.source.load(path)?;
        self.build_many(&tree, Some(path), names)
            .map_err(|e| e.in_file(path))
    }

    /// Build one todo list from a loaded tree.
    pub fn build(&mut self, tree: &Tree, file: Option<&Path>, name: Option<&str>) -> Result<TodoList> {
        let (name, entry) = config::select(tree, name, TodoList::KIND)?;
        self.build_entry(Scope { tree, file }, name, entry)
    }

    /// Build several todo lists from a loaded tree.
    pub fn build_many(
        &mut self,
        tree: &Tree,
        file: Option<&Path>,
        names: &[String],
    ) -> Result<Vec<TodoList>> {
        config::select_many(tree, names, TodoList::KIND)?
            .into_iter()
            .map(|(name, entry)| self.build_entry(Scope { tree, file }, name, entry))
            .collect()
    }

    fn build_entry(&mut self, scope: Scope<'_>, name: &str, entry: &Tree) -> Result<TodoList> {
        let key = ListKey::new(scope.file, name);
        if self.stack.contains(&key) {
            let chain = self
                .stack
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::CyclicReference { chain });
        }

        self.stack.push(key);
        let steps = self.build_steps(scope, name, entry);
        self.stack.pop();

        Ok(TodoList::new(Some(name.to_string()), steps?))
    }

    fn build_steps(&mut self, scope: Scope<'_>, name: &str, entry: &Tree) -> Result<Vec<Step>> {
        let items = entry.as_array().ok_or_else(|| {
            Error::invalid(
                "<entry>",
                config::type_name(entry),
                &format!("{} `{name}`", TodoList::KIND),
            )
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let context = format!("step {} of {} `{name}`", index + 1, TodoList::KIND);
                self.build_step(scope, item, context)
            })
            .collect()
    }

    /// Build a single step.
    pub fn build_step(&mut self, scope: Scope<'_>, item: &Tree, context: String) -> Result<Step> {
        let fields = Fields::of(item, context)?;
        let tag = fields.str("type")?;
        let builder = lookup(tag).ok_or_else(|| Error::invalid("type", tag, fields.context()))?;
        builder(&fields, &scope, self)
    }
}
