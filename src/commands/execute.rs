//! `zztools execute`: run todo lists from a file.

use anyhow::{Context as _, Result};
use todokit::{FileSource, TodoList};

use super::config_path;
use crate::Context;
use crate::cli::ExecuteArgs;
use crate::ui;

pub fn run(ctx: &Context, args: &ExecuteArgs) -> Result<()> {
    let file = config_path(&args.file);
    let lists = TodoList::from_file_many(&FileSource, &file, &args.todolists)
        .with_context(|| format!("Failed to load todo lists from {}", file.display()))?;

    for list in &lists {
        if !ctx.quiet {
            ui::header(&format!("{} ({} steps)", list.label(), list.len()));
        }
        list.execute(&ctx.exec)
            .with_context(|| format!("Todo list {} did not finish", list.label()))?;
    }

    if !ctx.quiet {
        ui::success(&format!("Finished {} todo list(s)", lists.len()));
    }
    Ok(())
}
