use super::Step;
use super::factory::{Loader, Scope};
use crate::config::Fields;
use crate::context::ExecContext;
use crate::error::Result;
use crate::runner::CommandTemplate;

/// Runs a configured command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteStep {
    command: CommandTemplate,
    sudo: Option<bool>,
}

impl ExecuteStep {
    /// Parse a command line.
    pub fn new(command: &str) -> Result<Self> {
        Ok(Self {
            command: CommandTemplate::parse(command, "command", "execute step")?,
            sudo: None,
        })
    }

    /// Set an explicit elevation preference.
    #[must_use]
    pub fn with_sudo(mut self, sudo: Option<bool>) -> Self {
        self.sudo = sudo;
        self
    }

    /// The command as configured.
    pub fn command(&self) -> &CommandTemplate {
        &self.command
    }

    /// Run the command.
    pub fn execute(&self, ctx: &ExecContext) -> Result<()> {
        let invocation = self
            .command
            .invocation::<&str>(&[])
            .elevated(ctx.step_elevation(self.sudo));
        ctx.run(invocation).map(|_| ())
    }
}

pub(super) fn build(fields: &Fields<'_>, _scope: &Scope<'_>, _loader: &mut Loader<'_>) -> Result<Step> {
    let command = CommandTemplate::parse(fields.str("command")?, "command", fields.context())?;
    Ok(Step::Execute(ExecuteStep {
        command,
        sudo: fields.opt_bool("sudo")?,
    }))
}
