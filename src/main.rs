mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use todokit::{ExecContext, FailurePolicy, Toggle};

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub exec: ExecContext,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let failure_policy = if cli.strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Ignore
        };

        Self {
            quiet: cli.quiet,
            exec: ExecContext::new()
                .with_privilege(Toggle::from_flags(cli.sudo, cli.no_sudo))
                .with_quiet(Toggle::from_flags(cli.quiet, cli.no_quiet))
                .with_failure_policy(failure_policy),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context::from_cli(&cli);

    match cli.command {
        Command::Execute(args) => commands::execute::run(&ctx, &args),
        Command::Install(args) => {
            commands::packages::run(&ctx, &args, commands::packages::Action::Install)
        }
        Command::Uninstall(args) => {
            commands::packages::run(&ctx, &args, commands::packages::Action::Uninstall)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "zztools", &mut io::stdout());
            Ok(())
        }
    }
}
