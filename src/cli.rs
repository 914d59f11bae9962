use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "zztools")]
#[command(version)]
#[command(about = "Install packages and execute commands from declarative todo lists", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress standard output of spawned commands
    #[arg(short, long, global = true, conflicts_with = "no_quiet")]
    pub quiet: bool,

    /// Never suppress standard output of spawned commands
    #[arg(long, global = true)]
    pub no_quiet: bool,

    /// Elevate every step with sudo, and package managers with no `sudo` setting
    #[arg(long, global = true, conflicts_with = "no_sudo")]
    pub sudo: bool,

    /// Never elevate steps, nor package managers with no `sudo` setting
    #[arg(long, global = true)]
    pub no_sudo: bool,

    /// Stop at the first command that exits non-zero
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute todo lists from a file
    Execute(ExecuteArgs),

    /// Install collections of packages
    Install(PackageArgs),

    /// Uninstall collections of packages
    Uninstall(PackageArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ExecuteArgs {
    /// File containing the todo lists
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Todo lists to run, in order (default: all, in file order)
    #[arg(value_name = "TODOLIST")]
    pub todolists: Vec<String>,
}

#[derive(Args)]
pub struct PackageArgs {
    /// File with the collections
    #[arg(short = 'c', long, value_name = "FILE")]
    pub collection_file: PathBuf,

    /// File with the package managers
    #[arg(short = 'm', long = "packagemanager-file", value_name = "FILE")]
    pub packagemanager_file: PathBuf,

    /// File with the pseudo-packages
    #[arg(short = 'p', long, value_name = "FILE")]
    pub package_file: PathBuf,

    /// Use only these package managers, in this priority order
    #[arg(short = 'g', long = "packagemanager-list", value_name = "PACKAGEMANAGER", num_args = 1..)]
    pub packagemanagers: Vec<String>,

    /// Use only these collections
    #[arg(short = 'l', long = "collection-list", value_name = "COLLECTION", num_args = 1..)]
    pub collections: Vec<String>,
}
