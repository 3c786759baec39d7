//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod check;
pub mod conditions;
pub mod config_cmd;
pub mod run;
pub mod subscribers;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(args, global).await,
        Command::Check(args) => check::handle(args, global).await,
        Command::Conditions(args) => conditions::handle(args, global).await,
        Command::Subscribers(args) => subscribers::handle(args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are generated before dispatch
        Command::Completions(_) => Ok(()),
    }
}
