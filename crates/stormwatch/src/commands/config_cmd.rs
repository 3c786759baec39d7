//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
        }

        // Secrets are masked; keyring and env-var keys never appear here.
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let shown =
                config::to_toml(&cfg.redacted()).map_err(|e| CliError::from_config(e, &path))?;
            output::print_output(shown.trim_end(), global.quiet);
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config(&Config::default(), &path)
                .map_err(|e| CliError::from_config(e, &path))?;
            eprintln!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
