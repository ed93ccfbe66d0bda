//! secretctl CLI - manage named container secrets

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use secretctl::commands::{
    self, CreateOptions, InspectOptions, LsOptions, RmOptions,
};
use secretctl::config::Settings;
use secretctl::secrets::FileConnector;
use secretctl::utils::{display_error_and_exit, enhance_error, logger};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "secretctl")]
#[command(author, version, about = "Manage named container secrets", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the secret state file
    #[arg(long, global = true, env = "SECRETCTL_STATE_FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage secrets
    #[command(long_about = "Secrets are created in and can be shared between containers.")]
    Secret {
        #[command(subcommand)]
        command: SecretCommands,
    },

    /// Print an example configuration file
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SecretCommands {
    /// Create a new secret
    #[command(
        long_about = "Create a new secret. If using the default driver, \"local\", the secret \
                      is created on the host under container storage.",
        after_help = "Examples:\n  secretctl secret create mysecret\n  secretctl secret create\n  \
                      secretctl secret create --label foo=bar mysecret"
    )]
    Create {
        /// Secret name; generated when omitted
        #[arg(value_name = "NAME")]
        args: Vec<String>,

        /// Specify secret driver name (default local)
        #[arg(long)]
        driver: Option<String>,

        /// Set metadata for a secret
        #[arg(short, long = "label", value_delimiter = ',')]
        label: Vec<String>,

        /// Read in a line delimited file of labels
        #[arg(long = "label-file")]
        label_file: Vec<PathBuf>,

        /// Set driver specific options
        #[arg(short, long = "opt", value_delimiter = ',')]
        opt: Vec<String>,
    },

    /// List secrets
    #[command(
        visible_alias = "list",
        long_about = "List all available secrets. The output can be filtered and the format \
                      changed to JSON or a user specified template."
    )]
    Ls {
        /// Filter secret output (name, driver, scope, label, opt)
        #[arg(short, long)]
        filter: Vec<String>,

        /// Format secret output using a template, or "json"
        #[arg(long)]
        format: Option<String>,

        /// Print secret output in quiet mode
        #[arg(short, long)]
        quiet: bool,
    },

    /// Display detailed information on one or more secrets
    #[command(after_help = "Examples:\n  secretctl secret inspect mysecret\n  \
                            secretctl secret inspect --all\n  \
                            secretctl secret inspect --format \"{{.Driver}} {{.Scope}}\" mysecret")]
    Inspect {
        #[arg(value_name = "SECRET")]
        names: Vec<String>,

        /// Inspect all secrets
        #[arg(short, long)]
        all: bool,

        /// Format secret output using a template, or "json"
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Remove one or more secrets
    #[command(
        visible_alias = "remove",
        long_about = "Remove one or more existing secrets.\n\nBy default only secrets that are not \
                      being used by any containers are removed. To remove them anyway, use --force."
    )]
    Rm {
        #[arg(value_name = "SECRET")]
        names: Vec<String>,

        /// Remove all secrets
        #[arg(short, long)]
        all: bool,

        /// Remove a secret by force, even if it is being used by a container
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        display_error_and_exit(enhance_error(e));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Secret { command } => {
            let settings = Settings::load();
            let state_file = settings.state_file(cli.state_file.as_deref())?;
            secretctl::log_debug!("Using state file {}", state_file.display());
            let connector = FileConnector::new(state_file, settings.defaults.driver.clone());
            handle_secret_command(command, &settings, &connector)
        }
        Commands::Config => handle_config_command(),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn handle_secret_command(
    command: SecretCommands,
    settings: &Settings,
    connector: &FileConnector,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match command {
        SecretCommands::Create {
            args,
            driver,
            label,
            label_file,
            opt,
        } => commands::secret_create(
            CreateOptions {
                args,
                driver: driver.unwrap_or_default(),
                labels: label,
                label_files: label_file,
                opts: opt,
            },
            connector,
            &mut out,
        ),
        SecretCommands::Ls {
            filter,
            format,
            quiet,
        } => commands::secret_ls(
            LsOptions {
                filters: filter,
                format: format.unwrap_or_else(|| settings.output.ls_format.clone()),
                quiet,
            },
            connector,
            &mut out,
        ),
        SecretCommands::Inspect { names, all, format } => commands::secret_inspect(
            InspectOptions {
                names,
                all,
                format: format.unwrap_or_else(|| settings.output.inspect_format.clone()),
            },
            connector,
            &mut out,
        ),
        SecretCommands::Rm { names, all, force } => commands::secret_rm(
            RmOptions { names, all, force },
            connector,
            &mut out,
        ),
    };

    // partial results must reach the terminal before the error does
    out.flush()?;
    result
}

fn handle_config_command() -> Result<()> {
    print!("{}", Settings::example_config()?);
    Ok(())
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "secretctl", &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("secretctl {}", env!("CARGO_PKG_VERSION"));
    println!("Manage named container secrets");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeated_and_comma_separated_labels() {
        let cli = Cli::parse_from([
            "secretctl", "secret", "create", "-l", "a=1,b=2", "--label", "c", "name",
        ]);
        match cli.command {
            Commands::Secret {
                command: SecretCommands::Create { label, args, .. },
            } => {
                assert_eq!(label, vec!["a=1", "b=2", "c"]);
                assert_eq!(args, vec!["name"]);
            }
            _ => panic!("expected secret create"),
        }
    }

    #[test]
    fn test_aliases() {
        assert!(Cli::try_parse_from(["secretctl", "secret", "list"]).is_ok());
        assert!(Cli::try_parse_from(["secretctl", "secret", "remove", "--all"]).is_ok());
    }
}
