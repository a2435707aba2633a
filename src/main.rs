use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xconv::cli::convert::ConvertRequest;
use xconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount once and exit
    Convert {
        /// Base currency code, defaults to the configured one
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code, defaults to the configured one
        #[arg(short, long)]
        to: Option<String>,
        /// Treat the amount as a target amount and convert back to the base
        #[arg(short, long)]
        reverse: bool,
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Start the interactive converter
    Interactive,
}

impl From<Commands> for xconv::AppCommand {
    fn from(cmd: Commands) -> xconv::AppCommand {
        match cmd {
            Commands::Currencies => xconv::AppCommand::Currencies,
            Commands::Interactive => xconv::AppCommand::Interactive,
            Commands::Convert {
                from,
                to,
                reverse,
                amount,
            } => xconv::AppCommand::Convert(ConvertRequest {
                from,
                to,
                amount,
                reverse,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xconv::cli::setup::setup(cli.config_path.as_deref()),
        Some(cmd) => xconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
