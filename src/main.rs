use clap::Parser;
use repricer::cli::{self, output, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Multiplier(args) => cli::multiplier::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => cli::check::execute_config(&arg.config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
