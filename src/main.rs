mod cli;
mod commands;
mod formatting;
mod logging;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_extract, run_sync};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    logging::init_logging(args.verbose);

    match args.command {
        Commands::Sync {
            source,
            stylesheet,
            dry_run,
            no_backup,
            format,
            output,
        } => {
            run_sync(
                args.config,
                args.verbose,
                source,
                stylesheet,
                dry_run,
                no_backup,
                format,
                output,
            )
            .await
        }
        Commands::Extract {
            source,
            format,
            output,
        } => run_extract(args.config, args.verbose, source, format, output).await,
    }
}
