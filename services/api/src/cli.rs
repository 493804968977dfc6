use crate::demo::{run_catalog_outline, run_demo, DemoArgs, OutlineArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use founder_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Founder Interview Service",
    about = "Run and demonstrate the adaptive founder interview service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the shipped question catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Walk a scripted founder through the interview on the command line
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the catalog outline with gates and option sources
    Outline(OutlineArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured live session capacity
    #[arg(long)]
    pub(crate) session_capacity: Option<usize>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog {
            command: CatalogCommand::Outline(args),
        } => run_catalog_outline(args),
        Command::Demo(args) => run_demo(args),
    }
}
