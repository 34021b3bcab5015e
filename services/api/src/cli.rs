use crate::report::{run_countries, run_rank, CountriesArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use priority_funding::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Priority Funding Map",
    about = "Score, rank, and allocate a funding pool across regions",
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
    /// Print the ranked region list with suggested funding
    Rank(RankArgs),
    /// List the countries available in the region catalog
    Countries(CountriesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Countries(args) => run_countries(args),
    }
}
