use crate::demo::{run_demo, run_price, run_simulate, DemoArgs, PriceArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use revenue_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Revenue Pricing Orchestrator",
    about = "Run the multifamily pricing engine and occupancy simulator from the command line",
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
    /// Price a rent roll or a simulated portfolio and print the results
    Price(PriceArgs),
    /// Run the occupancy simulator and print daily transition summaries
    Simulate(SimulateArgs),
    /// Run an end-to-end demo: simulate, price daily with carry-forward
    Demo(DemoArgs),
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
        Command::Price(args) => run_price(args),
        Command::Simulate(args) => run_simulate(args),
        Command::Demo(args) => run_demo(args),
    }
}
