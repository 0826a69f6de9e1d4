use crate::demo::{print_sections, run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dpo_vendor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "DPO Vendor Compliance",
    about = "Run or demonstrate the vendor data-protection compliance intake",
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
    /// Print the compliance section catalog in wizard order
    Sections,
    /// Walk one intake session end to end against in-memory collaborators
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
        Command::Sections => {
            print_sections();
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}
