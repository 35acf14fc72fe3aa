use crate::demo::{run_demo, run_discipline_report, DemoArgs, DisciplineReportArgs};
use crate::server;
use care_ops::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Care Ops",
    about = "Run the care-home staff discipline service or report on corrective-action exports",
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
    /// Work with corrective-action history outside the service
    Discipline {
        #[command(subcommand)]
        command: DisciplineCommand,
    },
    /// Walk a synthetic employee through intake, escalation, and adjustment
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DisciplineCommand {
    /// Summarize discipline standing from a corrective-action CSV export
    Report(DisciplineReportArgs),
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
        Command::Discipline {
            command: DisciplineCommand::Report(args),
        } => run_discipline_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
