use crate::demo::{run_demo, show_quiz, DemoArgs, ShowQuizArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use srecno_quiz::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Srećno quiz service",
    about = "Serve and demo the franchise quizzes from the command line",
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
    /// Inspect configured quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },
    /// Walk through a scripted quiz run, lead capture, and report
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// Print a quiz's questions and result buckets
    Show(ShowQuizArgs),
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
        Command::Quiz {
            command: QuizCommand::Show(args),
        } => show_quiz(args),
        Command::Demo(args) => run_demo(args),
    }
}
