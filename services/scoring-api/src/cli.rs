use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use candidate_scoring::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Candidate Scoring",
    about = "Score candidate survey responses and run the scoring service from the command line",
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
    /// Score a survey response JSON file and print the processing response
    Score(ScoreArgs),
    /// Score a built-in sample survey and print the pillar breakdown
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
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["candidate-scoring-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_demo_flags() {
        let cli = Cli::try_parse_from([
            "candidate-scoring-api",
            "demo",
            "--dynamic",
            "--cv-score",
            "85",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert!(args.dynamic);
                assert_eq!(args.cv_score, Some(85.0));
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn score_requires_a_path() {
        assert!(Cli::try_parse_from(["candidate-scoring-api", "score"]).is_err());
    }
}
