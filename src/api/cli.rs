use crate::api::assess::{run_assessment, run_graph, AssessArgs, GraphArgs};
use crate::api::server;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Symptom Assessor",
    about = "Administer the symptom questionnaire and score diagnostic likelihoods",
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
    /// Replay a CSV answer sheet through the questionnaire and print the outcome
    Assess(AssessArgs),
    /// Print the question/dependency/diagnosis structure as Graphviz DOT
    Graph(GraphArgs),
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
        Command::Assess(args) => run_assessment(args),
        Command::Graph(args) => run_graph(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["symptom-assessor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_graph_options() {
        let cli = Cli::try_parse_from(["symptom-assessor", "graph", "--disorder", "309.81"])
            .expect("parses");
        match cli.command {
            Some(Command::Graph(args)) => {
                assert_eq!(args.disorder.as_deref(), Some("309.81"));
                assert!(!args.simplified);
            }
            other => panic!("expected graph command, got {other:?}"),
        }
    }
}
