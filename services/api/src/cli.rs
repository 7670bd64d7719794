use crate::demo::{run_recommend, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Allocation Service",
    about = "Score fleet vehicles for a trip and run the allocation service",
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
    /// Recommend a vehicle for one trip and print the explanation
    Recommend(RecommendArgs),
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
        Command::Recommend(args) => run_recommend(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_ai::workflows::allocation::{Terrain, Weather};

    #[test]
    fn recommend_arguments_parse() {
        let cli = Cli::try_parse_from([
            "fleet-ai-api",
            "recommend",
            "RT005",
            "--load-weight",
            "18000",
            "--weather",
            "rain",
            "--swap-to",
            "VH002",
            "--simulate-load",
            "22000",
            "--confirm",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Recommend(args)) => {
                assert_eq!(args.route.id, "RT005");
                assert_eq!(args.route.terrain, Terrain::Mixed);
                assert_eq!(args.load_weight, 18_000);
                assert_eq!(args.weather, Weather::Rain);
                assert_eq!(args.swap_to.as_deref(), Some("VH002"));
                assert_eq!(args.simulate_load, Some(22_000));
                assert!(args.confirm);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_weather_is_rejected() {
        let result = Cli::try_parse_from(["fleet-ai-api", "recommend", "RT001", "--weather", "hail"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["fleet-ai-api"]).expect("no arguments");
        assert!(cli.command.is_none());
    }
}
