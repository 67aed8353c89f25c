use crate::commands::{
    run_boardgame_search, run_distance, run_match, BoardGameSearchArgs, DistanceArgs, MatchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tabletop_discovery::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tabletop Discovery",
    about = "Serve and exercise proximity matching for tabletop players, vendors, and ads",
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
    /// Print the great-circle distance in miles between two coordinates
    Distance(DistanceArgs),
    /// Query a board game CSV export
    Boardgames {
        #[command(subcommand)]
        command: BoardGameCommand,
    },
    /// Rank a CSV of candidates the way the directory search does
    Match(MatchArgs),
}

#[derive(Subcommand, Debug)]
enum BoardGameCommand {
    /// Search game names, best matches first
    Search(BoardGameSearchArgs),
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
        Command::Distance(args) => run_distance(args),
        Command::Boardgames {
            command: BoardGameCommand::Search(args),
        } => run_boardgame_search(args),
        Command::Match(args) => run_match(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["tabletop-discovery"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn distance_accepts_negative_longitudes() {
        let cli = Cli::try_parse_from([
            "tabletop-discovery",
            "distance",
            "30.2672",
            "-97.7431",
            "32.7767",
            "-96.7970",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Distance(args)) => {
                assert_eq!(args.lon1, -97.7431);
                assert_eq!(args.lat2, 32.7767);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn match_requires_both_coordinates() {
        let result = Cli::try_parse_from([
            "tabletop-discovery",
            "match",
            "--candidates",
            "stores.csv",
            "--lat",
            "30.2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn boardgame_search_reads_limit() {
        let cli = Cli::try_parse_from([
            "tabletop-discovery",
            "boardgames",
            "search",
            "catan",
            "--csv",
            "games.csv",
            "--limit",
            "3",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Boardgames {
                command: BoardGameCommand::Search(args),
            }) => {
                assert_eq!(args.query, "catan");
                assert_eq!(args.limit, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
