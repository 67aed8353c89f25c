use crate::infra::parse_finite;
use clap::Args;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tabletop_discovery::catalog::BoardGameCatalog;
use tabletop_discovery::discovery::{haversine_miles, rank, Candidate, Coordinates, Match, ProximityQuery};
use tabletop_discovery::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DistanceArgs {
    #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
    pub(crate) lat1: f64,
    #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
    pub(crate) lon1: f64,
    #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
    pub(crate) lat2: f64,
    #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
    pub(crate) lon2: f64,
}

#[derive(Args, Debug)]
pub(crate) struct BoardGameSearchArgs {
    /// Text to look for in game names
    pub(crate) query: String,
    /// Board game CSV export (id,name,yearpublished,rank,average,usersrated)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Maximum number of results (1-50)
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Candidate CSV with columns name,featured,latitude,longitude
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Searcher latitude
    #[arg(long, allow_hyphen_values = true, value_parser = parse_finite, requires = "lon")]
    pub(crate) lat: Option<f64>,
    /// Searcher longitude
    #[arg(long, allow_hyphen_values = true, value_parser = parse_finite, requires = "lat")]
    pub(crate) lon: Option<f64>,
    /// Only keep candidates within this many miles
    #[arg(long, value_parser = parse_finite)]
    pub(crate) radius: Option<f64>,
}

pub(crate) fn run_distance(args: DistanceArgs) -> Result<(), AppError> {
    let DistanceArgs {
        lat1,
        lon1,
        lat2,
        lon2,
    } = args;
    let miles = haversine_miles(lat1, lon1, lat2, lon2);
    println!("{miles:.2} miles");
    Ok(())
}

pub(crate) fn run_boardgame_search(args: BoardGameSearchArgs) -> Result<(), AppError> {
    let catalog = BoardGameCatalog::from_path(&args.csv)?;
    let hits = catalog.search(&args.query, args.limit);
    if hits.is_empty() {
        println!("No board games match '{}'", args.query.trim());
        return Ok(());
    }

    for game in hits {
        let rank = game
            .rank
            .map(|rank| format!("#{rank}"))
            .unwrap_or_else(|| "unranked".to_string());
        let year = game
            .year_published
            .map(|year| format!(" ({year})"))
            .unwrap_or_default();
        println!("{:>8}  {}{} [{}]", game.id, game.name, year, rank);
    }
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    if matches!(args.radius, Some(radius) if radius < 0.0) {
        return Err(AppError::Validation(
            "radius must be a non-negative number of miles".to_string(),
        ));
    }
    let file = File::open(&args.candidates)?;
    let candidates = read_candidates(file)?;
    let query = ProximityQuery {
        origin: Coordinates::from_parts(args.lat, args.lon),
        radius_miles: args.radius,
    };

    let ranked = rank(candidates, &query);
    if ranked.is_empty() {
        println!("No candidates matched");
        return Ok(());
    }
    for (position, matched) in ranked.iter().enumerate() {
        println!("{}", format_match(position + 1, matched));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CandidateRow {
    name: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    featured: bool,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl Candidate for CandidateRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "" | "0" | "false" | "no" | "n" => Ok(false),
            "1" | "true" | "yes" | "y" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "'{other}' is not a featured flag"
            ))),
        },
    }
}

pub(crate) fn read_candidates<R: Read>(reader: R) -> Result<Vec<CandidateRow>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader
        .deserialize::<CandidateRow>()
        .map(|row| row.map_err(|err| AppError::Validation(format!("invalid candidate row: {err}"))))
        .collect()
}

fn format_match(position: usize, matched: &Match<CandidateRow>) -> String {
    let marker = if matched.candidate.featured { " *" } else { "" };
    match matched.distance_miles {
        Some(miles) => format!("{position:>3}. {}{marker} ({miles:.1} mi)", matched.candidate.name),
        None => format!("{position:>3}. {}{marker}", matched.candidate.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &str = "name,featured,latitude,longitude\n\
zeta games,no,30.5083,-97.6789\n\
Alpha Hobbies,,30.2672,-97.7431\n\
Dallas Den,yes,32.7767,-96.7970\n\
Mail Order,false,,\n";

    fn ranked(query: ProximityQuery) -> Vec<String> {
        let rows = read_candidates(CANDIDATES.as_bytes()).expect("candidates parse");
        rank(rows, &query)
            .into_iter()
            .map(|matched| matched.candidate.name)
            .collect()
    }

    #[test]
    fn parses_flags_and_missing_coordinates() {
        let rows = read_candidates(CANDIDATES.as_bytes()).expect("candidates parse");
        assert_eq!(rows.len(), 4);
        assert!(rows[2].featured);
        assert!(!rows[1].featured);
        assert!(rows[3].coordinates().is_none());
    }

    #[test]
    fn radius_search_keeps_featured_first_then_nearest() {
        let austin = Coordinates::new(30.2672, -97.7431);
        assert_eq!(
            ranked(ProximityQuery::within(austin, 200.0)),
            vec!["Dallas Den", "Alpha Hobbies", "zeta games"]
        );
        assert_eq!(
            ranked(ProximityQuery::within(austin, 20.0)),
            vec!["Alpha Hobbies", "zeta games"]
        );
    }

    #[test]
    fn browsing_sorts_by_name_without_case() {
        assert_eq!(
            ranked(ProximityQuery::default()),
            vec!["Dallas Den", "Alpha Hobbies", "Mail Order", "zeta games"]
        );
    }

    #[test]
    fn rejects_unknown_flags() {
        let csv = "name,featured,latitude,longitude\nOdd,maybe,,\n";
        assert!(matches!(
            read_candidates(csv.as_bytes()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn formats_distance_when_known() {
        let matched = Match {
            candidate: CandidateRow {
                name: "Alpha Hobbies".to_string(),
                featured: true,
                latitude: None,
                longitude: None,
            },
            distance_miles: Some(12.345),
        };
        assert_eq!(format_match(1, &matched), "  1. Alpha Hobbies * (12.3 mi)");
    }
}
