use std::{env, process::ExitCode, time::Instant};

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use artwork_recommender::{
    ArtworkId, ArtworkSummary, MemoryStore, RatingInfo, RecommendConfig, Recommender, Result,
    UserId,
};

const USAGE: &str = "usage: artwork-recommender <snapshot.json> <user_id> [config.json]";

#[derive(Serialize)]
struct Report {
    user: UserId,
    home_feed: Vec<ArtworkSummary>,
    recommended_by_likes: Vec<ArtworkId>,
    rating_info: RatingInfo,
}

fn run(snapshot: &str, user: UserId, config: Option<&str>) -> Result<Report> {
    let config = match config {
        Some(path) => RecommendConfig::from_json_file(path)?,
        None => RecommendConfig::default(),
    };
    let store = MemoryStore::from_json_file(snapshot)?;
    let engine = Recommender::with_config(store, config)?;

    let start = Instant::now();
    let report = Report {
        user,
        home_feed: engine.home_feed(user)?,
        recommended_by_likes: engine.recommend_by_likes_default(user)?,
        rating_info: engine.artist_rating_info(user)?,
    };
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "report ready");
    Ok(report)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (snapshot, user) = match (args.first(), args.get(1).map(|s| s.parse::<UserId>())) {
        (Some(snapshot), Some(Ok(user))) => (snapshot.as_str(), user),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(snapshot, user, args.get(2).map(String::as_str)) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "failed to encode report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(error = %e, "recommendation failed");
            ExitCode::FAILURE
        }
    }
}
