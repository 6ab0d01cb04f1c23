use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use scoreline::config::Config;
use scoreline::file;
use scoreline::manual::ManualRatings;
use scoreline::print;
use scoreline::service::RatingService;
use scoreline::source::{CsvDirSource, DatasetSource, HttpSource};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// directory holding the competition CSV files
    #[clap(short = 'd', long)]
    dir: Option<PathBuf>,

    /// download the competition CSV files from their configured URLs
    #[clap(long)]
    download: bool,

    /// JSON configuration file (defaults apply otherwise)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// JSON file of manual ratings
    #[clap(short = 'm', long)]
    manual: Option<PathBuf>,

    /// print the full scoregrid
    #[clap(long)]
    grid: bool,

    /// home team
    home: String,

    /// away team
    away: String,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.dir.is_none() && !self.download && self.manual.is_none() {
            return Err(anyhow!(
                "at least one of the -d, --download or -m flags must be specified"
            ));
        }
        if self.dir.is_some() && self.download {
            return Err(anyhow!("the -d and --download flags are mutually exclusive"));
        }
        if self.home.trim().eq_ignore_ascii_case(self.away.trim()) {
            return Err(anyhow!("a team cannot play itself"));
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let config: Config = match &args.config {
        Some(path) => file::read_json(path)?,
        None => Config::default(),
    };
    let manual = match &args.manual {
        Some(path) => ManualRatings::from_json_file(path)?,
        None => ManualRatings::default(),
    };
    let (config, source): (_, Arc<dyn DatasetSource>) = match &args.dir {
        Some(dir) => (config, Arc::new(CsvDirSource::new(dir))),
        None if args.download => (config, Arc::new(HttpSource::new()?)),
        None => (
            Config {
                competitions: vec![],
                ..config
            },
            Arc::new(CsvDirSource::new(PathBuf::default())),
        ),
    };
    let service = RatingService::new(config, source, manual)?;
    let table = service.refresh().await;
    info!("rating table holds {} teams", table.len());

    let prices = service.price(&args.home, &args.away)?;
    for rating in [&prices.home, &prices.away] {
        if !rating.reliable {
            warn!(
                "{} is rated from only {} matches",
                rating.team, rating.sample_size
            );
        }
    }
    debug!(
        "tail mass beyond the {}-goal cap: {:.3e}",
        prices.scoregrid.cap() - 1,
        prices.scoregrid.tail_mass()
    );
    let (home, away) = (prices.home.team.as_str(), prices.away.team.as_str());
    println!(
        "{home} v {away}\n{}",
        Console::default().render(&print::tabulate_expectation(home, away, &prices.expectation))
    );
    println!(
        "Markets:\n{}",
        Console::default().render(&print::tabulate_markets(&prices.markets))
    );
    if args.grid {
        println!(
            "Scoregrid:\n{}",
            Console::default().render(&print::tabulate_scoregrid(&prices.scoregrid))
        );
    }
    Ok(())
}
