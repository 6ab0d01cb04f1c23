use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use scoreline::config::Config;
use scoreline::csv::CsvWriter;
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

    /// keep running, refreshing the table at the configured interval
    #[clap(long)]
    watch: bool,

    /// JSON configuration file (defaults apply otherwise)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// JSON file of manual ratings
    #[clap(short = 'm', long)]
    manual: Option<PathBuf>,

    /// where to write the ratings CSV to
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        match (&self.dir, self.download) {
            (None, false) => bail!("either the -d or the --download flag must be specified"),
            (Some(_), true) => bail!("the -d and --download flags are mutually exclusive"),
            (Some(dir), false) if !dir.is_dir() => bail!("{} is not a directory", dir.display()),
            _ => Ok(()),
        }
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
    let source: Arc<dyn DatasetSource> = match &args.dir {
        Some(dir) => Arc::new(CsvDirSource::new(dir)),
        None => Arc::new(HttpSource::new()?),
    };
    let service = Arc::new(RatingService::new(config, source, manual)?);
    let table = service.refresh().await;
    info!("rated {} teams as of {}", table.len(), table.built_at());

    println!(
        "Competitions:\n{}",
        Console::default().render(&print::tabulate_reports(&table))
    );
    println!(
        "Ratings:\n{}",
        Console::default().render(&print::tabulate_ratings(&table))
    );

    if let Some(out) = args.out {
        let mut csv = CsvWriter::create(&out)?;
        csv.append([
            "team",
            "attack",
            "defense",
            "competition",
            "sample_size",
            "reliable",
        ])?;
        for rating in table.sorted() {
            csv.append([
                rating.team.to_string(),
                rating.attack.to_string(),
                rating.defense.to_string(),
                rating.competition.to_string(),
                rating.sample_size.to_string(),
                rating.reliable.to_string(),
            ])?;
        }
        csv.flush()?;
        info!("wrote {} ratings to {}", table.len(), out.display());
    }

    if args.watch {
        info!(
            "refreshing every {}s",
            service.config().refresh_interval().as_secs()
        );
        service.spawn_periodic().await?;
    }
    Ok(())
}
