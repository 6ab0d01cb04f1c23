//! Owns the published rating table: rebuilds it from the dataset source and swaps it in whole,
//! while fixtures are priced against whichever table was current when they started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::alias::TeamAliases;
use crate::config::{CompetitionConfig, Config};
use crate::domain::CompetitionDataset;
use crate::error::InvalidParameter;
use crate::fixture::{self, FixtureError, FixturePrices};
use crate::manual::ManualRatings;
use crate::normalise::{self, SchemaError};
use crate::rating::{self, DegenerateInput, TeamRating};
use crate::source::{DatasetSource, SourceError};
use crate::table::RatingTable;
use crate::timed::Timed;

/// Why a competition contributed nothing to a refresh.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Degenerate(#[from] DegenerateInput),

    #[error("{0}")]
    Invalid(#[from] InvalidParameter),
}

/// Fetches, normalises and rates a single competition.
pub async fn load_competition(
    source: &dyn DatasetSource,
    competition: &CompetitionConfig,
    config: &Config,
    aliases: &TeamAliases,
) -> Result<Vec<TeamRating>, LoadError> {
    let table = source.fetch(competition).await?;
    let normalised = normalise::normalise(
        &table,
        &competition.columns,
        competition.season.as_deref(),
        aliases,
    )?;
    let dataset = CompetitionDataset::new(
        competition.id.clone(),
        competition.strength_weight,
        normalised.matches,
    )?;
    let timed = Timed::result(|| rating::rate(&dataset, config.min_sample_size, config.reliability))?;
    debug!(
        "{}: {} matches ({} rows dropped, {} from other seasons) rated in {:?}",
        competition.id,
        dataset.matches().len(),
        normalised.dropped,
        normalised.out_of_season,
        timed.elapsed
    );
    Ok(timed.value)
}

/// Loads every configured competition in order and merges the results, followed by `manual`. A
/// competition that fails to load is reported in the table and otherwise skipped.
pub async fn build_table(
    source: &dyn DatasetSource,
    config: &Config,
    aliases: &TeamAliases,
    manual: &[TeamRating],
) -> RatingTable {
    let mut builder = RatingTable::builder();
    for competition in &config.competitions {
        match load_competition(source, competition, config, aliases).await {
            Ok(ratings) => builder.merge_competition(competition.id.clone(), ratings),
            Err(err) => {
                warn!("competition {} contributed no ratings: {err}", competition.id);
                builder.record_failure(competition.id.clone(), err);
            }
        }
    }
    builder.merge_manual(manual.to_vec());
    builder.build()
}

pub struct RatingService {
    config: Config,
    aliases: TeamAliases,
    manual: Vec<TeamRating>,
    source: Arc<dyn DatasetSource>,
    table: RwLock<Arc<RatingTable>>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}
impl RatingService {
    /// Creates a service with an empty table; call [RatingService::refresh] to populate it.
    pub fn new(
        config: Config,
        source: Arc<dyn DatasetSource>,
        manual: ManualRatings,
    ) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let aliases = TeamAliases::new(&config.aliases);
        let manual = manual
            .to_team_ratings(&aliases)
            .context("invalid manual rating")?;
        Ok(Self {
            config,
            aliases,
            manual,
            source,
            table: RwLock::new(Arc::new(RatingTable::empty())),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently published table. It stays consistent for as long as the caller holds it,
    /// regardless of later refreshes.
    pub fn snapshot(&self) -> Arc<RatingTable> {
        self.table.read().clone()
    }

    /// Number of tables published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Rebuilds the table and publishes it. If another refresh completes while this one is
    /// waiting its turn, that refresh's table is returned instead of building another.
    pub async fn refresh(&self) -> Arc<RatingTable> {
        let observed = self.generation();
        let _guard = self.refresh_lock.lock().await;
        if self.generation() != observed {
            debug!("refresh coalesced into generation {}", self.generation());
            return self.snapshot();
        }

        let timed = Timed::future(build_table(
            self.source.as_ref(),
            &self.config,
            &self.aliases,
            &self.manual,
        ))
        .await;
        let table = Arc::new(timed.value);
        *self.table.write() = table.clone();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            "published {} ratings (generation {generation}, {} manual) in {:.3}s",
            table.len(),
            self.manual.len(),
            timed.elapsed.as_secs_f64()
        );
        table
    }

    /// Prices a fixture against the current snapshot. Team names are canonicalised first.
    pub fn price(&self, home: &str, away: &str) -> Result<FixturePrices, FixtureError> {
        let home = self.aliases.resolve(home);
        let away = self.aliases.resolve(away);
        let table = self.snapshot();
        fixture::price(&table, &self.config, home.as_str(), away.as_str())
    }

    /// Refreshes once every configured refresh interval, starting one interval from now, until
    /// the task is aborted.
    pub fn spawn_periodic(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let period = self.config.refresh_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                service.refresh().await;
            }
        })
    }
}
