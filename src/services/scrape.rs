use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};

use crate::api::{BookingApi, BookingClient};
use crate::config::{AppConfig, BookingSettings, CATEGORY, EnvFile, LOCATION_IDS, target_court_names};
use crate::domain::courts::{find_court, location_slug, snapshot_filename};
use crate::domain::{
    DateSet, FacilityQuery, QueryResult, RunSummary, ScrapeMode, ScrapeProgress, Session, Venue,
    plan_dates,
};
use crate::session::{SessionManager, TokenStore};
use crate::store::SnapshotStore;

pub const AUTH_FAILED_REASON: &str = "Authentication failed";

/// Drives one scrape run: purge, authenticate, plan, fetch, store
pub struct ScrapeService<A: BookingApi, T: TokenStore> {
    api: A,
    tokens: T,
    store: SnapshotStore,
    sessions: SessionManager,
    session: Session,
    locations: Vec<u32>,
    target_courts: Vec<String>,
}

impl ScrapeService<BookingClient, EnvFile> {
    /// Wire the live client, reading connection details from the env file now
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let booking = BookingSettings::load(&config.storage.env_file)?;
        Ok(Self::new(
            BookingClient::new(&config.scraper)?,
            EnvFile::new(&config.storage.env_file),
            SnapshotStore::new(&config.storage.data_dir),
            SessionManager::new(config.scraper.probe_policy),
            booking.into_session(),
        ))
    }
}

impl<A: BookingApi, T: TokenStore> ScrapeService<A, T> {
    pub fn new(
        api: A,
        tokens: T,
        store: SnapshotStore,
        sessions: SessionManager,
        session: Session,
    ) -> Self {
        Self {
            api,
            tokens,
            store,
            sessions,
            session,
            locations: LOCATION_IDS.to_vec(),
            target_courts: target_court_names(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(&mut self, mode: &ScrapeMode) -> RunSummary {
        self.run_on(mode, Local::now().date_naive()).await
    }

    pub async fn run_on(&mut self, mode: &ScrapeMode, today: NaiveDate) -> RunSummary {
        info!("=== Starting Scrape ({}) ===\n", mode);

        // Step 1: Clear the previous run's snapshots
        self.purge_snapshots();

        // Step 2: Authenticate
        if let Err(e) = self.authenticate(today).await {
            error!("Auth failed: {}. Aborting.", e);
            return RunSummary::failed(AUTH_FAILED_REASON);
        }

        // Step 3: Plan dates
        let dates = match self.plan(mode, today) {
            Ok(dates) => dates,
            Err(reason) => return RunSummary::failed(reason),
        };

        // Step 4: Fetch and store
        let progress = self.scrape_dates(&dates).await;

        info!("=== Scrape Complete ===");
        RunSummary::Success {
            dates_processed: dates.len(),
            snapshots_saved: progress.snapshots_saved(),
            pairs_skipped: progress.pairs_skipped(),
        }
    }

    fn purge_snapshots(&self) {
        info!("Step 1: Cleaning {}...", self.store.data_dir().display());
        let report = self.store.purge();
        info!(
            "  → Removed {} entries, kept {}, {} failed\n",
            report.removed, report.kept, report.failed
        );
    }

    async fn authenticate(&mut self, today: NaiveDate) -> Result<(), crate::errors::AuthError> {
        info!("Step 2: Authenticating...");
        let previous_token = self.session.token.clone();

        let session = self
            .sessions
            .ensure_authenticated(&mut self.api, &self.tokens, self.session.clone(), today)
            .await?;

        if session.token != previous_token {
            if let Some(token) = session.token.as_deref() {
                if let Err(e) = self.store.save_token_marker(token) {
                    warn!("Failed to write token marker: {}", e);
                }
            }
        }

        self.session = session;
        Ok(())
    }

    fn plan(&self, mode: &ScrapeMode, today: NaiveDate) -> Result<DateSet, String> {
        info!("Step 3: Planning dates...");
        match plan_dates(mode, today) {
            Ok(dates) => {
                info!("  → {} dates planned\n", dates.len());
                Ok(dates)
            }
            Err(e) => {
                error!("Date planning failed: {}", e);
                Err(e.to_string())
            }
        }
    }

    async fn scrape_dates(&mut self, dates: &DateSet) -> ScrapeProgress {
        info!(
            "Step 4: Starting scrape for {} dates across {} locations...",
            dates.len(),
            self.locations.len()
        );

        let pairs: Vec<(u32, NaiveDate)> = scrape_pairs(&self.locations, dates).collect();
        let mut progress = ScrapeProgress::new(pairs.len());

        for (location_id, date) in pairs {
            info!("Processing {} @ Loc {}", date, location_id);
            let query = FacilityQuery::new(CATEGORY, location_id, date);
            let result = self.api.search_facilities(&self.session, &query).await;
            self.record_result(&query, result, &mut progress);
        }

        progress
    }

    fn record_result(&self, query: &FacilityQuery, result: QueryResult, progress: &mut ScrapeProgress) {
        match result {
            QueryResult::Success { venues } if !venues.is_empty() => {
                let saved = self.save_target_courts(&venues, query.date);
                progress.record_saved(saved);
            }
            QueryResult::Success { .. } => {
                info!("  → No venues at Loc {} on {}", query.location_id, query.date);
                progress.record_skipped();
            }
            QueryResult::Unauthorized => {
                warn!("  → Unauthorized for Loc {} on {}, skipping", query.location_id, query.date);
                progress.record_skipped();
            }
            QueryResult::TransportError(message) => {
                warn!("  → Fetch failed for Loc {} on {}: {}", query.location_id, query.date, message);
                progress.record_skipped();
            }
        }
    }

    /// Save a snapshot for every target court present in `venues`
    fn save_target_courts(&self, venues: &[Venue], date: NaiveDate) -> usize {
        let slug = location_slug(venues);
        let mut saved = 0;

        for court_name in &self.target_courts {
            let Some(venue) = find_court(venues, court_name) else {
                continue;
            };
            let filename = snapshot_filename(&slug, court_name, date);
            match self.store.save(venue, &filename) {
                Ok(_) => saved += 1,
                Err(e) => warn!("Failed to save {}: {}", filename, e),
            }
        }

        saved
    }
}

/// Build the live service from config and run it once
///
/// A config problem (missing credentials, unreadable env file) ends the run
/// the same way an auth failure does: as a failed summary.
pub async fn run_scrape(config: &AppConfig, mode: &ScrapeMode) -> RunSummary {
    match ScrapeService::from_config(config) {
        Ok(mut service) => service.run(mode).await,
        Err(e) => {
            error!("Failed to set up scraper: {:#}", e);
            RunSummary::failed(format!("Configuration error: {:#}", e))
        }
    }
}

/// Every (location, date) pair in scrape order: locations outer, dates inner
fn scrape_pairs<'a>(
    locations: &'a [u32],
    dates: &'a DateSet,
) -> impl Iterator<Item = (u32, NaiveDate)> + 'a {
    locations
        .iter()
        .flat_map(move |&location| dates.iter().map(move |&date| (location, date)))
}
