use slog::{info, Logger};
use std::sync::Arc;

use crate::{
    filter_by_station, parse_date, to_map_points, to_summary, to_table, to_wind_rose, Clock,
    DailyReport, Error, FetchOrchestrator, MapPoint, Observation, ReportBuilder, ResultCache,
    Summary, TimeWindow, WindRose,
};

/// The query surface: every view of the classified set for a window, plus the
/// daily report. All of them read through one cache.
pub struct DustService {
    logger: Logger,
    orchestrator: FetchOrchestrator,
    cache: ResultCache,
    clock: Arc<dyn Clock>,
    reports: ReportBuilder,
}

impl DustService {
    pub fn new(
        logger: Logger,
        orchestrator: FetchOrchestrator,
        cache: ResultCache,
        clock: Arc<dyn Clock>,
        reports: ReportBuilder,
    ) -> Self {
        Self {
            logger,
            orchestrator,
            cache,
            clock,
            reports,
        }
    }

    async fn classified(&self, window: &TimeWindow) -> Result<Arc<Vec<Observation>>, Error> {
        let key = window.key();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let span = window.span(self.clock.now());
        let observations = self.orchestrator.fetch(span).await?;
        info!(
            self.logger,
            "fetched {} dust observations for {}",
            observations.len(),
            key
        );
        Ok(self.cache.insert(key, observations).await)
    }

    pub async fn observations(
        &self,
        window: &TimeWindow,
        station: Option<&str>,
    ) -> Result<Vec<Observation>, Error> {
        let classified = self.classified(window).await?;
        Ok(match station.filter(|s| !s.trim().is_empty()) {
            Some(station) => filter_by_station(&classified, station),
            None => to_table(&classified),
        })
    }

    pub async fn summary(&self, window: &TimeWindow) -> Result<Summary, Error> {
        Ok(to_summary(&self.classified(window).await?))
    }

    pub async fn map_points(&self, window: &TimeWindow) -> Result<Vec<MapPoint>, Error> {
        Ok(to_map_points(&self.classified(window).await?))
    }

    pub async fn wind_rose(
        &self,
        window: &TimeWindow,
        station: Option<&str>,
    ) -> Result<WindRose, Error> {
        let observations = self.observations(window, station).await?;
        Ok(to_wind_rose(&observations))
    }

    /// Report for one `YYYY-MM-DD` day. The date is checked before anything is fetched.
    pub async fn report(&self, date: &str) -> Result<DailyReport, Error> {
        let date = parse_date(date)?;
        let observations = self.classified(&TimeWindow::day(date)).await?;
        Ok(self.reports.build(date, &observations))
    }
}
