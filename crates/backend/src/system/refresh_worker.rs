use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::dashboards::d100_floor_prices::refresh::{refresh_market_data, RefreshReport};
use crate::dashboards::d100_floor_prices::snapshot::market_snapshot;
use crate::shared::data::db::get_connection;
use crate::shared::market_data::MarketDataSource;

/// Фоновый воркер обновления рыночных данных.
pub struct MarketRefreshWorker {
    source: Arc<dyn MarketDataSource>,
    collections: Vec<String>,
    interval_seconds: u64,
}

impl MarketRefreshWorker {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        collections: Vec<String>,
        interval_seconds: u64,
    ) -> Self {
        Self {
            source,
            collections,
            interval_seconds: interval_seconds.max(1),
        }
    }

    /// Один цикл обновления; ошибки только логируются.
    pub async fn refresh_once(&self) -> Option<RefreshReport> {
        match refresh_market_data(
            self.source.as_ref(),
            get_connection(),
            market_snapshot(),
            &self.collections,
        )
        .await
        {
            Ok(report) => {
                if report.tokens_failed > 0 || !report.rates_updated {
                    warn!(
                        "Market refresh finished partially: {} tokens updated, {} failed, rates updated: {}",
                        report.tokens_updated, report.tokens_failed, report.rates_updated
                    );
                } else {
                    info!(
                        "Market refresh finished: {} tokens updated",
                        report.tokens_updated
                    );
                }
                Some(report)
            }
            Err(e) => {
                error!("Market refresh failed: {:?}", e);
                None
            }
        }
    }

    /// Запускает цикл обновления. Первый тик interval срабатывает сразу,
    /// поэтому он пропускается: стартовое обновление делает `main`.
    pub async fn run_loop(&self) {
        info!(
            "Market refresh worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;

        loop {
            interval.tick().await;
            self.refresh_once().await;
        }
    }
}
