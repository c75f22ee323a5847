use chrono::Utc;
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::app_context::AppContext;
use crate::metrics::SystemMetricSource;
use crate::monitor::check_alerts;

/// The alert-scan loop. One `SystemMetricSource` lives for the whole loop
/// so CPU usage deltas are measured against the previous cycle.
pub(super) fn spawn_scan_job(
    bot: Bot,
    app_context: AppContext,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_secs(app_context.config.scan_interval);
        let mut source = SystemMetricSource::new(app_context.config.command_timeout_secs);

        loop {
            let cycle_started = Instant::now();
            {
                let mut tick = app_context.last_scan_tick.lock().await;
                *tick = Some(Utc::now());
            }

            check_alerts(
                &bot,
                &app_context.config,
                &app_context.debouncer,
                &mut source,
            )
            .await;

            let elapsed = cycle_started.elapsed();
            if elapsed > interval {
                log::warn!(
                    "scan_cycle_overrun elapsed_secs={} interval_secs={}",
                    elapsed.as_secs(),
                    interval.as_secs()
                );
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = sleep(interval.saturating_sub(elapsed)) => {}
            }
        }

        log::info!("scan job stopped");
    })
}
