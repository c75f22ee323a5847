use teloxide::{prelude::*, types::ParseMode};
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;

use crate::app_context::AppContext;
use crate::metrics::gather_status_snapshot;
use crate::monitor::alerting_components;

/// Unsolicited periodic status report to the owner, a heartbeat proving
/// both the host and the bot are alive.
pub(super) fn spawn_status_report_job(
    bot: Bot,
    app_context: AppContext,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_secs(app_context.config.status_report_interval);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = sleep(interval) => {}
            }

            let owner_chat_id = match app_context.config.owner_chat_id() {
                Ok(chat_id) => chat_id,
                Err(error) => {
                    log::error!("status report skipped: invalid owner chat id: {}", error);
                    continue;
                }
            };

            let snapshot = gather_status_snapshot().await;
            let alerting = alerting_components(&app_context.debouncer).await;
            let alert_line = if alerting.is_empty() {
                "Active alerts: none".to_string()
            } else {
                format!("Active alerts: {}", alerting.join(", "))
            };

            let message = format!(
                "📅 <b>Scheduled status report</b>\n<pre>{}\n\n{}</pre>",
                html_escape::encode_text(&snapshot.to_text_body()),
                html_escape::encode_text(&alert_line)
            );

            if let Err(error) = bot
                .send_message(owner_chat_id, message)
                .parse_mode(ParseMode::Html)
                .await
            {
                log::error!("failed to send status report: {}", error);
            }
        }

        log::info!("status report job stopped");
    })
}
