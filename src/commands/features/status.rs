use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::app_context::AppContext;
use crate::commands::command_def::MyCommands;
use crate::metrics::gather_status_snapshot;
use crate::monitor::alerting_components;

use super::super::helpers::send_html_or_file;

pub(crate) async fn handle_help(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, MyCommands::descriptions().to_string())
        .await?;
    Ok(())
}

/// Full host overview plus the monitor's own vital signs.
pub(crate) async fn handle_status(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let snapshot = gather_status_snapshot().await;
    let alerting = alerting_components(&app_context.debouncer).await;
    let last_scan_tick = *app_context.last_scan_tick.lock().await;
    let live_sessions = app_context.live.active_session_count().await;

    let last_scan_text = last_scan_tick
        .map(|tick| tick.to_rfc3339())
        .unwrap_or_else(|| "not yet".to_string());
    let alerting_text = if alerting.is_empty() {
        "none".to_string()
    } else {
        alerting.join(", ")
    };

    let body = format!(
        "{}\n\nMonitor:\n  Last scan: {}\n  Active alerts: {}\n  Live views: {}",
        snapshot.to_text_body(),
        last_scan_text,
        alerting_text,
        live_sessions
    );

    send_html_or_file(bot, msg.chat.id, "System Status", &body).await
}
