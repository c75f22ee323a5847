use teloxide::prelude::*;

use crate::app_context::AppContext;
use crate::live::{LiveView, SessionOutcome, TransportError};

pub(crate) async fn handle_live(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    args: &str,
) -> ResponseResult<()> {
    let Some(view) = LiveView::parse(args) else {
        bot.send_message(msg.chat.id, "Usage: /live [status|temp]")
            .await?;
        return Ok(());
    };

    match app_context.live.start(msg.chat.id, view).await {
        Ok(SessionOutcome::Started | SessionOutcome::AlreadyActive) => {}
        Err(TransportError::Gone(error) | TransportError::Transient(error)) => {
            log::warn!("live_start_failed chat_id={} error={}", msg.chat.id.0, error);
            bot.send_message(msg.chat.id, "Could not start the live view, try again.")
                .await?;
        }
    }

    Ok(())
}

pub(crate) async fn handle_stoplive(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let stopped = app_context.live.stop(msg.chat.id).await;
    let text = if stopped {
        "Live view stopped."
    } else {
        "No live view is running in this chat."
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
