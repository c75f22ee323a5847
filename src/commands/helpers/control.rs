use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::formatting::as_html_block;
use crate::commands::command_def::MyCommands;

const FAST_TIMEOUT_SECS: u64 = 5;
const TELEGRAM_FILE_FALLBACK_THRESHOLD: usize = 3900;

/// Snapshot-style commands answer from in-process data and get a short
/// timeout; everything that shells out gets the configured one.
pub(crate) fn timeout_for(cmd: &MyCommands, command_timeout_secs: u64) -> u64 {
    match cmd {
        MyCommands::Help
        | MyCommands::Status
        | MyCommands::Processes
        | MyCommands::Temp
        | MyCommands::Live(_)
        | MyCommands::Stoplive => FAST_TIMEOUT_SECS,
        MyCommands::Services
        | MyCommands::Service(_)
        | MyCommands::Docker
        | MyCommands::Dockerctl(_)
        | MyCommands::Network
        | MyCommands::Ip
        | MyCommands::Reboot(_)
        | MyCommands::Shutdown(_)
        | MyCommands::Update(_) => command_timeout_secs,
    }
}

pub(crate) async fn acquire_command_slot(
    command_slots: &Arc<Semaphore>,
    msg: &Message,
    bot: &Bot,
) -> ResponseResult<Option<OwnedSemaphorePermit>> {
    match command_slots.clone().acquire_owned().await {
        Ok(permit) => Ok(Some(permit)),
        Err(error) => {
            log::error!("failed to acquire command semaphore: {}", error);
            bot.send_message(
                msg.chat.id,
                as_html_block(
                    "Command queue error",
                    "Could not acquire command slot. Please try again.",
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
            Ok(None)
        }
    }
}

/// Send `body` as an HTML block, falling back to a file attachment when it
/// would not fit in a Telegram message.
pub(crate) async fn send_html_or_file(
    bot: &Bot,
    chat_id: ChatId,
    title: &str,
    body: &str,
) -> ResponseResult<()> {
    let escaped_len = html_escape::encode_text(body).len();
    if escaped_len <= TELEGRAM_FILE_FALLBACK_THRESHOLD {
        bot.send_message(chat_id, as_html_block(title, body))
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    bot.send_message(
        chat_id,
        as_html_block(
            title,
            "Output is too long for a Telegram message. Sent as file attachment.",
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    let file_name = format!(
        "{}-output.txt",
        title.to_lowercase().replace([' ', '/'], "-")
    );
    bot.send_document(
        chat_id,
        InputFile::memory(body.as_bytes().to_vec()).file_name(file_name),
    )
    .await?;

    Ok(())
}
