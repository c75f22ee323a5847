use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::app_context::AppContext;

use super::command_def::MyCommands;
use super::helpers::is_authorized;
use super::router::route_command;

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: Arc<AppContext>,
) -> ResponseResult<()> {
    let config = &app_context.config;
    if !is_authorized(&msg, config) {
        let user_id = msg
            .from()
            .map(|user| user.id.0.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        log::warn!(
            "SECURITY: Unauthorized access attempt. mode=owner_dm_only user_id={} chat_id={} command_text={:?}",
            user_id,
            msg.chat.id.0,
            msg.text()
        );
        return Ok(());
    }

    route_command(bot, msg, cmd, &app_context).await
}

pub async fn answer_callback(
    bot: Bot,
    q: CallbackQuery,
    app_context: Arc<AppContext>,
) -> ResponseResult<()> {
    bot.answer_callback_query(&q.id).await?;

    let (Some(msg), Some(data)) = (q.message, q.data) else {
        return Ok(());
    };

    if app_context.config.owner_user_id() != q.from.id {
        log::warn!(
            "SECURITY: Unauthorized callback. user_id={} data={:?}",
            q.from.id.0,
            data
        );
        return Ok(());
    }

    if data == "cmd:cancel" {
        bot.edit_message_text(msg.chat.id, msg.id, "Cancelled.")
            .await?;
        return Ok(());
    }

    let Some(command_str) = command_from_payload(&data) else {
        return Ok(());
    };

    let cmd = match MyCommands::parse(&command_str, "argus_bot") {
        Ok(cmd) => cmd,
        Err(_) => return Ok(()),
    };

    route_command(bot, msg, cmd, &app_context).await
}

// "cmd:reboot:now" → "/reboot now"
// "cmd:status"     → "/status"
fn command_from_payload(data: &str) -> Option<String> {
    let parts: Vec<&str> = data.splitn(3, ':').collect();
    if parts.first() != Some(&"cmd") || parts.len() < 2 || parts[1].is_empty() {
        return None;
    }

    Some(if parts.len() == 3 {
        format!("/{} {}", parts[1], parts[2])
    } else {
        format!("/{}", parts[1])
    })
}

#[cfg(test)]
mod tests {
    use super::command_from_payload;

    #[test]
    fn payloads_map_to_slash_commands() {
        assert_eq!(
            command_from_payload("cmd:reboot:now"),
            Some("/reboot now".to_string())
        );
        assert_eq!(command_from_payload("cmd:status"), Some("/status".to_string()));
    }

    #[test]
    fn malformed_payloads_are_ignored() {
        assert_eq!(command_from_payload("reboot:now"), None);
        assert_eq!(command_from_payload("cmd:"), None);
        assert_eq!(command_from_payload(""), None);
    }
}
