use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
};

use crate::app_context::AppContext;
use crate::system::run_sudo;

use super::super::{
    command_def::MyCommands,
    helpers::{
        acquire_command_slot, as_html_block, command_body, command_error_html, send_html_or_file,
        timeout_for,
    },
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum PowerAction {
    Reboot,
    Shutdown,
    Update,
}

impl PowerAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::Shutdown => "shutdown",
            Self::Update => "update",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Self::Reboot => "Reboot the server?",
            Self::Shutdown => "Shut the server down? You will need out-of-band access to start it again.",
            Self::Update => "Run apt-get update and upgrade?",
        }
    }
}

/// Destructive commands run only when invoked with the explicit "now"
/// argument; a bare invocation answers with a confirmation keyboard whose
/// button re-sends the command with "now" appended.
pub(crate) async fn handle_power(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
    action: PowerAction,
    args: &str,
) -> ResponseResult<()> {
    if args.trim() != "now" {
        let keyboard = InlineKeyboardMarkup::new([[
            InlineKeyboardButton::callback(
                "✅ Confirm",
                format!("cmd:{}:now", action.verb()),
            ),
            InlineKeyboardButton::callback("❌ Cancel", "cmd:cancel"),
        ]]);
        bot.send_message(msg.chat.id, action.prompt())
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }

    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    log::warn!(
        "power_action action={} chat_id={}",
        action.verb(),
        msg.chat.id.0
    );

    match action {
        PowerAction::Reboot => run_system_transition(bot, msg, app_context, cmd, "reboot").await,
        PowerAction::Shutdown => {
            run_system_transition(bot, msg, app_context, cmd, "poweroff").await
        }
        PowerAction::Update => run_package_update(bot, msg, app_context, cmd).await,
    }
}

async fn run_system_transition(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
    systemctl_verb: &str,
) -> ResponseResult<()> {
    // Confirm before executing: once the command lands the host goes away.
    bot.send_message(msg.chat.id, format!("Running {} now.", systemctl_verb))
        .await?;

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let result = if app_context.capabilities.is_systemd {
        run_sudo(&["systemctl", systemctl_verb], timeout).await
    } else {
        run_sudo(&[systemctl_verb], timeout).await
    };

    // Only a failure produces a follow-up message.
    match result {
        Ok(output) if output.succeeded() => {}
        Ok(output) => {
            bot.send_message(
                msg.chat.id,
                as_html_block(
                    &format!("{} failed", systemctl_verb),
                    &command_body(&output),
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        Err(error) => {
            bot.send_message(msg.chat.id, command_error_html(&error))
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

async fn run_package_update(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    if !app_context.capabilities.has_apt {
        bot.send_message(
            msg.chat.id,
            as_html_block("Update", "apt-get is not available on this host."),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Updating packages, this can take a while...")
        .await?;

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let refresh = run_sudo(&["apt-get", "update"], timeout).await;
    let upgrade = match &refresh {
        Ok(output) if output.succeeded() => {
            Some(run_sudo(&["apt-get", "upgrade", "-y"], timeout).await)
        }
        _ => None,
    };

    match (refresh, upgrade) {
        (Ok(refresh_out), Some(Ok(upgrade_out))) => {
            let body = format!(
                "apt-get update:\n{}\n\napt-get upgrade:\n{}",
                command_body(&refresh_out),
                command_body(&upgrade_out)
            );
            send_html_or_file(bot, msg.chat.id, "Package Update", &body).await?;
        }
        (Ok(refresh_out), None) => {
            send_html_or_file(
                bot,
                msg.chat.id,
                "Package Update failed",
                &command_body(&refresh_out),
            )
            .await?;
        }
        (Err(error), _) | (_, Some(Err(error))) => {
            bot.send_message(msg.chat.id, command_error_html(&error))
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}
