use std::path::Path;

use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;
use crate::metrics::{format_thermal_report, read_thermal_zones, top_processes};
use crate::system::run_cmd;

use super::super::{
    command_def::MyCommands,
    helpers::{acquire_command_slot, as_html_block, command_body, command_error_html, timeout_for},
};

pub(crate) async fn handle_temp(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    let message = match read_thermal_zones(Path::new("/sys/class/thermal")) {
        Ok(zones) => as_html_block("Temperatures", &format_thermal_report(&zones)),
        // No sysfs zones; lm-sensors may still know this board.
        Err(_) if app_context.capabilities.has_sensors => {
            let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
            match run_cmd("sensors", &[], timeout).await {
                Ok(output) => as_html_block("Temperatures", &command_body(&output)),
                Err(error) => command_error_html(&error),
            }
        }
        Err(error) => as_html_block("Temperatures", &format!("No thermal data: {}", error)),
    };

    bot.send_message(msg.chat.id, message)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_processes(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    let body = top_processes(10);
    bot.send_message(msg.chat.id, as_html_block("Top Processes", &body))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub(crate) async fn handle_network(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    if !app_context.capabilities.has_ip {
        bot.send_message(
            msg.chat.id,
            as_html_block("Network", "The ip tool is not available on this host."),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let addresses = run_cmd("ip", &["-brief", "addr"], timeout).await;
    let sockets = run_cmd("ss", &["-s"], timeout).await;

    let message = match (addresses, sockets) {
        (Ok(addresses), Ok(sockets)) => {
            let body = format!(
                "Interfaces:\n{}\n\nSockets:\n{}",
                command_body(&addresses),
                command_body(&sockets)
            );
            as_html_block("Network", &body)
        }
        (Err(error), _) | (_, Err(error)) => command_error_html(&error),
    };

    bot.send_message(msg.chat.id, message)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_ip(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };
    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);

    let public = if app_context.capabilities.has_curl {
        match run_cmd("curl", &["-s", "--max-time", "10", "https://api.ipify.org"], timeout).await {
            Ok(output) if output.succeeded() && !output.stdout.trim().is_empty() => {
                output.stdout.trim().to_string()
            }
            Ok(_) | Err(_) => "lookup failed".to_string(),
        }
    } else {
        "curl not available".to_string()
    };

    let local = match run_cmd("hostname", &["-I"], timeout).await {
        Ok(output) if output.succeeded() => output.stdout.trim().to_string(),
        Ok(output) => command_body(&output),
        Err(error) => error.to_string(),
    };

    let body = format!("Public: {}\nLocal: {}", public, local);
    bot.send_message(msg.chat.id, as_html_block("IP Addresses", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
