use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;
use crate::metrics::list_containers;
use crate::system::run_cmd;

use super::super::{
    command_def::MyCommands,
    helpers::{acquire_command_slot, as_html_block, command_body, command_error_html, timeout_for},
};

const CONTAINER_ACTIONS: [&str; 4] = ["start", "stop", "restart", "logs"];
const LOG_TAIL_LINES: &str = "50";

pub(super) fn parse_container_request<'a>(
    args: &'a str,
    tracked: &[String],
) -> Result<(&'a str, &'a str), String> {
    let mut parts = args.split_whitespace();
    let (Some(action), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!(
            "Usage: /dockerctl <{}> <name>",
            CONTAINER_ACTIONS.join("|")
        ));
    };

    if !CONTAINER_ACTIONS.contains(&action) {
        return Err(format!(
            "Unknown action {:?}. Expected one of: {}",
            action,
            CONTAINER_ACTIONS.join(", ")
        ));
    }

    if !tracked.iter().any(|tracked_name| tracked_name == name) {
        return Err(format!(
            "Container {:?} is not in the monitored list. Add it to the config first.",
            name
        ));
    }

    Ok((action, name))
}

pub(crate) async fn handle_docker(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    if !app_context.capabilities.has_docker {
        bot.send_message(
            msg.chat.id,
            as_html_block("Docker", "docker is not available on this host."),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let message = match list_containers(timeout).await {
        Ok(containers) if containers.is_empty() => as_html_block("Docker", "No containers."),
        Ok(containers) => {
            let body = containers
                .iter()
                .map(|container| {
                    let marker = if container.running { "🟢" } else { "🔴" };
                    format!(
                        "{} {} ({})\n   {}",
                        marker, container.name, container.image, container.status
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            as_html_block("Docker", &body)
        }
        Err(error) => as_html_block("Docker", &format!("Listing failed: {}", error)),
    };

    bot.send_message(msg.chat.id, message)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_dockerctl(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
    args: &str,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    let (action, name) = match parse_container_request(args, &app_context.config.alerts.containers)
    {
        Ok(request) => request,
        Err(usage) => {
            bot.send_message(msg.chat.id, as_html_block("Docker control", &usage))
                .parse_mode(ParseMode::Html)
                .await?;
            return Ok(());
        }
    };

    log::info!(
        "container_control action={} container={} chat_id={}",
        action,
        name,
        msg.chat.id.0
    );

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let title = format!("Docker {} {}", action, name);
    let args: Vec<&str> = if action == "logs" {
        vec!["logs", "--tail", LOG_TAIL_LINES, name]
    } else {
        vec![action, name]
    };
    let message = match run_cmd("docker", &args, timeout).await {
        Ok(output) => as_html_block(&title, &command_body(&output)),
        Err(error) => command_error_html(&error),
    };

    bot.send_message(msg.chat.id, message)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_container_request;

    #[test]
    fn accepts_tracked_container_actions_only() {
        let tracked = vec!["redis".to_string()];
        assert_eq!(
            parse_container_request("restart redis", &tracked).unwrap(),
            ("restart", "redis")
        );
        assert_eq!(
            parse_container_request("logs redis", &tracked).unwrap(),
            ("logs", "redis")
        );
        assert!(parse_container_request("pause redis", &tracked).is_err());
        assert!(parse_container_request("stop web", &tracked).is_err());
        assert!(parse_container_request("", &tracked).is_err());
    }
}
