use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;
use crate::system::{run_cmd, run_sudo};

use super::super::{
    command_def::MyCommands,
    helpers::{acquire_command_slot, as_html_block, command_body, command_error_html, timeout_for},
};

const SERVICE_ACTIONS: [&str; 4] = ["status", "start", "stop", "restart"];

#[derive(Debug, PartialEq, Eq)]
pub(super) struct ServiceRequest<'a> {
    pub(super) action: &'a str,
    pub(super) name: &'a str,
}

/// Parse "restart nginx" into an action plus a unit name. Only the known
/// actions are accepted and the name must be one of the tracked units.
pub(super) fn parse_service_request<'a>(
    args: &'a str,
    tracked: &[String],
) -> Result<ServiceRequest<'a>, String> {
    let mut parts = args.split_whitespace();
    let (Some(action), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!(
            "Usage: /service <{}> <name>",
            SERVICE_ACTIONS.join("|")
        ));
    };

    if !SERVICE_ACTIONS.contains(&action) {
        return Err(format!(
            "Unknown action {:?}. Expected one of: {}",
            action,
            SERVICE_ACTIONS.join(", ")
        ));
    }

    if !tracked.iter().any(|tracked_name| tracked_name == name) {
        return Err(format!(
            "Service {:?} is not in the monitored list. Add it to the config first.",
            name
        ));
    }

    Ok(ServiceRequest { action, name })
}

/// One line per monitored unit with its `systemctl is-active` answer.
pub(crate) async fn handle_services(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    if !app_context.capabilities.is_systemd {
        bot.send_message(
            msg.chat.id,
            as_html_block("Services", "systemd is not available on this host."),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    let tracked = &app_context.config.alerts.services;
    if tracked.is_empty() {
        bot.send_message(
            msg.chat.id,
            as_html_block("Services", "No services are configured for monitoring."),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let mut lines = Vec::with_capacity(tracked.len());
    for name in tracked {
        let state = match run_cmd("systemctl", &["is-active", name], timeout).await {
            Ok(output) => output.stdout.trim().to_string(),
            Err(error) => format!("probe failed: {}", error),
        };
        lines.push(format!("{}: {}", name, state));
    }

    bot.send_message(msg.chat.id, as_html_block("Services", &lines.join("\n")))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_service(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    cmd: &MyCommands,
    args: &str,
) -> ResponseResult<()> {
    let Some(_permit) = acquire_command_slot(&app_context.command_slots, msg, bot).await? else {
        return Ok(());
    };

    let request = match parse_service_request(args, &app_context.config.alerts.services) {
        Ok(request) => request,
        Err(usage) => {
            bot.send_message(msg.chat.id, as_html_block("Service", &usage))
                .parse_mode(ParseMode::Html)
                .await?;
            return Ok(());
        }
    };

    let timeout = timeout_for(cmd, app_context.config.command_timeout_secs);
    let result = if request.action == "status" {
        run_cmd(
            "systemctl",
            &["status", "--no-pager", "-l", request.name],
            timeout,
        )
        .await
    } else {
        log::info!(
            "service_control action={} unit={} chat_id={}",
            request.action,
            request.name,
            msg.chat.id.0
        );
        run_sudo(&["systemctl", request.action, request.name], timeout).await
    };

    let title = format!("Service {} {}", request.action, request.name);
    let message = match result {
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
    use super::{ServiceRequest, parse_service_request};

    fn tracked() -> Vec<String> {
        vec!["nginx".to_string(), "postgresql".to_string()]
    }

    #[test]
    fn accepts_known_action_on_tracked_unit() {
        let request = parse_service_request("restart nginx", &tracked()).unwrap();
        assert_eq!(
            request,
            ServiceRequest {
                action: "restart",
                name: "nginx"
            }
        );
    }

    #[test]
    fn rejects_unknown_action_and_untracked_unit() {
        assert!(parse_service_request("enable nginx", &tracked()).is_err());
        assert!(parse_service_request("stop sshd", &tracked()).is_err());
    }

    #[test]
    fn rejects_missing_or_extra_arguments() {
        assert!(parse_service_request("", &tracked()).is_err());
        assert!(parse_service_request("restart", &tracked()).is_err());
        assert!(parse_service_request("restart nginx now", &tracked()).is_err());
    }
}
