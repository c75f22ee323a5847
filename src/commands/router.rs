use teloxide::prelude::*;

use crate::app_context::AppContext;

use super::command_def::MyCommands;
use super::features::{
    docker::{handle_docker, handle_dockerctl},
    live::{handle_live, handle_stoplive},
    power::{PowerAction, handle_power},
    services::{handle_service, handle_services},
    status::{handle_help, handle_status},
    system_info::{handle_ip, handle_network, handle_processes, handle_temp},
};

pub(super) async fn route_command(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    match &cmd {
        MyCommands::Help => handle_help(&bot, &msg).await?,
        MyCommands::Status => handle_status(&bot, &msg, app_context).await?,
        MyCommands::Temp => handle_temp(&bot, &msg, app_context, &cmd).await?,
        MyCommands::Processes => handle_processes(&bot, &msg).await?,
        MyCommands::Services => handle_services(&bot, &msg, app_context, &cmd).await?,
        MyCommands::Service(args) => {
            handle_service(&bot, &msg, app_context, &cmd, args).await?
        }
        MyCommands::Docker => handle_docker(&bot, &msg, app_context, &cmd).await?,
        MyCommands::Dockerctl(args) => {
            handle_dockerctl(&bot, &msg, app_context, &cmd, args).await?
        }
        MyCommands::Network => handle_network(&bot, &msg, app_context, &cmd).await?,
        MyCommands::Ip => handle_ip(&bot, &msg, app_context, &cmd).await?,
        MyCommands::Live(args) => handle_live(&bot, &msg, app_context, args).await?,
        MyCommands::Stoplive => handle_stoplive(&bot, &msg, app_context).await?,
        MyCommands::Reboot(args) => {
            handle_power(&bot, &msg, app_context, &cmd, PowerAction::Reboot, args).await?
        }
        MyCommands::Shutdown(args) => {
            handle_power(&bot, &msg, app_context, &cmd, PowerAction::Shutdown, args).await?
        }
        MyCommands::Update(args) => {
            handle_power(&bot, &msg, app_context, &cmd, PowerAction::Update, args).await?
        }
    }

    Ok(())
}
