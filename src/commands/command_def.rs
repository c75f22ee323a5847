use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum MyCommands {
    #[command(description = "Show help menu.")]
    Help,
    #[command(description = "Show CPU, RAM, disk and uptime overview.")]
    Status,
    #[command(description = "Show temperature sensors.")]
    Temp,
    #[command(description = "Show top processes by CPU and memory.")]
    Processes,
    #[command(description = "Show the state of monitored services.")]
    Services,
    #[command(description = "Manage a service, e.g. /service restart nginx")]
    Service(String),
    #[command(description = "List Docker containers.")]
    Docker,
    #[command(description = "Manage a container, e.g. /dockerctl restart redis")]
    Dockerctl(String),
    #[command(description = "Show network interfaces and sockets.")]
    Network,
    #[command(description = "Show public and local IP addresses.")]
    Ip,
    #[command(description = "Start a live-updating view: /live [status|temp]")]
    Live(String),
    #[command(description = "Stop the live view in this chat.")]
    Stoplive,
    #[command(description = "Reboot the server (asks for confirmation).")]
    Reboot(String),
    #[command(description = "Shut the server down (asks for confirmation).")]
    Shutdown(String),
    #[command(description = "Update system packages (asks for confirmation).")]
    Update(String),
}
