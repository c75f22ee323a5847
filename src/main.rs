mod app_context;
mod capabilities;
mod commands;
mod config;
mod jobs;
mod live;
mod metrics;
mod monitor;
mod system;

use sysinfo::SystemExt;
use teloxide::prelude::*;
use tokio::net::lookup_host;
use tracing_subscriber::EnvFilter;

use std::sync::Arc;

use crate::app_context::AppContext;
use crate::capabilities::Capabilities;
use crate::commands::{MyCommands, answer, answer_callback};
use crate::config::{Config, load_config};
use crate::jobs::start_background_jobs;

const CONFIG_PATH: &str = "config.toml";

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

fn log_capability_warnings(capabilities: &Capabilities) {
    if !capabilities.is_systemd {
        log::warn!(
            "capability_degraded feature=service_monitoring reason=systemctl_or_systemd_unavailable"
        );
    }

    if !capabilities.has_docker {
        log::warn!("capability_degraded feature=containers reason=docker_unavailable");
    }

    if !capabilities.has_thermal_sysfs && !capabilities.has_sensors {
        log::warn!("capability_degraded feature=temperature reason=no_thermal_source");
    }

    if !capabilities.has_ip {
        log::warn!("capability_degraded feature=network reason=ip_unavailable");
    }

    if !capabilities.has_curl {
        log::warn!("capability_degraded feature=public_ip reason=curl_unavailable");
    }

    if !capabilities.has_apt {
        log::warn!("capability_degraded feature=package_update reason=apt_unavailable");
    }
}

async fn log_dns_probe() {
    match lookup_host(("api.telegram.org", 443)).await {
        Ok(mut addresses) => {
            if let Some(address) = addresses.next() {
                log::info!("dns_probe_ok host=api.telegram.org address={}", address);
            } else {
                log::warn!("dns_probe_degraded host=api.telegram.org reason=no_records");
            }
        }
        Err(error) => {
            log::warn!(
                "dns_probe_degraded host=api.telegram.org reason=lookup_failed error={}",
                error
            );
        }
    }
}

async fn send_startup_notification(bot: &Bot, config: &Config) {
    let owner_chat_id = match config.owner_chat_id() {
        Ok(chat_id) => chat_id,
        Err(error) => {
            log::error!("startup notification skipped: invalid owner chat id: {}", error);
            return;
        }
    };

    let hostname = sysinfo::System::new()
        .host_name()
        .unwrap_or_else(|| "unknown".to_string());
    let text = format!(
        "🟢 Argus is online on {}. Scanning every {}s. /help for commands.",
        hostname, config.scan_interval
    );

    if let Err(error) = bot.send_message(owner_chat_id, text).await {
        log::warn!("failed to send startup notification: {}", error);
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config: Config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    log::info!("Argus server bot is starting...");
    let capabilities = Capabilities::detect();
    log_capability_warnings(&capabilities);
    log_dns_probe().await;

    let bot = Bot::new(config.bot_token.clone());
    let app_context = AppContext::new(config, capabilities, bot.clone(), 2);

    send_startup_notification(&bot, &app_context.config).await;
    let supervisor = start_background_jobs(bot.clone(), app_context.clone());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<MyCommands>()
                .endpoint(answer),
        )
        .branch(Update::filter_callback_query().endpoint(answer_callback));

    let live = Arc::clone(&app_context.live);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(app_context)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("dispatcher stopped, shutting down background work");
    live.stop_all().await;
    supervisor.shutdown().await;
}
