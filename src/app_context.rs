use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teloxide::Bot;
use tokio::sync::{Mutex, Semaphore};

use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::live::{BotTransport, LiveSessionManager};
use crate::monitor::AlertDebouncer;

/// Everything command handlers and background jobs share. Cheap to clone;
/// all mutable state lives behind `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub capabilities: Arc<Capabilities>,
    pub debouncer: Arc<Mutex<AlertDebouncer>>,
    pub live: Arc<LiveSessionManager<BotTransport>>,
    pub last_scan_tick: Arc<Mutex<Option<DateTime<Utc>>>>,
    pub command_slots: Arc<Semaphore>,
}

impl AppContext {
    pub fn new(
        config: Config,
        capabilities: Capabilities,
        bot: Bot,
        command_concurrency: usize,
    ) -> Self {
        let live = Arc::new(LiveSessionManager::new(
            BotTransport::new(bot),
            Duration::from_secs(config.live.tick_secs),
            config.live.update_budget,
        ));

        Self {
            config,
            capabilities: Arc::new(capabilities),
            debouncer: Arc::new(Mutex::new(AlertDebouncer::new())),
            live,
            last_scan_tick: Arc::new(Mutex::new(None)),
            command_slots: Arc::new(Semaphore::new(command_concurrency)),
        }
    }
}
