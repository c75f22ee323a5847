use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app_context::AppContext;

mod monitor;
mod status_report;

/// Owns the background tasks and the token that stops them. Jobs are never
/// fire-and-forget: shutdown cancels the token and waits for every task to
/// finish its current cycle.
pub struct JobSupervisor {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

pub fn start_background_jobs(bot: Bot, app_context: AppContext) -> JobSupervisor {
    let token = CancellationToken::new();

    let handles = vec![
        monitor::spawn_scan_job(bot.clone(), app_context.clone(), token.clone()),
        status_report::spawn_status_report_job(bot, app_context, token.clone()),
    ];

    JobSupervisor { token, handles }
}

impl JobSupervisor {
    pub async fn shutdown(self) {
        self.token.cancel();
        for handle in self.handles {
            if let Err(error) = handle.await {
                log::warn!("background job ended abnormally: {}", error);
            }
        }
        log::info!("background jobs stopped");
    }
}
