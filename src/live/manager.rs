use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// How a delivery attempt failed. `Gone` means the target message no longer
/// exists (deleted by the user, chat purged) and the session cannot
/// continue; everything else is `Transient` and worth retrying next tick.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("message is gone: {0}")]
    Gone(String),
    #[error("transient delivery failure: {0}")]
    Transient(String),
}

/// The messaging side of a live session, kept abstract so tests can run
/// against an in-memory transport.
pub trait LiveTransport: Send + Sync + 'static {
    fn send(
        &self,
        chat_id: ChatId,
        text: String,
    ) -> impl Future<Output = Result<MessageId, TransportError>> + Send;

    fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Produces the current text of a live message. Called once per tick.
pub trait LiveRender: Send + Sync + 'static {
    fn render(&self) -> impl Future<Output = String> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A new live message was posted and its update task spawned.
    Started,
    /// A session was already running for this chat; its message was
    /// refreshed in place and no new message was posted.
    AlreadyActive,
}

struct LiveSession {
    message_id: MessageId,
    cancel: CancellationToken,
    done: Arc<AtomicBool>,
    generation: u64,
}

struct Shared<T> {
    transport: T,
    tick: Duration,
    update_budget: u32,
    sessions: Mutex<HashMap<ChatId, LiveSession>>,
}

impl<T: LiveTransport> Shared<T> {
    async fn remove_if_current(&self, chat_id: ChatId, generation: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&chat_id) {
            if session.generation == generation {
                sessions.remove(&chat_id);
            }
        }
    }
}

/// At most one self-updating message per chat.
///
/// Each session owns a background task that re-renders and edits its
/// message every tick until it is stopped, its message disappears, or it
/// runs out of update budget. A session that ends on its own removes its
/// own registry entry, but only if the entry is still its own generation:
/// a newer session under the same chat id must never be evicted by a
/// stale task.
pub struct LiveSessionManager<T: LiveTransport> {
    shared: Arc<Shared<T>>,
    // Serializes start/stop so two racing /live commands cannot both post
    // a message. Session tasks only ever take the registry lock, briefly.
    ops: Mutex<()>,
    next_generation: AtomicU64,
}

impl<T: LiveTransport> LiveSessionManager<T> {
    pub fn new(transport: T, tick: Duration, update_budget: u32) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                tick,
                update_budget,
                sessions: Mutex::new(HashMap::new()),
            }),
            ops: Mutex::new(()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Start a live session for `chat_id`, or refresh the existing one.
    pub async fn start<R: LiveRender>(
        &self,
        chat_id: ChatId,
        view: R,
    ) -> Result<SessionOutcome, TransportError> {
        let _ops = self.ops.lock().await;

        let active = {
            let mut sessions = self.shared.sessions.lock().await;
            match sessions.get(&chat_id) {
                Some(session) if !session.done.load(Ordering::Acquire) => {
                    Some(session.message_id)
                }
                Some(_) => {
                    // The task ended between ticks and its removal has not
                    // landed yet; treat the entry as gone.
                    sessions.remove(&chat_id);
                    None
                }
                None => None,
            }
        };

        if let Some(message_id) = active {
            let text = view.render().await;
            self.shared.transport.edit(chat_id, message_id, text).await?;
            return Ok(SessionOutcome::AlreadyActive);
        }

        let text = view.render().await;
        let message_id = self.shared.transport.send(chat_id, text).await?;

        let cancel = CancellationToken::new();
        let done = Arc::new(AtomicBool::new(false));
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut sessions = self.shared.sessions.lock().await;
            sessions.insert(
                chat_id,
                LiveSession {
                    message_id,
                    cancel: cancel.clone(),
                    done: Arc::clone(&done),
                    generation,
                },
            );
        }

        log::info!("live_session_started chat_id={}", chat_id.0);
        spawn_update_task(
            Arc::clone(&self.shared),
            chat_id,
            message_id,
            view,
            cancel,
            done,
            generation,
        );
        Ok(SessionOutcome::Started)
    }

    /// Stop the live session for `chat_id`, if any. Idempotent.
    pub async fn stop(&self, chat_id: ChatId) -> bool {
        let _ops = self.ops.lock().await;

        let removed = {
            let mut sessions = self.shared.sessions.lock().await;
            sessions.remove(&chat_id)
        };

        match removed {
            Some(session) => {
                session.cancel.cancel();
                log::info!("live_session_stopped chat_id={}", chat_id.0);
                true
            }
            None => false,
        }
    }

    /// Cancel every session. Used on shutdown; the final messages are left
    /// in place as-is.
    pub async fn stop_all(&self) {
        let _ops = self.ops.lock().await;

        let mut sessions = self.shared.sessions.lock().await;
        for (chat_id, session) in sessions.drain() {
            session.cancel.cancel();
            log::info!("live_session_stopped chat_id={} reason=shutdown", chat_id.0);
        }
    }

    pub async fn is_active(&self, chat_id: ChatId) -> bool {
        let sessions = self.shared.sessions.lock().await;
        sessions
            .get(&chat_id)
            .map(|session| !session.done.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    pub async fn active_session_count(&self) -> usize {
        let sessions = self.shared.sessions.lock().await;
        sessions
            .values()
            .filter(|session| !session.done.load(Ordering::Acquire))
            .count()
    }
}

fn spawn_update_task<T: LiveTransport, R: LiveRender>(
    shared: Arc<Shared<T>>,
    chat_id: ChatId,
    message_id: MessageId,
    view: R,
    cancel: CancellationToken,
    done: Arc<AtomicBool>,
    generation: u64,
) {
    tokio::spawn(async move {
        let mut updates = 0u32;
        let reason = loop {
            tokio::select! {
                _ = cancel.cancelled() => break "cancelled",
                _ = tokio::time::sleep(shared.tick) => {}
            }

            let text = view.render().await;
            match shared.transport.edit(chat_id, message_id, text).await {
                Ok(()) => {
                    updates += 1;
                    if updates >= shared.update_budget {
                        break "budget_exhausted";
                    }
                }
                Err(TransportError::Gone(error)) => {
                    log::warn!("live_message_gone chat_id={} error={}", chat_id.0, error);
                    break "message_gone";
                }
                Err(TransportError::Transient(error)) => {
                    log::warn!("live_update_failed chat_id={} error={}", chat_id.0, error);
                }
            }
        };

        done.store(true, Ordering::Release);
        shared.remove_if_current(chat_id, generation).await;
        log::info!(
            "live_session_ended chat_id={} reason={} updates={}",
            chat_id.0,
            reason,
            updates
        );
    });
}
