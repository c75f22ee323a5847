use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};

use super::manager::{
    LiveRender, LiveSessionManager, LiveTransport, SessionOutcome, TransportError,
};

const CHAT: ChatId = ChatId(42);

#[derive(Default)]
struct MockState {
    sends: Vec<(ChatId, String)>,
    edits: Vec<(ChatId, MessageId, String)>,
    edit_attempts: u32,
    // Scripted failure behavior for upcoming edits.
    transient_failures: u32,
    fail_edits_with_gone: bool,
}

#[derive(Clone, Default)]
struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    fn send_count(&self) -> usize {
        self.state.lock().unwrap().sends.len()
    }

    fn edit_count(&self) -> usize {
        self.state.lock().unwrap().edits.len()
    }

    fn edit_attempts(&self) -> u32 {
        self.state.lock().unwrap().edit_attempts
    }
}

impl LiveTransport for MockTransport {
    async fn send(&self, chat_id: ChatId, text: String) -> Result<MessageId, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sends.push((chat_id, text));
        Ok(MessageId(state.sends.len() as i32))
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.edit_attempts += 1;
        if state.fail_edits_with_gone {
            return Err(TransportError::Gone("message deleted".to_string()));
        }
        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(TransportError::Transient("flood wait".to_string()));
        }
        state.edits.push((chat_id, message_id, text));
        Ok(())
    }
}

#[derive(Clone)]
struct CountingView(Arc<AtomicU32>);

impl CountingView {
    fn new() -> Self {
        Self(Arc::new(AtomicU32::new(0)))
    }
}

impl LiveRender for CountingView {
    async fn render(&self) -> String {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        format!("render {}", n)
    }
}

fn manager(transport: &MockTransport, budget: u32) -> LiveSessionManager<MockTransport> {
    LiveSessionManager::new(transport.clone(), Duration::from_secs(2), budget)
}

#[tokio::test(start_paused = true)]
async fn second_start_refreshes_instead_of_posting_again() {
    let transport = MockTransport::default();
    let manager = manager(&transport, 100);

    let first = manager.start(CHAT, CountingView::new()).await.unwrap();
    assert_eq!(first, SessionOutcome::Started);
    assert_eq!(transport.send_count(), 1);

    let second = manager.start(CHAT, CountingView::new()).await.unwrap();
    assert_eq!(second, SessionOutcome::AlreadyActive);
    assert_eq!(transport.send_count(), 1);
    assert_eq!(transport.edit_count(), 1);
    assert_eq!(manager.active_session_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_without_session_is_a_noop() {
    let transport = MockTransport::default();
    let manager = manager(&transport, 100);

    assert!(!manager.stop(CHAT).await);
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_update_task() {
    let transport = MockTransport::default();
    let manager = manager(&transport, 100);

    manager.start(CHAT, CountingView::new()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.edit_count(), 2);

    assert!(manager.stop(CHAT).await);
    assert!(!manager.is_active(CHAT).await);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(transport.edit_count(), 2);
    assert!(!manager.stop(CHAT).await);
}

#[tokio::test(start_paused = true)]
async fn session_ends_itself_when_the_budget_runs_out() {
    let transport = MockTransport::default();
    let manager = manager(&transport, 3);

    manager.start(CHAT, CountingView::new()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(transport.edit_count(), 3);
    assert!(!manager.is_active(CHAT).await);
    assert_eq!(manager.active_session_count().await, 0);

    // An expired session does not block a fresh one.
    let outcome = manager.start(CHAT, CountingView::new()).await.unwrap();
    assert_eq!(outcome, SessionOutcome::Started);
    assert_eq!(transport.send_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn gone_message_terminates_the_session() {
    let transport = MockTransport::default();
    transport.state.lock().unwrap().fail_edits_with_gone = true;
    let manager = manager(&transport, 100);

    manager.start(CHAT, CountingView::new()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(transport.edit_attempts(), 1);
    assert!(!manager.is_active(CHAT).await);
}

#[tokio::test(start_paused = true)]
async fn transient_edit_failures_keep_the_session_alive() {
    let transport = MockTransport::default();
    transport.state.lock().unwrap().transient_failures = 2;
    let manager = manager(&transport, 100);

    manager.start(CHAT, CountingView::new()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(7)).await;

    assert_eq!(transport.edit_attempts(), 3);
    assert_eq!(transport.edit_count(), 1);
    assert!(manager.is_active(CHAT).await);
}

#[tokio::test(start_paused = true)]
async fn stop_all_clears_every_session() {
    let transport = MockTransport::default();
    let manager = manager(&transport, 100);

    manager.start(ChatId(1), CountingView::new()).await.unwrap();
    manager.start(ChatId(2), CountingView::new()).await.unwrap();
    assert_eq!(manager.active_session_count().await, 2);

    manager.stop_all().await;
    assert_eq!(manager.active_session_count().await, 0);

    let edits_after_stop = transport.edit_count();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(transport.edit_count(), edits_after_stop);
}
