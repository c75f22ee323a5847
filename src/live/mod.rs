mod manager;
mod transport;
mod view;

pub use manager::{LiveRender, LiveSessionManager, LiveTransport, SessionOutcome, TransportError};
pub use transport::BotTransport;
pub use view::LiveView;

#[cfg(test)]
mod tests;
