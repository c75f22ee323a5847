use std::path::Path;

use chrono::Utc;
use html_escape::encode_text;

use crate::metrics::{format_thermal_report, gather_status_snapshot, read_thermal_zones};

use super::manager::LiveRender;

/// The views `/live` can show. Each render produces a full replacement
/// body; the timestamp line keeps consecutive renders distinct even when
/// nothing on the host changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveView {
    Status,
    Temperature,
}

impl LiveView {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "status" => Some(Self::Status),
            "temp" | "temperature" => Some(Self::Temperature),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Status => "System status",
            Self::Temperature => "Temperatures",
        }
    }
}

impl LiveRender for LiveView {
    async fn render(&self) -> String {
        let body = match self {
            Self::Status => gather_status_snapshot().await.to_text_body(),
            Self::Temperature => match read_thermal_zones(Path::new("/sys/class/thermal")) {
                Ok(zones) => format_thermal_report(&zones),
                Err(error) => format!("No thermal data: {}", error),
            },
        };

        format!(
            "🔴 <b>LIVE: {}</b>\n\n<pre>{}</pre>\nUpdated: {} UTC\nStop with /stoplive",
            self.title(),
            encode_text(&body),
            Utc::now().format("%H:%M:%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LiveView;

    #[test]
    fn parse_accepts_known_views_and_defaults_to_status() {
        assert_eq!(LiveView::parse(""), Some(LiveView::Status));
        assert_eq!(LiveView::parse("status"), Some(LiveView::Status));
        assert_eq!(LiveView::parse(" TEMP "), Some(LiveView::Temperature));
        assert_eq!(LiveView::parse("graphs"), None);
    }
}
