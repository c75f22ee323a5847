use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot_token: String,
    pub owner_id: u64,
    /// Seconds between alert-scan cycles.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
    /// Seconds between unsolicited full status reports.
    #[serde(default = "default_status_report_interval")]
    pub status_report_interval: u64,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default)]
    pub alerts: Alerts,
    #[serde(default)]
    pub live: Live,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alerts {
    #[serde(default = "default_alert_cpu")]
    pub cpu: f32,
    #[serde(default = "default_alert_ram")]
    pub ram: f32,
    #[serde(default = "default_alert_swap")]
    pub swap: f32,
    #[serde(default = "default_alert_disk")]
    pub disk: f32,
    #[serde(default = "default_alert_temperature")]
    pub temperature: f32,
    /// Percent-unit clear margin: an alert clears at threshold - hysteresis.
    #[serde(default = "default_hysteresis")]
    pub hysteresis: f32,
    /// Celsius clear margin for temperature zones.
    #[serde(default = "default_temperature_hysteresis")]
    pub temperature_hysteresis: f32,
    /// systemd services that must stay active.
    #[serde(default)]
    pub services: Vec<String>,
    /// Docker containers that must stay running.
    #[serde(default)]
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Live {
    #[serde(default = "default_live_tick_secs")]
    pub tick_secs: u64,
    /// Automatic updates before a live view self-terminates.
    #[serde(default = "default_live_update_budget")]
    pub update_budget: u32,
}
