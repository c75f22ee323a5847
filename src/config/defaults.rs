use super::schema::{Alerts, Live};

pub(super) fn default_scan_interval() -> u64 {
    60
}

pub(super) fn default_status_report_interval() -> u64 {
    24 * 60 * 60
}

pub(super) fn default_command_timeout_secs() -> u64 {
    30
}

pub(super) fn default_alert_cpu() -> f32 {
    90.0
}

pub(super) fn default_alert_ram() -> f32 {
    90.0
}

pub(super) fn default_alert_swap() -> f32 {
    80.0
}

pub(super) fn default_alert_disk() -> f32 {
    90.0
}

pub(super) fn default_alert_temperature() -> f32 {
    80.0
}

pub(super) fn default_hysteresis() -> f32 {
    5.0
}

pub(super) fn default_temperature_hysteresis() -> f32 {
    3.0
}

pub(super) fn default_live_tick_secs() -> u64 {
    2
}

pub(super) fn default_live_update_budget() -> u32 {
    150
}

impl Default for Alerts {
    fn default() -> Self {
        Self {
            cpu: default_alert_cpu(),
            ram: default_alert_ram(),
            swap: default_alert_swap(),
            disk: default_alert_disk(),
            temperature: default_alert_temperature(),
            hysteresis: default_hysteresis(),
            temperature_hysteresis: default_temperature_hysteresis(),
            services: Vec::new(),
            containers: Vec::new(),
        }
    }
}

impl Default for Live {
    fn default() -> Self {
        Self {
            tick_secs: default_live_tick_secs(),
            update_budget: default_live_update_budget(),
        }
    }
}
