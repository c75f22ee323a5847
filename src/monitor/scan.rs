use std::sync::Arc;

use teloxide::prelude::*;
use tokio::sync::Mutex;

use crate::config::{Alerts, Config};
use crate::metrics::{ContainerState, DiskMount, MetricSource, ThermalZone};

use super::debounce::{AlertDebouncer, AlertEvent, Threshold};

/// One full sample pass over every monitored component. A `None`/empty slot
/// means the read failed this cycle and the component is skipped without
/// touching its alert state.
#[derive(Debug, Default)]
struct CycleReadings {
    cpu: Option<f32>,
    ram: Option<f32>,
    swap: Option<f32>,
    disks: Vec<DiskMount>,
    temperatures: Vec<ThermalZone>,
    services: Vec<(String, bool)>,
    containers: Vec<(String, ContainerState)>,
}

async fn collect_readings<S: MetricSource>(source: &mut S, alerts: &Alerts) -> CycleReadings {
    let mut readings = CycleReadings::default();

    match source.cpu_percent().await {
        Ok(value) => readings.cpu = Some(value),
        Err(error) => log::warn!("metric_read_failed component=cpu error={}", error),
    }

    match source.memory_percent().await {
        Ok(value) => readings.ram = Some(value),
        Err(error) => log::warn!("metric_read_failed component=ram error={}", error),
    }

    // Hosts without swap or thermal sysfs fail these every cycle; keep quiet.
    match source.swap_percent().await {
        Ok(value) => readings.swap = Some(value),
        Err(error) => log::debug!("metric_read_skipped component=swap error={}", error),
    }

    match source.disk_mounts().await {
        Ok(mounts) => readings.disks = mounts,
        Err(error) => log::warn!("metric_read_failed component=disk error={}", error),
    }

    match source.temperatures().await {
        Ok(zones) => readings.temperatures = zones,
        Err(error) => log::debug!("metric_read_skipped component=temperature error={}", error),
    }

    for name in &alerts.services {
        match source.service_active(name).await {
            Ok(active) => readings.services.push((name.clone(), active)),
            Err(error) => {
                log::warn!("metric_read_failed component=service:{} error={}", name, error)
            }
        }
    }

    for name in &alerts.containers {
        match source.container_state(name).await {
            Ok(state) => readings.containers.push((name.clone(), state)),
            Err(error) => {
                log::warn!("metric_read_failed component=container:{} error={}", name, error)
            }
        }
    }

    readings
}

fn evaluate_readings(
    debouncer: &mut AlertDebouncer,
    alerts: &Alerts,
    readings: &CycleReadings,
) -> Vec<String> {
    let mut notifications = Vec::new();
    let percent_hysteresis = alerts.hysteresis;

    if let Some(value) = readings.cpu {
        let event = debouncer.evaluate("cpu", value, Threshold::above(alerts.cpu, percent_hysteresis));
        push_numeric(&mut notifications, event, "CPU usage", "%");
    }

    if let Some(value) = readings.ram {
        let event = debouncer.evaluate("ram", value, Threshold::above(alerts.ram, percent_hysteresis));
        push_numeric(&mut notifications, event, "RAM usage", "%");
    }

    if let Some(value) = readings.swap {
        let event =
            debouncer.evaluate("swap", value, Threshold::above(alerts.swap, percent_hysteresis));
        push_numeric(&mut notifications, event, "Swap usage", "%");
    }

    for disk in &readings.disks {
        let component = format!("disk:{}", disk.mount);
        let event = debouncer.evaluate(
            &component,
            disk.used_pct,
            Threshold::above(alerts.disk, percent_hysteresis),
        );
        push_numeric(
            &mut notifications,
            event,
            &format!("Disk {} usage", disk.mount),
            "%",
        );
    }

    for zone in &readings.temperatures {
        let component = format!("temp:{}", zone.zone);
        let event = debouncer.evaluate(
            &component,
            zone.celsius,
            Threshold::above(alerts.temperature, alerts.temperature_hysteresis),
        );
        push_numeric(
            &mut notifications,
            event,
            &format!("{} temperature", zone.zone),
            "°C",
        );
    }

    for (name, active) in &readings.services {
        let component = format!("service:{}", name);
        match debouncer.evaluate_health(&component, *active) {
            Some(AlertEvent::Raised { .. }) => {
                notifications.push(format!("❗️ ALERT: Service {} is not active", name));
            }
            Some(AlertEvent::Cleared { .. }) => {
                notifications.push(format!("✅ CLEAR: Service {} is active again", name));
            }
            None => {}
        }
    }

    for (name, state) in &readings.containers {
        let component = format!("container:{}", name);
        let healthy = *state == ContainerState::Running;
        match debouncer.evaluate_health(&component, healthy) {
            Some(AlertEvent::Raised { .. }) => {
                let reason = match state {
                    ContainerState::Missing => "was not found",
                    _ => "is not running",
                };
                notifications.push(format!("❗️ ALERT: Container {} {}", name, reason));
            }
            Some(AlertEvent::Cleared { .. }) => {
                notifications.push(format!("✅ CLEAR: Container {} is running again", name));
            }
            None => {}
        }
    }

    notifications
}

fn push_numeric(
    notifications: &mut Vec<String>,
    event: Option<AlertEvent>,
    label: &str,
    unit: &str,
) {
    match event {
        Some(AlertEvent::Raised { value, .. }) => {
            notifications.push(format!(
                "⚠️ ALERT: {} is high ({:.1}{})",
                label,
                value.unwrap_or_default(),
                unit
            ));
        }
        Some(AlertEvent::Cleared { value, .. }) => {
            notifications.push(format!(
                "✅ CLEAR: {} is back to normal ({:.1}{})",
                label,
                value.unwrap_or_default(),
                unit
            ));
        }
        None => {}
    }
}

/// One alert-scan cycle: sample everything, run the debouncer, notify the
/// owner about RAISE/CLEAR transitions. Readings are collected before the
/// debouncer lock is taken so the lock is never held across an external
/// call. A delivery failure is logged and dropped; the next cycle
/// naturally retries.
pub async fn check_alerts<S: MetricSource>(
    bot: &Bot,
    config: &Config,
    debouncer: &Arc<Mutex<AlertDebouncer>>,
    source: &mut S,
) {
    let readings = collect_readings(source, &config.alerts).await;

    tracing::info!(
        target: "monitor",
        module = "monitor",
        cpu = readings.cpu,
        ram = readings.ram,
        swap = readings.swap,
        disks = readings.disks.len(),
        thermal_zones = readings.temperatures.len(),
        "scan_cycle"
    );

    let notifications = {
        let mut debouncer = debouncer.lock().await;
        evaluate_readings(&mut debouncer, &config.alerts, &readings)
    };

    let owner_chat_id = match config.owner_chat_id() {
        Ok(chat_id) => chat_id,
        Err(error) => {
            log::error!("CRITICAL: invalid owner chat id in config: {}", error);
            return;
        }
    };

    for notification in notifications {
        if let Err(error) = bot.send_message(owner_chat_id, notification).await {
            log::error!(
                "CRITICAL: failed to send alert to {}: {}",
                owner_chat_id.0,
                error
            );
        }
    }
}

pub async fn alerting_components(debouncer: &Arc<Mutex<AlertDebouncer>>) -> Vec<String> {
    let debouncer = debouncer.lock().await;
    debouncer.alerting_components()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::config::Alerts;
    use crate::metrics::{ContainerState, DiskMount, MockMetricSource, ThermalZone};
    use crate::monitor::AlertDebouncer;

    use super::{collect_readings, evaluate_readings};

    fn test_alerts() -> Alerts {
        Alerts {
            cpu: 90.0,
            ram: 90.0,
            swap: 80.0,
            disk: 90.0,
            temperature: 50.0,
            hysteresis: 10.0,
            temperature_hysteresis: 3.0,
            services: vec!["nginx".to_string()],
            containers: vec!["redis".to_string()],
        }
    }

    fn scripted_source() -> MockMetricSource {
        MockMetricSource {
            cpu: vec![95.0],
            memory: vec![50.0],
            swap: vec![10.0],
            disks: vec![vec![DiskMount {
                mount: "/".to_string(),
                used_pct: 95.5,
            }]],
            temperatures: vec![vec![ThermalZone {
                zone: "CPU".to_string(),
                celsius: 51.0,
            }]],
            services: HashMap::from([("nginx".to_string(), vec![false])]),
            containers: HashMap::from([("redis".to_string(), vec![ContainerState::Missing])]),
        }
    }

    #[tokio::test]
    async fn full_cycle_raises_for_every_breaching_component() {
        let alerts = test_alerts();
        let mut source = scripted_source();
        let mut debouncer = AlertDebouncer::new();

        let readings = collect_readings(&mut source, &alerts).await;
        let notifications = evaluate_readings(&mut debouncer, &alerts, &readings);

        assert_eq!(notifications.len(), 5);
        assert!(notifications[0].contains("CPU usage is high (95.0%)"));
        assert!(notifications[1].contains("Disk / usage is high (95.5%)"));
        assert!(notifications[2].contains("CPU temperature is high (51.0°C)"));
        assert!(notifications[3].contains("Service nginx is not active"));
        assert!(notifications[4].contains("Container redis was not found"));
    }

    #[tokio::test]
    async fn failed_read_skips_component_without_touching_state() {
        let alerts = test_alerts();
        let mut debouncer = AlertDebouncer::new();

        // First cycle raises the CPU alert.
        let mut first = MockMetricSource {
            cpu: vec![95.0],
            ..Default::default()
        };
        let readings = collect_readings(&mut first, &alerts).await;
        let notifications = evaluate_readings(&mut debouncer, &alerts, &readings);
        assert_eq!(notifications.len(), 1);
        assert!(debouncer.is_alerting("cpu"));

        // Second cycle: every read fails. No events, state untouched.
        let mut broken = MockMetricSource::default();
        let readings = collect_readings(&mut broken, &alerts).await;
        let notifications = evaluate_readings(&mut debouncer, &alerts, &readings);
        assert!(notifications.is_empty());
        assert!(debouncer.is_alerting("cpu"));

        // Third cycle: recovery past the margin clears exactly once.
        let mut third = MockMetricSource {
            cpu: vec![75.0],
            ..Default::default()
        };
        let readings = collect_readings(&mut third, &alerts).await;
        let notifications = evaluate_readings(&mut debouncer, &alerts, &readings);
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].contains("CPU usage is back to normal (75.0%)"));
        assert!(!debouncer.is_alerting("cpu"));
    }

    #[tokio::test]
    async fn stopped_and_missing_containers_render_differently() {
        let alerts = Alerts {
            containers: vec!["redis".to_string(), "web".to_string()],
            services: Vec::new(),
            ..test_alerts()
        };
        let mut source = MockMetricSource {
            containers: HashMap::from([
                ("redis".to_string(), vec![ContainerState::Stopped]),
                ("web".to_string(), vec![ContainerState::Missing]),
            ]),
            ..Default::default()
        };
        let mut debouncer = AlertDebouncer::new();

        let readings = collect_readings(&mut source, &alerts).await;
        let notifications = evaluate_readings(&mut debouncer, &alerts, &readings);

        assert_eq!(notifications.len(), 2);
        assert!(notifications[0].contains("Container redis is not running"));
        assert!(notifications[1].contains("Container web was not found"));
    }
}
