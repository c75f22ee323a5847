use std::path::Path;

use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use tokio::time::{Duration, sleep};

use super::thermal::read_thermal_zones;

#[derive(Debug, Clone)]
pub struct DiskUsage {
    pub mount: String,
    pub used: u64,
    pub total: u64,
    pub used_pct: f32,
}

#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub cpu_pct: f32,
    pub ram_used: u64,
    pub ram_total: u64,
    pub ram_pct: f32,
    pub swap_used: u64,
    pub swap_total: u64,
    pub disks: Vec<DiskUsage>,
    pub uptime_secs: u64,
    pub cpu_temp: Option<f32>,
    pub os_name: String,
    pub kernel: String,
    pub hostname: String,
}

/// Gather a full point-in-time status snapshot with a fresh sampler.
///
/// CPU usage needs two refreshes a short interval apart to be meaningful on
/// a fresh `System`, hence the brief async pause.
pub async fn gather_status_snapshot() -> StatusSnapshot {
    let mut system = System::new_all();

    system.refresh_cpu();
    sleep(Duration::from_millis(250)).await;
    system.refresh_cpu();
    system.refresh_memory();
    system.refresh_disks_list();
    system.refresh_disks();

    let ram_total = system.total_memory();
    let ram_used = system.used_memory();
    let ram_pct = if ram_total > 0 {
        (ram_used as f32 / ram_total as f32) * 100.0
    } else {
        0.0
    };

    let disks = system
        .disks()
        .iter()
        .filter_map(|disk| {
            let total = disk.total_space();
            if total == 0 {
                return None;
            }
            let used = total - disk.available_space();
            Some(DiskUsage {
                mount: disk.mount_point().display().to_string(),
                used,
                total,
                used_pct: (used as f32 / total as f32) * 100.0,
            })
        })
        .collect();

    let cpu_temp = read_thermal_zones(Path::new("/sys/class/thermal"))
        .ok()
        .and_then(|zones| {
            zones
                .iter()
                .find(|zone| zone.zone == "CPU")
                .or_else(|| zones.first())
                .map(|zone| zone.celsius)
        });

    StatusSnapshot {
        cpu_pct: system.global_cpu_info().cpu_usage(),
        ram_used,
        ram_total,
        ram_pct,
        swap_used: system.used_swap(),
        swap_total: system.total_swap(),
        disks,
        uptime_secs: system.uptime(),
        cpu_temp,
        os_name: system.long_os_version().unwrap_or_else(|| "unknown".to_string()),
        kernel: system.kernel_version().unwrap_or_else(|| "unknown".to_string()),
        hostname: system.host_name().unwrap_or_else(|| "unknown".to_string()),
    }
}

impl StatusSnapshot {
    pub fn to_text_body(&self) -> String {
        let mut lines = vec![
            format!("Host: {}", self.hostname),
            format!("OS: {} (kernel {})", self.os_name, self.kernel),
            format!("Uptime: {}", fmt_uptime(self.uptime_secs)),
            String::new(),
            format!("CPU: {:.1}%", self.cpu_pct),
            format!(
                "RAM: {} / {} ({:.1}%)",
                fmt_bytes(self.ram_used),
                fmt_bytes(self.ram_total),
                self.ram_pct
            ),
        ];

        if self.swap_total > 0 {
            let swap_pct = (self.swap_used as f32 / self.swap_total as f32) * 100.0;
            lines.push(format!(
                "Swap: {} / {} ({:.1}%)",
                fmt_bytes(self.swap_used),
                fmt_bytes(self.swap_total),
                swap_pct
            ));
        }

        if let Some(temp) = self.cpu_temp {
            lines.push(format!("CPU temp: {:.1}°C", temp));
        }

        if !self.disks.is_empty() {
            lines.push(String::new());
            lines.push("Disks:".to_string());
            for disk in &self.disks {
                lines.push(format!(
                    "  {} — {} / {} ({:.1}%)",
                    disk.mount,
                    fmt_bytes(disk.used),
                    fmt_bytes(disk.total),
                    disk.used_pct
                ));
            }
        }

        lines.join("\n")
    }
}

pub(super) fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

pub(super) fn fmt_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::{DiskUsage, StatusSnapshot, fmt_bytes, fmt_uptime};

    #[test]
    fn bytes_formatting_picks_sane_units() {
        assert_eq!(fmt_bytes(512), "512 B");
        assert_eq!(fmt_bytes(2048), "2.0 KiB");
        assert_eq!(fmt_bytes(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }

    #[test]
    fn uptime_formatting_drops_empty_leading_units() {
        assert_eq!(fmt_uptime(45 * 60), "45m");
        assert_eq!(fmt_uptime(3 * 3600 + 120), "3h 2m");
        assert_eq!(fmt_uptime(2 * 86_400 + 3_600), "2d 1h 0m");
    }

    #[test]
    fn text_body_mentions_every_disk() {
        let snapshot = StatusSnapshot {
            cpu_pct: 12.5,
            ram_used: 1024,
            ram_total: 4096,
            ram_pct: 25.0,
            swap_used: 0,
            swap_total: 0,
            disks: vec![DiskUsage {
                mount: "/".to_string(),
                used: 10,
                total: 100,
                used_pct: 10.0,
            }],
            uptime_secs: 60,
            cpu_temp: Some(44.2),
            os_name: "Linux".to_string(),
            kernel: "6.1".to_string(),
            hostname: "box".to_string(),
        };

        let body = snapshot.to_text_body();
        assert!(body.contains("CPU: 12.5%"));
        assert!(body.contains("/ —"));
        assert!(body.contains("CPU temp: 44.2°C"));
        assert!(!body.contains("Swap:"));
    }
}
