use std::path::Path;

use super::provider::MetricError;

#[derive(Debug, Clone)]
pub struct ThermalZone {
    pub zone: String,
    pub celsius: f32,
}

/// Read every thermal zone under the given sysfs root.
///
/// Zone types are mapped to the short names board vendors actually mean
/// (cpu-thermal -> CPU); unknown types pass through as-is. Most SoCs report
/// millidegrees, so values above the plausible Celsius range are scaled down.
pub fn read_thermal_zones(root: &Path) -> Result<Vec<ThermalZone>, MetricError> {
    if !root.exists() {
        return Err(MetricError::new(format!(
            "{} does not exist on this host",
            root.display()
        )));
    }

    let entries = std::fs::read_dir(root)
        .map_err(|error| MetricError::new(format!("cannot list thermal zones: {}", error)))?;

    let mut zone_dirs: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("thermal_zone"))
        })
        .collect();
    zone_dirs.sort();

    let mut zones = Vec::new();
    for zone_dir in zone_dirs {
        let Some(raw_value) = read_trimmed(&zone_dir.join("temp")) else {
            continue;
        };
        let Ok(value) = raw_value.parse::<f32>() else {
            continue;
        };

        let zone_type = read_trimmed(&zone_dir.join("type")).unwrap_or_else(|| "Unknown".to_string());
        zones.push(ThermalZone {
            zone: display_name(&zone_type).to_string(),
            celsius: normalize_celsius(value),
        });
    }

    if zones.is_empty() {
        return Err(MetricError::new("no readable thermal zones"));
    }
    Ok(zones)
}

pub fn format_thermal_report(zones: &[ThermalZone]) -> String {
    zones
        .iter()
        .map(|zone| format!("{}: {:.1}°C", zone.zone, zone.celsius))
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_trimmed(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn display_name(zone_type: &str) -> &str {
    match zone_type {
        "cpu-thermal" | "x86_pkg_temp" => "CPU",
        "gpu-thermal" => "GPU",
        "ddr-thermal" => "RAM",
        "soc-thermal" => "SoC",
        "pmic-thermal" => "PMIC",
        other => other,
    }
}

// Values above any plausible Celsius reading are millidegrees.
fn normalize_celsius(value: f32) -> f32 {
    if value > 200.0 { value / 1000.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::{display_name, format_thermal_report, normalize_celsius, read_thermal_zones};
    use super::ThermalZone;

    #[test]
    fn millidegrees_are_scaled_down() {
        assert_eq!(normalize_celsius(42000.0), 42.0);
        assert_eq!(normalize_celsius(55.5), 55.5);
    }

    #[test]
    fn known_zone_types_get_short_names() {
        assert_eq!(display_name("cpu-thermal"), "CPU");
        assert_eq!(display_name("soc-thermal"), "SoC");
        assert_eq!(display_name("weird-sensor"), "weird-sensor");
    }

    #[test]
    fn missing_root_is_a_metric_error() {
        let result = read_thermal_zones(std::path::Path::new("/definitely/not/thermal"));
        assert!(result.is_err());
    }

    #[test]
    fn reads_zones_from_sysfs_layout() {
        let dir = std::env::temp_dir().join(format!("argus-thermal-{}", std::process::id()));
        let zone = dir.join("thermal_zone0");
        std::fs::create_dir_all(&zone).expect("test dir should be creatable");
        std::fs::write(zone.join("type"), "cpu-thermal\n").expect("type should write");
        std::fs::write(zone.join("temp"), "48500\n").expect("temp should write");

        let zones = read_thermal_zones(&dir).expect("zones should be readable");
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].zone, "CPU");
        assert!((zones[0].celsius - 48.5).abs() < f32::EPSILON);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn report_lists_one_zone_per_line() {
        let report = format_thermal_report(&[
            ThermalZone {
                zone: "CPU".to_string(),
                celsius: 51.24,
            },
            ThermalZone {
                zone: "GPU".to_string(),
                celsius: 47.0,
            },
        ]);
        assert_eq!(report, "CPU: 51.2°C\nGPU: 47.0°C");
    }
}
