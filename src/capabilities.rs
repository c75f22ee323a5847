use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub is_systemd: bool,
    pub has_docker: bool,
    pub has_sensors: bool,
    pub has_thermal_sysfs: bool,
    pub has_ip: bool,
    pub has_curl: bool,
    pub has_apt: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        let has_systemctl = command_exists("systemctl");

        Self {
            is_systemd: has_systemctl && Path::new("/run/systemd/system").exists(),
            has_docker: command_exists("docker"),
            has_sensors: command_exists("sensors"),
            has_thermal_sysfs: Path::new("/sys/class/thermal").exists(),
            has_ip: command_exists("ip"),
            has_curl: command_exists("curl"),
            has_apt: command_exists("apt-get"),
        }
    }
}

fn command_exists(command: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {} >/dev/null 2>&1", command))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
