use std::path::Path;

use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use thiserror::Error;

use crate::system::run_cmd;

use super::docker::list_containers;
use super::thermal::{ThermalZone, read_thermal_zones};

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct MetricError {
    message: String,
}

impl MetricError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiskMount {
    pub mount: String,
    pub used_pct: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Missing,
}

/// Point-in-time readings of host resources. Each call may fail
/// independently; a failure means "no reading this cycle" for that
/// component only.
pub trait MetricSource {
    async fn cpu_percent(&mut self) -> Result<f32, MetricError>;
    async fn memory_percent(&mut self) -> Result<f32, MetricError>;
    async fn swap_percent(&mut self) -> Result<f32, MetricError>;
    async fn disk_mounts(&mut self) -> Result<Vec<DiskMount>, MetricError>;
    async fn temperatures(&mut self) -> Result<Vec<ThermalZone>, MetricError>;
    async fn service_active(&mut self, name: &str) -> Result<bool, MetricError>;
    async fn container_state(&mut self, name: &str) -> Result<ContainerState, MetricError>;
}

pub struct SystemMetricSource {
    system: System,
    command_timeout_secs: u64,
}

impl SystemMetricSource {
    pub fn new(command_timeout_secs: u64) -> Self {
        Self {
            system: System::new_all(),
            command_timeout_secs,
        }
    }
}

impl MetricSource for SystemMetricSource {
    async fn cpu_percent(&mut self) -> Result<f32, MetricError> {
        self.system.refresh_cpu();
        Ok(self.system.global_cpu_info().cpu_usage())
    }

    async fn memory_percent(&mut self) -> Result<f32, MetricError> {
        self.system.refresh_memory();
        let total = self.system.total_memory() as f32;
        if total <= 0.0 {
            return Err(MetricError::new("total memory reported as zero"));
        }
        Ok((self.system.used_memory() as f32 / total) * 100.0)
    }

    async fn swap_percent(&mut self) -> Result<f32, MetricError> {
        self.system.refresh_memory();
        let total = self.system.total_swap() as f32;
        if total <= 0.0 {
            return Err(MetricError::new("no swap configured"));
        }
        Ok((self.system.used_swap() as f32 / total) * 100.0)
    }

    async fn disk_mounts(&mut self) -> Result<Vec<DiskMount>, MetricError> {
        self.system.refresh_disks_list();
        self.system.refresh_disks();

        let mounts: Vec<DiskMount> = self
            .system
            .disks()
            .iter()
            .filter_map(|disk| {
                let total = disk.total_space() as f32;
                if total <= 0.0 {
                    return None;
                }
                let used = (disk.total_space() - disk.available_space()) as f32;
                Some(DiskMount {
                    mount: disk.mount_point().display().to_string(),
                    used_pct: (used / total) * 100.0,
                })
            })
            .collect();

        if mounts.is_empty() {
            return Err(MetricError::new("no real disk mounts found"));
        }
        Ok(mounts)
    }

    async fn temperatures(&mut self) -> Result<Vec<ThermalZone>, MetricError> {
        read_thermal_zones(Path::new("/sys/class/thermal"))
    }

    async fn service_active(&mut self, name: &str) -> Result<bool, MetricError> {
        let output = run_cmd(
            "systemctl",
            &["is-active", "--quiet", name],
            self.command_timeout_secs,
        )
        .await
        .map_err(|error| MetricError::new(format!("service probe failed: {}", error)))?;
        Ok(output.succeeded())
    }

    async fn container_state(&mut self, name: &str) -> Result<ContainerState, MetricError> {
        let containers = list_containers(self.command_timeout_secs).await?;
        Ok(containers
            .iter()
            .find(|container| container.name == name)
            .map(|container| {
                if container.running {
                    ContainerState::Running
                } else {
                    ContainerState::Stopped
                }
            })
            .unwrap_or(ContainerState::Missing))
    }
}

#[cfg(test)]
pub(crate) use mock::MockMetricSource;

#[cfg(test)]
mod mock {
    use std::collections::HashMap;

    use super::{ContainerState, DiskMount, MetricError, MetricSource, ThermalZone};

    /// Scripted source: every component serves its readings in order and
    /// fails once a sequence runs dry.
    #[derive(Default)]
    pub(crate) struct MockMetricSource {
        pub(crate) cpu: Vec<f32>,
        pub(crate) memory: Vec<f32>,
        pub(crate) swap: Vec<f32>,
        pub(crate) disks: Vec<Vec<DiskMount>>,
        pub(crate) temperatures: Vec<Vec<ThermalZone>>,
        pub(crate) services: HashMap<String, Vec<bool>>,
        pub(crate) containers: HashMap<String, Vec<ContainerState>>,
    }

    fn next<T>(sequence: &mut Vec<T>, component: &str) -> Result<T, MetricError> {
        if sequence.is_empty() {
            return Err(MetricError::new(format!("{}: sequence exhausted", component)));
        }
        Ok(sequence.remove(0))
    }

    impl MetricSource for MockMetricSource {
        async fn cpu_percent(&mut self) -> Result<f32, MetricError> {
            next(&mut self.cpu, "cpu")
        }

        async fn memory_percent(&mut self) -> Result<f32, MetricError> {
            next(&mut self.memory, "memory")
        }

        async fn swap_percent(&mut self) -> Result<f32, MetricError> {
            next(&mut self.swap, "swap")
        }

        async fn disk_mounts(&mut self) -> Result<Vec<DiskMount>, MetricError> {
            next(&mut self.disks, "disks")
        }

        async fn temperatures(&mut self) -> Result<Vec<ThermalZone>, MetricError> {
            next(&mut self.temperatures, "temperatures")
        }

        async fn service_active(&mut self, name: &str) -> Result<bool, MetricError> {
            let sequence = self
                .services
                .get_mut(name)
                .ok_or_else(|| MetricError::new(format!("service {}: not scripted", name)))?;
            next(sequence, name)
        }

        async fn container_state(&mut self, name: &str) -> Result<ContainerState, MetricError> {
            let sequence = self
                .containers
                .get_mut(name)
                .ok_or_else(|| MetricError::new(format!("container {}: not scripted", name)))?;
            next(sequence, name)
        }
    }
}
