mod docker;
mod processes;
mod provider;
mod snapshot;
mod thermal;

pub use docker::{ContainerInfo, list_containers};
pub use processes::top_processes;
pub use provider::{ContainerState, DiskMount, MetricError, MetricSource, SystemMetricSource};
pub use snapshot::{StatusSnapshot, gather_status_snapshot};
pub use thermal::{ThermalZone, format_thermal_report, read_thermal_zones};

#[cfg(test)]
pub(crate) use provider::MockMetricSource;
