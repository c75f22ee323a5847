use sysinfo::{ProcessExt, System, SystemExt};

use super::snapshot::fmt_bytes;

/// Render the top `limit` processes by CPU, then memory.
pub fn top_processes(limit: usize) -> String {
    let mut system = System::new_all();
    system.refresh_processes();

    let mut processes: Vec<_> = system.processes().values().collect();
    processes.sort_by(|a, b| {
        b.cpu_usage()
            .partial_cmp(&a.cpu_usage())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.memory().cmp(&a.memory()))
    });

    let mut lines = vec![format!("{:<8} {:>6} {:>10}  {}", "PID", "CPU%", "MEM", "NAME")];
    for process in processes.iter().take(limit) {
        lines.push(format!(
            "{:<8} {:>6.1} {:>10}  {}",
            process.pid(),
            process.cpu_usage(),
            fmt_bytes(process.memory()),
            process.name()
        ));
    }
    lines.join("\n")
}
