use crate::system::run_cmd;

use super::provider::MetricError;

#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub name: String,
    pub status: String,
    pub image: String,
    pub running: bool,
}

/// List all containers via `docker ps -a`.
///
/// Best-effort adapter around docker's text output: a missing binary, a
/// non-zero exit or an unparsable line all collapse into "no reading", never
/// into a parse error reaching the debouncer.
pub async fn list_containers(timeout_secs: u64) -> Result<Vec<ContainerInfo>, MetricError> {
    let output = run_cmd(
        "docker",
        &["ps", "-a", "--format", "{{.Names}}\t{{.Status}}\t{{.Image}}"],
        timeout_secs,
    )
    .await
    .map_err(|error| MetricError::new(format!("docker not available: {}", error)))?;

    if !output.succeeded() {
        return Err(MetricError::new(format!(
            "docker ps failed with status {}: {}",
            output.status,
            output.stderr.trim()
        )));
    }

    Ok(parse_container_lines(&output.stdout))
}

pub(super) fn parse_container_lines(stdout: &str) -> Vec<ContainerInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next()?.trim();
            let status = fields.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(ContainerInfo {
                name: name.to_string(),
                status: status.to_string(),
                image: fields.next().unwrap_or("").trim().to_string(),
                running: status.starts_with("Up"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_container_lines;

    #[test]
    fn parses_running_and_stopped_containers() {
        let stdout = "web\tUp 3 days\tnginx:latest\n\
                      db\tExited (0) 2 hours ago\tpostgres:16\n";
        let containers = parse_container_lines(stdout);

        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].name, "web");
        assert!(containers[0].running);
        assert_eq!(containers[1].name, "db");
        assert!(!containers[1].running);
        assert_eq!(containers[1].image, "postgres:16");
    }

    #[test]
    fn skips_malformed_lines() {
        let stdout = "just-a-name-without-tabs\n\nweb\tUp 1 minute\tnginx\n";
        let containers = parse_container_lines(stdout);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "web");
    }
}
