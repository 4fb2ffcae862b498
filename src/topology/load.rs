use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use super::snapshot::Snapshot;

/// Where a snapshot document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSource {
    Empty,
    Stdin,
    File(PathBuf),
}

impl SnapshotSource {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Empty,
            Some("-") => Self::Stdin,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Stdin can only be drained once.
    pub fn is_reloadable(&self) -> bool {
        !matches!(self, Self::Stdin)
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("(empty)"),
            Self::Stdin => f.write_str("stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn load_snapshot(source: &SnapshotSource) -> Result<Snapshot> {
    let raw = match source {
        SnapshotSource::Empty => return Ok(Snapshot::default()),
        SnapshotSource::Stdin => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read snapshot from stdin")?;
            raw
        }
        SnapshotSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?,
    };

    let snapshot = parse_snapshot_text(&raw)
        .with_context(|| format!("snapshot from {source} is not valid JSON"))?;
    info!(
        %source,
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "loaded topology snapshot"
    );
    Ok(snapshot)
}

fn parse_snapshot_text(raw: &str) -> serde_json::Result<Snapshot> {
    if raw.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    Snapshot::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_arg() {
        assert_eq!(SnapshotSource::from_arg(None), SnapshotSource::Empty);
        assert_eq!(SnapshotSource::from_arg(Some("-")), SnapshotSource::Stdin);
        assert_eq!(
            SnapshotSource::from_arg(Some("topology.json")),
            SnapshotSource::File(PathBuf::from("topology.json"))
        );
        assert!(!SnapshotSource::Stdin.is_reloadable());
    }

    #[test]
    fn blank_text_is_empty_snapshot() {
        assert_eq!(parse_snapshot_text("  \n").ok(), Some(Snapshot::default()));
    }

    #[test]
    fn reads_snapshot_file() {
        let path = std::env::temp_dir().join(format!(
            "agent-topology-load-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"from":"a","to":"b","messageCount":1}]}"#,
        )
        .expect("write fixture");

        let snapshot = load_snapshot(&SnapshotSource::File(path.clone())).expect("load");
        std::fs::remove_file(&path).ok();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.edges.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = SnapshotSource::File(PathBuf::from("/nonexistent/agent-topology.json"));
        let error = load_snapshot(&source).expect_err("missing file");
        assert!(error.to_string().contains("failed to read snapshot"));
    }
}
