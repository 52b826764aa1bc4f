//! Static Targets File Generator
//!
//! Produces a `file_sd`/HTTP SD compatible JSON document for a list of GPU
//! hosts. Every host yields two groups: the DCGM exporter and the node
//! exporter. The output does not touch the live registry.

use crate::error::{Error, Result};
use crate::targets::TargetGroup;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Port of the DCGM GPU metrics exporter
pub const DCGM_EXPORTER_PORT: u16 = 9400;

/// Port of the node exporter
pub const NODE_EXPORTER_PORT: u16 = 9100;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "targets.json";

/// Expand hostnames into DCGM and node exporter groups, in input order
pub fn generate_targets<I, S>(hostnames: I) -> Vec<TargetGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hostnames
        .into_iter()
        .flat_map(|host| {
            let host = host.as_ref();
            [
                TargetGroup::new(
                    [format!("{}:{}", host, DCGM_EXPORTER_PORT)],
                    [("job", "dcgm")],
                ),
                TargetGroup::new(
                    [format!("{}:{}", host, NODE_EXPORTER_PORT)],
                    [("job", "node")],
                ),
            ]
        })
        .collect()
}

/// Write groups to `path` as pretty-printed JSON
pub fn write_targets_file(path: impl AsRef<Path>, groups: &[TargetGroup]) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::Configuration("output path must not be empty".into()));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, groups)?;
    writer.flush()?;

    debug!(path = %path.display(), groups = groups.len(), "Wrote targets file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn test_generate_two_groups_per_host() {
        let groups = generate_targets(["gpu01", "gpu02"]);

        assert_eq!(
            groups,
            vec![
                TargetGroup::new(["gpu01:9400"], [("job", "dcgm")]),
                TargetGroup::new(["gpu01:9100"], [("job", "node")]),
                TargetGroup::new(["gpu02:9400"], [("job", "dcgm")]),
                TargetGroup::new(["gpu02:9100"], [("job", "node")]),
            ]
        );
    }

    #[test]
    fn test_generate_no_hosts() {
        assert!(generate_targets(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_write_targets_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("targets.json");

        write_targets_file(&path, &generate_targets(["gpu01"])).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TargetGroup> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(written.contains("\n  {\n    \"targets\": [\n      \"gpu01:9400\"\n    ],"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("targets.json");

        let err = write_targets_file(&path, &[]).unwrap_err();
        assert_matches!(err, Error::Io(_));
    }
}
