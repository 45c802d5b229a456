//! Direction map files
//!
//! Reads the objective direction of each problem, with optional per-instance
//! overrides, from a TOML or JSON file:
//!
//! ```toml
//! [problems]
//! jobshop = "minimize"
//! knapsack = "maximize"
//!
//! [instances]
//! "jobshop/ft10" = "minimize"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solverbench_domain::{DirectionMap, InstanceKey, ObjectiveDirection};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};

/// Supported direction file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionFormat {
    Toml,
    Json,
}

impl DirectionFormat {
    /// Detect format from file extension, TOML unless the file ends in `.json`
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectionFile {
    #[serde(default)]
    problems: BTreeMap<String, String>,
    #[serde(default)]
    instances: BTreeMap<String, String>,
}

fn parse_direction(value: &str, entry: &str) -> Result<ObjectiveDirection> {
    match ObjectiveDirection::parse(value) {
        Some(direction) => Ok(direction),
        None => bail!(
            "Invalid direction '{}' for '{}': expected minimize or maximize",
            value,
            entry
        ),
    }
}

/// Parse the contents of a direction file
pub fn parse_directions(contents: &str, format: DirectionFormat) -> Result<DirectionMap> {
    let file: DirectionFile = match format {
        DirectionFormat::Toml => toml::from_str(contents).context("Failed to parse TOML")?,
        DirectionFormat::Json => serde_json::from_str(contents).context("Failed to parse JSON")?,
    };

    let mut directions = DirectionMap::new();
    for (problem, value) in &file.problems {
        directions.insert_problem(problem.as_str(), parse_direction(value, problem)?);
    }
    for (instance, value) in &file.instances {
        let Some((problem, name)) = instance.split_once('/') else {
            bail!(
                "Invalid instance key '{}': expected 'problem/instance'",
                instance
            );
        };
        if problem.is_empty() || name.is_empty() {
            bail!(
                "Invalid instance key '{}': expected 'problem/instance'",
                instance
            );
        }
        directions.insert_instance(
            InstanceKey::new(problem, name),
            parse_direction(value, instance)?,
        );
    }

    Ok(directions)
}

/// Load a direction file
#[instrument(fields(path = %path.display()))]
pub fn load_directions(path: &Path) -> Result<DirectionMap> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read direction file {}", path.display()))?;
    let directions = parse_directions(&contents, DirectionFormat::from_extension(path))
        .with_context(|| format!("Invalid direction file {}", path.display()))?;
    debug!(entries = directions.len(), "Loaded direction map");
    Ok(directions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solverbench_domain::ProblemId;

    #[test]
    fn test_parse_toml() {
        let directions = parse_directions(
            r#"
[problems]
jobshop = "minimize"
knapsack = "max"

[instances]
"jobshop/ft10" = "maximize"
"#,
            DirectionFormat::Toml,
        )
        .unwrap();

        assert_eq!(directions.len(), 3);
        assert_eq!(
            directions.problem(&ProblemId::new("knapsack")),
            Some(ObjectiveDirection::Maximize)
        );
        assert_eq!(
            directions.lookup(&InstanceKey::new("jobshop", "ft06")),
            Some(ObjectiveDirection::Minimize)
        );
        assert_eq!(
            directions.lookup(&InstanceKey::new("jobshop", "ft10")),
            Some(ObjectiveDirection::Maximize)
        );
    }

    #[test]
    fn test_parse_json() {
        let directions = parse_directions(
            r#"{"problems": {"jobshop": "minimize"}}"#,
            DirectionFormat::Json,
        )
        .unwrap();
        assert_eq!(directions.len(), 1);
    }

    #[test]
    fn test_invalid_direction() {
        let error = parse_directions("[problems]\njobshop = \"sideways\"\n", DirectionFormat::Toml)
            .unwrap_err();
        assert!(error.to_string().contains("sideways"));
    }

    #[test]
    fn test_invalid_instance_key() {
        let result = parse_directions("[instances]\nft10 = \"minimize\"\n", DirectionFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DirectionFormat::from_extension(Path::new("dirs.JSON")),
            DirectionFormat::Json
        );
        assert_eq!(
            DirectionFormat::from_extension(Path::new("dirs.toml")),
            DirectionFormat::Toml
        );
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directions.toml");
        std::fs::write(&path, "[problems]\nknapsack = \"maximize\"\n").unwrap();

        let directions = load_directions(&path).unwrap();
        assert_eq!(
            directions.lookup(&InstanceKey::new("knapsack", "k50")),
            Some(ObjectiveDirection::Maximize)
        );
        assert!(load_directions(&dir.path().join("missing.toml")).is_err());
    }
}
