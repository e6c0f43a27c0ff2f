//! Configuration model loaded from external sources.

use std::env;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::MATCH_THRESHOLD;
use crate::processing::category::IdComparison;
use crate::processing::index::CollisionPolicy;

/// Config file read when `MATCHER_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "catalog-matcher.yaml";

fn default_threshold() -> f64 {
    MATCH_THRESHOLD
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for a catalog merge run.
///
/// Values come from an optional YAML file overlaid with `MATCHER_*`
/// environment variables, e.g. `MATCHER_CATALOG_PATH` or
/// `MATCHER_BATCH_PATHS=json,extra/more.json`.
pub struct MatcherConfig {
    pub catalog_path: PathBuf,
    /// Batch files, or directories whose `*.json` files are all loaded.
    #[serde(default)]
    pub batch_paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    #[serde(default)]
    pub unmatched_path: Option<PathBuf>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    #[serde(default)]
    pub id_comparison: IdComparison,
}

impl MatcherConfig {
    /// Loads the configuration named by `MATCHER_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn load() -> Result<Self, ConfigError> {
        let file = env::var("MATCHER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    /// Loads `file` (optional) and applies environment overrides on top.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::new(file, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("MATCHER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("batch_paths"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::MatcherConfig;
    use crate::processing::category::IdComparison;
    use crate::processing::index::CollisionPolicy;

    #[test]
    fn yaml_file_is_deserialized_with_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "catalog_path: woo.json\nbatch_paths:\n  - json\noutput_path: woo_updated.json\ncollision_policy: first_write_wins"
        )
        .expect("write config");

        let path = file.path().to_str().expect("utf-8 path");
        let config = MatcherConfig::load_from(path).expect("config");

        assert_eq!(config.catalog_path, PathBuf::from("woo.json"));
        assert_eq!(config.batch_paths, vec![PathBuf::from("json")]);
        assert_eq!(config.unmatched_path, None);
        assert_eq!(config.threshold, 90.0);
        assert_eq!(config.collision_policy, CollisionPolicy::FirstWriteWins);
        assert_eq!(config.id_comparison, IdComparison::Stringified);
    }

    #[test]
    fn missing_required_paths_fail() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "threshold: 85").expect("write config");

        let path = file.path().to_str().expect("utf-8 path");

        assert!(MatcherConfig::load_from(path).is_err());
    }
}
