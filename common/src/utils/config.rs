use std::path::PathBuf;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Filesystem roots shared by the processing binaries.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_raw_data_dir")]
    pub raw_data_dir: PathBuf,
    #[serde(default = "default_processed_data_dir")]
    pub processed_data_dir: PathBuf,
    #[serde(default = "default_corpora_dir")]
    pub corpora_dir: PathBuf,
}

fn default_raw_data_dir() -> PathBuf {
    PathBuf::from("raw_data")
}

fn default_processed_data_dir() -> PathBuf {
    PathBuf::from("processed_data")
}

fn default_corpora_dir() -> PathBuf {
    PathBuf::from("corpora")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            raw_data_dir: default_raw_data_dir(),
            processed_data_dir: default_processed_data_dir(),
            corpora_dir: default_corpora_dir(),
        }
    }
}

impl AppConfig {
    /// Directory holding the raw inputs of one dataset family.
    pub fn raw_dataset_dir(&self, dataset: &str) -> PathBuf {
        self.raw_data_dir.join(dataset)
    }

    /// Directory holding normalized and subsampled splits of one dataset family.
    pub fn processed_dataset_dir(&self, dataset: &str) -> PathBuf {
        self.processed_data_dir.join(dataset)
    }

    pub fn corpus_dir(&self, dataset: &str) -> PathBuf {
        self.corpora_dir.join(dataset)
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default());

    build_config(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn empty_sources_fall_back_to_defaults() {
        let config = build_config(Config::builder()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.processed_dataset_dir("iirc"),
            PathBuf::from("processed_data/iirc")
        );
    }

    #[test]
    fn file_source_overrides_single_root() {
        let builder = Config::builder().add_source(File::from_str(
            "raw_data_dir = \"/srv/raw\"",
            FileFormat::Toml,
        ));
        let config = build_config(builder).unwrap();

        assert_eq!(config.raw_data_dir, PathBuf::from("/srv/raw"));
        assert_eq!(config.raw_dataset_dir("iirc"), PathBuf::from("/srv/raw/iirc"));
        assert_eq!(config.corpora_dir, PathBuf::from("corpora"));
    }
}
