use std::path::PathBuf;

use clap::ValueEnum;
use common::utils::config::AppConfig;

/// Dataset families whose normalized dev split can be subsampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    #[value(name = "hotpotqa")]
    HotpotQa,
    #[value(name = "2wikimultihopqa")]
    TwoWikiMultihopQa,
    #[value(name = "musique")]
    Musique,
    #[value(name = "iirc")]
    Iirc,
}

impl DatasetKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::HotpotQa => "hotpotqa",
            Self::TwoWikiMultihopQa => "2wikimultihopqa",
            Self::Musique => "musique",
            Self::Iirc => "iirc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HotpotQa => "HotpotQA",
            Self::TwoWikiMultihopQa => "2WikiMultihopQA",
            Self::Musique => "MuSiQue",
            Self::Iirc => "IIRC",
        }
    }

    /// Normalized split file, e.g. `processed_data/iirc/dev.jsonl`.
    pub fn processed_split_path(self, config: &AppConfig, split: &str) -> PathBuf {
        config
            .processed_dataset_dir(self.id())
            .join(format!("{split}.jsonl"))
    }

    pub fn subsampled_split_path(self, config: &AppConfig, set: SetName) -> PathBuf {
        config
            .processed_dataset_dir(self.id())
            .join(format!("{}_subsampled.jsonl", set.id()))
    }

    pub fn reference_corpus_path(self, config: &AppConfig) -> PathBuf {
        config.corpus_dir(self.id()).join("corpus.jsonl")
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Label of a subsampled output split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum SetName {
    Dev,
    Test,
}

impl SetName {
    pub fn id(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }

    pub fn sample_size(self) -> usize {
        match self {
            Self::Dev => 100,
            Self::Test => 500,
        }
    }

    /// Previously drawn sample whose questions must not be drawn again.
    pub fn excluded_set(self) -> Option<SetName> {
        match self {
            Self::Dev => None,
            Self::Test => Some(Self::Dev),
        }
    }
}

impl std::fmt::Display for SetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_dataset_layout() {
        let config = AppConfig::default();
        assert_eq!(
            DatasetKind::Musique.processed_split_path(&config, "dev"),
            PathBuf::from("processed_data/musique/dev.jsonl")
        );
        assert_eq!(
            DatasetKind::Musique.subsampled_split_path(&config, SetName::Test),
            PathBuf::from("processed_data/musique/test_subsampled.jsonl")
        );
        assert_eq!(
            DatasetKind::TwoWikiMultihopQa.reference_corpus_path(&config),
            PathBuf::from("corpora/2wikimultihopqa/corpus.jsonl")
        );
    }

    #[test]
    fn test_sets_are_larger_and_exclude_dev() {
        assert_eq!(SetName::Dev.sample_size(), 100);
        assert_eq!(SetName::Test.sample_size(), 500);
        assert_eq!(SetName::Dev.excluded_set(), None);
        assert_eq!(SetName::Test.excluded_set(), Some(SetName::Dev));
    }
}
