//! Reference paragraph corpora used to canonicalise sampled contexts.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::io::read_jsonl;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusParagraph {
    pub title: String,
    #[serde(alias = "text")]
    pub paragraph_text: String,
}

/// Text lookup against a paragraph corpus.
pub trait ParagraphLookup {
    /// Canonical corpus entry whose text matches `paragraph_text`, if any.
    fn find_matching_paragraph(&self, paragraph_text: &str) -> Option<&CorpusParagraph>;
}

/// In-memory corpus keyed by whitespace-normalised paragraph text.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    by_text: HashMap<String, CorpusParagraph>,
}

impl ReferenceCorpus {
    /// The first paragraph seen for a given text is the canonical one.
    pub fn from_paragraphs<I>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = CorpusParagraph>,
    {
        let mut by_text = HashMap::new();
        for paragraph in paragraphs {
            by_text
                .entry(lookup_key(&paragraph.paragraph_text))
                .or_insert(paragraph);
        }
        Self { by_text }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let paragraphs: Vec<CorpusParagraph> = read_jsonl(path)
            .with_context(|| format!("loading reference corpus {}", path.display()))?;
        let corpus = Self::from_paragraphs(paragraphs);
        info!(
            paragraphs = corpus.len(),
            path = %path.display(),
            "Loaded reference corpus"
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }
}

impl ParagraphLookup for ReferenceCorpus {
    fn find_matching_paragraph(&self, paragraph_text: &str) -> Option<&CorpusParagraph> {
        self.by_text.get(&lookup_key(paragraph_text))
    }
}

/// Collapses whitespace runs and trims the ends.
fn lookup_key(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn paragraph(title: &str, text: &str) -> CorpusParagraph {
        CorpusParagraph {
            title: title.to_string(),
            paragraph_text: text.to_string(),
        }
    }

    #[test]
    fn lookup_ignores_whitespace_differences_only() {
        let corpus = ReferenceCorpus::from_paragraphs([paragraph(
            "Canonical",
            "The tower was completed in 1889.",
        )]);

        let hit = corpus
            .find_matching_paragraph("  The tower  was\ncompleted in 1889. ")
            .unwrap();
        assert_eq!(hit.title, "Canonical");

        assert!(corpus
            .find_matching_paragraph("The tower was completed in 1890.")
            .is_none());
    }

    #[test]
    fn first_entry_wins_for_duplicate_text() {
        let corpus = ReferenceCorpus::from_paragraphs([
            paragraph("First", "same text"),
            paragraph("Second", "same text"),
        ]);
        assert_eq!(corpus.len(), 1);
        assert_eq!(
            corpus.find_matching_paragraph("same text").map(|p| p.title.as_str()),
            Some("First")
        );
    }

    #[test]
    fn load_accepts_text_alias() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("corpus.jsonl");
        fs::write(
            &path,
            "{\"title\":\"A\",\"paragraph_text\":\"alpha\"}\n{\"title\":\"B\",\"text\":\"beta\"}\n",
        )?;

        let corpus = ReferenceCorpus::load(&path)?;
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.find_matching_paragraph("beta").map(|p| p.title.as_str()),
            Some("B")
        );
        Ok(())
    }
}
