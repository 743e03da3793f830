//! IIRC normalizer.
//!
//! Every question of a raw IIRC passage becomes one [`NormalizedInstance`]:
//! annotated snippets are matched back to full article paragraphs
//! (supporting contexts), one random paragraph from each linked article is
//! added as a distractor, and the main passage is pinned.

use std::collections::HashSet;

use anyhow::{Context as _, Result};
use common::{error::AppError, utils::config::AppConfig};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Builder;

use crate::{
    articles::{load_article_table, ArticleTable},
    io::{read_json, write_jsonl},
    matching::{best_match, MatchStats},
    records::{AnswerSpec, AnswersObject, Context, NormalizedInstance},
};

pub const DATASET_ID: &str = "iirc";

/// Splits processed by a full run, in generator order.
pub const SPLITS: [&str; 2] = ["train", "dev"];

/// Snippet source title that refers to the main passage itself.
pub const MAIN_PASSAGE_TITLE: &str = "main";

const PROGRESS_EVERY: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct RawPassage {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub links: Vec<RawLink>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLink {
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub qid: Option<String>,
    pub question: String,
    pub answer: AnswerSpec,
    #[serde(default)]
    pub context: Vec<RawSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSnippet {
    pub passage: String,
    pub text: String,
}

/// Main passage state shared by all questions of a [`RawPassage`].
#[derive(Debug, Clone)]
pub struct MainPassage {
    pub title: String,
    pub text: String,
    pub link_titles: Vec<String>,
}

impl From<&RawPassage> for MainPassage {
    fn from(raw: &RawPassage) -> Self {
        Self {
            title: raw.title.trim().to_string(),
            text: raw.text.trim().to_string(),
            link_titles: raw.links.iter().map(|link| link.target.clone()).collect(),
        }
    }
}

impl MainPassage {
    fn pinned_context(&self) -> Context {
        Context::new(0, &self.title, &self.text, true)
    }
}

/// Ordered `(title, paragraph)` pairs with set-based duplicate detection.
#[derive(Debug, Default)]
struct ContextPairs {
    seen: HashSet<(String, String)>,
    pairs: Vec<(String, String)>,
}

impl ContextPairs {
    /// Returns `false` when the pair was already recorded.
    fn insert(&mut self, title: &str, paragraph_text: &str) -> bool {
        let key = (title.to_string(), paragraph_text.to_string());
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.pairs.push(key);
        true
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }
}

fn generate_question_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .simple()
        .to_string()
}

/// Builds the record for one question, or `None` for unanswerable questions.
///
/// Randomness is consumed in a fixed order: generated id (only when `qid` is
/// absent), one draw per usable link title, then the context shuffle.
pub fn normalize_question<R: Rng + ?Sized>(
    passage: &MainPassage,
    question: RawQuestion,
    articles: &ArticleTable,
    stats: &mut MatchStats,
    rng: &mut R,
) -> Result<Option<NormalizedInstance>, AppError> {
    let question_id = match question.qid {
        Some(qid) => qid,
        None => generate_question_id(rng),
    };

    let mut pairs = ContextPairs::default();

    for snippet in &question.context {
        let title = snippet.passage.trim();
        let snippet_text = snippet.text.trim();
        if title == MAIN_PASSAGE_TITLE {
            continue;
        }

        let page_texts = articles
            .paragraphs(title)
            .ok_or_else(|| AppError::MissingArticle(title.to_string()))?;

        let matched_text = match best_match(page_texts, snippet_text) {
            Some(found) => {
                stats.record(found.score);
                found.text.trim()
            }
            None => {
                warn!(
                    title = %title,
                    question_id = %question_id,
                    "Title doesn't have any passage; using the raw snippet"
                );
                snippet_text
            }
        };

        pairs.insert(title, matched_text);
    }
    let supporting_count = pairs.len();

    for link_title in &passage.link_titles {
        let Some(page_texts) = articles.paragraphs(link_title) else {
            warn!(title = %link_title, "Distractor page title not found");
            continue;
        };
        let Some(page_text) = page_texts.choose(rng) else {
            continue;
        };
        pairs.insert(link_title.trim(), page_text.trim());
    }

    let mut contexts: Vec<Context> = pairs
        .pairs
        .iter()
        .enumerate()
        .map(|(position, (title, paragraph_text))| {
            Context::new(0, title, paragraph_text, position < supporting_count)
        })
        .collect();

    contexts.shuffle(rng);
    for (idx, context) in contexts.iter_mut().enumerate() {
        context.idx = Some(idx);
    }

    let Some(spans) = question.answer.into_spans() else {
        return Ok(None);
    };

    Ok(Some(NormalizedInstance {
        question_id,
        question_text: question.question,
        answers_objects: vec![AnswersObject::from_spans(spans)],
        contexts,
        pinned_contexts: Some(vec![passage.pinned_context()]),
        valid_titles: Some(passage.link_titles.clone()),
        extra: serde_json::Map::new(),
    }))
}

/// Normalizes every question of a raw split in input order.
pub fn normalize_split<R: Rng + ?Sized>(
    passages: Vec<RawPassage>,
    articles: &ArticleTable,
    stats: &mut MatchStats,
    rng: &mut R,
) -> Result<Vec<NormalizedInstance>, AppError> {
    let mut instances = Vec::new();
    let passage_count = passages.len();

    for (passage_idx, raw_passage) in passages.into_iter().enumerate() {
        let passage = MainPassage::from(&raw_passage);
        for question in raw_passage.questions {
            if let Some(instance) = normalize_question(&passage, question, articles, stats, rng)? {
                instances.push(instance);
            }
        }

        if (passage_idx + 1) % PROGRESS_EVERY == 0 {
            info!(
                passages = passage_idx + 1,
                total = passage_count,
                instances = instances.len(),
                "Normalizing passages"
            );
        }
    }

    Ok(instances)
}

/// Full run: extract the article corpus once, then normalize every split in
/// [`SPLITS`] order. Match counters accumulate across splits.
pub fn run<R: Rng + ?Sized>(config: &AppConfig, rng: &mut R) -> Result<MatchStats> {
    let input_dir = config.raw_dataset_dir(DATASET_ID);
    let output_dir = config.processed_dataset_dir(DATASET_ID);

    let articles = load_article_table(&input_dir.join("context_articles.json"))?;

    let mut stats = MatchStats::default();
    for split in SPLITS {
        info!(split = %split, "Processing split");
        let input_path = input_dir.join(format!("{split}.json"));
        let output_path = output_dir.join(format!("{split}.jsonl"));

        let passages: Vec<RawPassage> = read_json(&input_path)
            .with_context(|| format!("reading raw IIRC {split} split"))?;

        let instances = normalize_split(passages, &articles, &mut stats, rng)
            .with_context(|| format!("normalizing IIRC {split} split"))?;

        println!("[{split}] {stats}");
        write_jsonl(&instances, &output_path)
            .with_context(|| format!("writing normalized {split} split"))?;
        info!(
            split = %split,
            instances = instances.len(),
            path = %output_path.display(),
            "Wrote normalized split"
        );
    }

    Ok(stats)
}
