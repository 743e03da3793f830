//! Normalized per-question records shared by every dataset family.

use common::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One paragraph attached to a question.
///
/// Fields this crate does not know about are kept in `extra`, and optional
/// fields are written back only when they were read, so records produced by
/// other converters survive a read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<usize>,
    pub title: String,
    pub paragraph_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_supporting: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Context {
    pub fn new(idx: usize, title: &str, paragraph_text: &str, is_supporting: bool) -> Self {
        Self {
            idx: Some(idx),
            title: title.trim().to_string(),
            paragraph_text: paragraph_text.trim().to_string(),
            is_supporting: Some(is_supporting),
            extra: Map::new(),
        }
    }

    pub fn is_supporting(&self) -> bool {
        self.is_supporting.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDate {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswersObject {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub date: AnswerDate,
    #[serde(default)]
    pub spans: Vec<String>,
}

impl AnswersObject {
    pub fn from_spans(spans: Vec<String>) -> Self {
        Self {
            spans,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInstance {
    pub question_id: String,
    pub question_text: String,
    pub answers_objects: Vec<AnswersObject>,
    pub contexts: Vec<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_contexts: Option<Vec<Context>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_titles: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedInstance {
    pub fn pinned_contexts(&self) -> &[Context] {
        self.pinned_contexts.as_deref().unwrap_or(&[])
    }
}

/// Answer annotation of a raw question.
///
/// Parsed through [`RawAnswer`] so an unknown `type` tag fails while the raw
/// split is read, before any record is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAnswer")]
pub enum AnswerSpec {
    /// Unanswerable; the question produces no record.
    None,
    Span(Vec<String>),
    /// `binary` (yes/no) and `value` answers carry a single text value.
    Value(String),
}

impl AnswerSpec {
    /// Answer texts for the `spans` field, or `None` when the question is dropped.
    pub fn into_spans(self) -> Option<Vec<String>> {
        match self {
            Self::None => None,
            Self::Span(spans) => Some(spans),
            Self::Value(value) => Some(vec![value]),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAnswer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    answer_spans: Option<Vec<RawSpan>>,
    #[serde(default)]
    answer_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    text: String,
}

impl TryFrom<RawAnswer> for AnswerSpec {
    type Error = AppError;

    fn try_from(raw: RawAnswer) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "none" => Ok(Self::None),
            "span" => {
                let spans = raw.answer_spans.ok_or_else(|| {
                    AppError::InvalidAnswer("span answer without answer_spans".to_string())
                })?;
                Ok(Self::Span(
                    spans
                        .into_iter()
                        .map(|span| span.text.trim().to_string())
                        .collect(),
                ))
            }
            "binary" | "value" => {
                let value = raw.answer_value.ok_or_else(|| {
                    AppError::InvalidAnswer(format!("{} answer without answer_value", raw.kind))
                })?;
                Ok(Self::Value(value.trim().to_string()))
            }
            other => Err(AppError::UnknownAnswerType(other.to_string())),
        }
    }
}
