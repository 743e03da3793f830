use std::{collections::HashMap, fmt, path::Path};

use anyhow::{Context, Result};
use scraper::Html;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use tracing::{debug, info};

use crate::io::read_json;

/// Paragraph candidates must contain strictly more tokens than this.
pub const MIN_PARAGRAPH_TOKENS: usize = 10;

/// Case-insensitive lookup from article title to its extracted paragraphs.
#[derive(Debug, Clone, Default)]
pub struct ArticleTable {
    articles: HashMap<String, Vec<String>>,
}

impl ArticleTable {
    /// Builds the table from `(title, raw page markup)` pairs. When two titles
    /// collide after lower-casing, the later page wins.
    pub fn from_pages<I, T, P>(pages: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: AsRef<str>,
        P: AsRef<str>,
    {
        let mut articles = HashMap::new();
        for (title, page_html) in pages {
            let paragraphs = extract_paragraphs(page_html.as_ref());
            if paragraphs.is_empty() {
                debug!(title = title.as_ref(), "Article yielded no paragraphs");
            }
            articles.insert(title.as_ref().to_lowercase(), paragraphs);
        }
        Self { articles }
    }

    /// `None` when the title is absent; an empty slice when it was present but
    /// nothing survived extraction.
    pub fn paragraphs(&self, title: &str) -> Option<&[String]> {
        self.articles.get(&title.to_lowercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Strips markup from a page and keeps the trimmed lines long enough to be
/// paragraphs, in document order.
///
/// The HTML5 parser recovers from any malformed input, so broken markup can
/// only shrink the output.
pub fn extract_paragraphs(page_html: &str) -> Vec<String> {
    let document = Html::parse_document(page_html);
    let text: String = document.root_element().text().collect();

    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.split_whitespace().count() > MIN_PARAGRAPH_TOKENS)
        .map(ToString::to_string)
        .collect()
}

/// `title -> page markup` entries of the article file, in file order.
#[derive(Debug, Default)]
struct RawPages(Vec<(String, String)>);

impl<'de> Deserialize<'de> for RawPages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PagesVisitor;

        impl<'de> Visitor<'de> for PagesVisitor {
            type Value = RawPages;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of article title to page markup")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawPages, A::Error> {
                let mut pages = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    pages.push(entry);
                }
                Ok(RawPages(pages))
            }
        }

        deserializer.deserialize_map(PagesVisitor)
    }
}

/// Reads a JSON object of `title -> page markup` and extracts every page.
pub fn load_article_table(articles_path: &Path) -> Result<ArticleTable> {
    let RawPages(raw_pages) = read_json::<RawPages>(articles_path)
        .with_context(|| format!("loading article corpus {}", articles_path.display()))?;

    let table = ArticleTable::from_pages(raw_pages);
    info!(
        articles = table.len(),
        path = %articles_path.display(),
        "Extracted article paragraphs"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        (1..=count)
            .map(|n| format!("w{n}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn token_boundary_is_strictly_more_than_ten() {
        let html = format!("<p>{}</p>\n<p>{}</p>", words(10), words(11));
        let paragraphs = extract_paragraphs(&html);
        assert_eq!(paragraphs, vec![words(11)]);
    }

    #[test]
    fn blank_and_whitespace_lines_never_survive() {
        let html = format!(
            "<div>\n   \n\t\n<p>  {}  </p>\n\n</div>",
            words(12)
        );
        let paragraphs = extract_paragraphs(&html);
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs.iter().all(|p| !p.trim().is_empty()));
        assert_eq!(paragraphs[0], words(12));
    }

    #[test]
    fn order_and_inline_markup_are_preserved() {
        let html = format!(
            "<h1>Title</h1>\n<p>first <b>bold</b> {}</p>\n<p>second {}</p>",
            words(10),
            words(10)
        );
        let paragraphs = extract_paragraphs(&html);
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].starts_with("first bold w1"));
        assert!(paragraphs[1].starts_with("second w1"));
    }

    #[test]
    fn colliding_titles_keep_the_page_later_in_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("context_articles.json");
        let first = words(11);
        let second = format!("z {}", words(11));
        std::fs::write(
            &path,
            format!(r#"{{"foo": "<p>{first}</p>", "Foo": "<p>{second}</p>"}}"#),
        )?;

        let table = load_article_table(&path)?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.paragraphs("foo"), Some([second].as_slice()));
        Ok(())
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        assert!(extract_paragraphs("<p <<< </div></span>>>").is_empty());
        assert!(extract_paragraphs("").is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive_and_distinguishes_empty_from_missing() {
        let long = format!("<p>{}</p>", words(11));
        let table = ArticleTable::from_pages([("Foo Bar", long.as_str()), ("Empty", "<p>short</p>")]);

        assert_eq!(table.paragraphs("foo bar").map(<[String]>::len), Some(1));
        assert_eq!(table.paragraphs("FOO BAR").map(<[String]>::len), Some(1));
        assert_eq!(table.paragraphs("empty").map(<[String]>::len), Some(0));
        assert!(table.paragraphs("missing").is_none());
    }
}
