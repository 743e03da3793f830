use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing JSON at {}", path.display()))
}

pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut items = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("reading line {} from {}", line_idx + 1, path.display())
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).with_context(|| {
            format!("parsing JSON (line {}) at {}", line_idx + 1, path.display())
        })?;
        items.push(item);
    }

    Ok(items)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory for {}", path.display()))?;
    }
    Ok(())
}

/// Writes one compact JSON object per line, creating the parent directory on demand.
pub fn write_jsonl<T: Serialize>(items: &[T], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut writer, item)
            .with_context(|| format!("serialising record for {}", path.display()))?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        value: u32,
    }

    #[test]
    fn jsonl_writer_creates_parent_and_reader_skips_blank_lines() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/out.jsonl");
        let rows = vec![
            Row {
                id: "a".to_string(),
                value: 1,
            },
            Row {
                id: "b".to_string(),
                value: 2,
            },
        ];

        write_jsonl(&rows, &path)?;
        let raw = fs::read_to_string(&path)?;
        assert_eq!(raw.lines().count(), 2);

        fs::write(&path, format!("{raw}\n   \n"))?;
        let back: Vec<Row> = read_jsonl(&path)?;
        assert_eq!(back, rows);
        Ok(())
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_json::<Row>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
