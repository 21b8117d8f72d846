use std::ops::Range;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::console::Console;
use crate::error::{CrawlerError, Result};
use crate::hooks::IndexRecordSetter;

use super::line_io;

/// A resumable, append-only content store: `<base>.jsonl` holding one JSON record per line,
/// paired with a `<base>.index` summarizing each record as `{url, line, ..}`.
///
/// The index is rebuilt from `.jsonl` whenever it is missing or its line count disagrees with
/// `.jsonl`'s, which is what makes a torn append (a crash between the two file writes) safe to
/// recover from at the next open.
pub struct IndexReader {
    jsonl_path: PathBuf,
    index_path: PathBuf,
    entries: Vec<Map<String, Value>>,
    index_record_setter: Option<IndexRecordSetter>,
}

impl IndexReader {
    /// Opens the store rooted at `dir/base`, creating it (after confirmation) if neither file
    /// exists, or rebuilding `.index` from `.jsonl` if they disagree.
    pub fn open(
        dir: &Path,
        base: &str,
        index_record_setter: Option<IndexRecordSetter>,
        console: &dyn Console,
    ) -> Result<Self> {
        let jsonl_path = dir.join(format!("{}.jsonl", base));
        let index_path = dir.join(format!("{}.index", base));

        if !jsonl_path.exists() && !index_path.exists() {
            let prompt = format!(
                "no store found at {} - create it? [y/N] ",
                jsonl_path.display()
            );

            if !console.confirm(&prompt)? {
                return Err(CrawlerError::CreationDeclined {
                    path: jsonl_path.display().to_string(),
                });
            }

            std::fs::create_dir_all(dir)?;
            std::fs::File::create(&jsonl_path)?;
            std::fs::File::create(&index_path)?;

            return Ok(IndexReader {
                jsonl_path,
                index_path,
                entries: Vec::new(),
                index_record_setter,
            });
        }

        let content_count = line_io::count_lines(&jsonl_path)?;
        let index_count = line_io::count_lines(&index_path)?;

        let entries = if index_count != content_count {
            console.log(&format!(
                "rebuilding index for {} ({} content lines, {} index lines)",
                jsonl_path.display(),
                content_count,
                index_count
            ));
            Self::rebuild(&jsonl_path, &index_record_setter)?
        } else {
            line_io::read_lines(&index_path)?
                .map(|value| value.map(|v| v.as_object().cloned().unwrap_or_default()))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(IndexReader {
            jsonl_path,
            index_path,
            entries,
            index_record_setter,
        })
    }

    fn rebuild(
        jsonl_path: &Path,
        index_record_setter: &Option<IndexRecordSetter>,
    ) -> Result<Vec<Map<String, Value>>> {
        let mut entries = Vec::new();

        for (line, record) in line_io::read_lines(jsonl_path)?.enumerate() {
            let record = record?;
            let mut entry = Map::new();
            entry.insert("line".to_owned(), Value::from(line));

            if let Some(url) = record.as_object().and_then(|o| o.get("url")).cloned() {
                entry.insert("url".to_owned(), url);
            }

            if let Some(setter) = index_record_setter {
                for (key, value) in setter(&record) {
                    entry.insert(key, value);
                }
            }

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Appends `record` to `.jsonl` and its derived index entry (`{url, line, ..}`) to `.index`.
    ///
    /// `url` and `line` are always present; an `index_record_setter`'s output is merged on top,
    /// so a setter may override `url` but never the line offset assigned here.
    pub fn write(&mut self, url: &str, record: Value) -> Result<()> {
        let line = self.entries.len();
        line_io::write_line(&self.jsonl_path, &record)?;

        let mut entry = Map::new();
        entry.insert("url".to_owned(), Value::String(url.to_owned()));

        if let Some(setter) = &self.index_record_setter {
            for (key, value) in setter(&record) {
                entry.insert(key, value);
            }
        }

        entry.insert("line".to_owned(), Value::from(line));

        line_io::write_line(&self.index_path, &Value::Object(entry.clone()))?;
        self.entries.push(entry);
        Ok(())
    }

    /// Number of records currently in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the record stored at index position `i`.
    pub fn get(&self, i: usize) -> Result<Value> {
        let entry = self.entries.get(i).ok_or_else(|| CrawlerError::MissingLine {
            line: i,
            path: self.jsonl_path.display().to_string(),
        })?;

        let line = entry
            .get("line")
            .and_then(Value::as_u64)
            .ok_or_else(|| CrawlerError::MissingLine {
                line: i,
                path: self.jsonl_path.display().to_string(),
            })? as usize;

        line_io::read_lines(&self.jsonl_path)?
            .nth(line)
            .ok_or_else(|| CrawlerError::MissingLine {
                line,
                path: self.jsonl_path.display().to_string(),
            })?
    }

    /// Reads every record whose index entry satisfies `i..j`.
    pub fn get_range(&self, range: Range<usize>) -> Result<Vec<Value>> {
        range.map(|i| self.get(i)).collect()
    }

    /// Streams every stored record, in append order.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<Value>>> {
        line_io::read_lines(&self.jsonl_path)
    }

    /// Returns every record whose index entry matches `predicate`.
    pub fn find(&self, predicate: impl Fn(&Map<String, Value>) -> bool) -> Result<Vec<Value>> {
        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| predicate(entry))
            .map(|(i, _)| i)
            .collect();

        matches.into_iter().map(|i| self.get(i)).collect()
    }

    /// True if any index entry's `url` field equals `url`.
    pub fn contains_url(&self, url: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.get("url").and_then(Value::as_str) == Some(url))
    }

    /// The ordered slice of index entries.
    pub fn index_data(&self) -> &[Map<String, Value>] {
        &self.entries
    }

    /// Path to the backing `.jsonl` content file.
    pub fn path(&self) -> &Path {
        &self.jsonl_path
    }

    /// Path to the sibling `.index` file.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}
