use std::collections::HashMap;
use std::io;
use std::mem::take;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Hand-maintained committee name → topic mapping.
#[derive(Debug, Clone, Default)]
pub struct Topics {
    by_name: HashMap<String, String>,
}

impl Topics {
    /// Read `name,topic` rows. A missing file is not fatal: every committee
    /// just gets an empty topic.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let topics = Topics::parse(&text);
                if topics.is_empty() {
                    warn!("Topic file {} has no name,topic rows", path.display());
                }
                info!("Loaded {} committee topics from {}", topics.len(), path.display());
                Ok(topics)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Topic file {} not found, topics left empty", path.display());
                Ok(Topics::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn parse(text: &str) -> Self {
        let by_name = parse_rows(text, ',')
            .into_iter()
            .filter_map(|mut row| {
                if row.len() < 2 {
                    return None;
                }
                let topic = take(&mut row[1]);
                let name = take(&mut row[0]);
                Some((name, topic))
            })
            .collect();
        Topics { by_name }
    }

    /// `None` for unmapped committees and blank topics.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Minimal CSV parser (quotes + CRLF tolerant).
fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }
    rows
}

// ── Tests ──
