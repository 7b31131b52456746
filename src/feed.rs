use anyhow::{Context, Result};
use quick_xml::events::Event;
use tracing::{debug, info};

use crate::record::{CommitteeMeta, CommitteeType};

/// Joint feeds also publish reports and minutes; titles with these words aren't committees.
const JOINT_REPORT_WORDS: &[&str] = &[
    "Presentation",
    "Report",
    "Proceedings",
    "Minutes",
    "Proposed",
    "Audio",
    "Agenda",
];
const JOINT_RECORDS_WORD: &str = "records";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Link,
    Description,
}

impl FeedItem {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
        }
    }
}

/// Fetch a committee feed. Failure here aborts the run.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("Fetching committee feed: {}", url);
    client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Failed to fetch feed {}", url))?
        .text()
        .await
        .with_context(|| format!("Failed to read feed {}", url))
}

/// Parse RSS `<item>`s into title/link/description triples.
pub fn parse_items(xml: &str) -> Result<Vec<FeedItem>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => current = Some(FeedItem::default()),
                b"title" => field = Some(Field::Title),
                b"link" => field = Some(Field::Link),
                b"description" => field = Some(Field::Description),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.field_mut(f).push_str(&e.unescape()?);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.field_mut(f).push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                b"title" | b"link" | b"description" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

/// Keep feed items that describe committees, in feed order.
pub fn committee_metadata(items: Vec<FeedItem>, committee_type: CommitteeType) -> Vec<CommitteeMeta> {
    let total = items.len();
    let metadata: Vec<CommitteeMeta> = items
        .into_iter()
        .filter(|item| is_committee(item, committee_type))
        .map(|item| CommitteeMeta {
            name: item.description.trim().to_string(),
            committee_type,
            link: item.link.trim().to_string(),
        })
        .collect();
    debug!(
        "{} feed: kept {} of {} items",
        committee_type,
        metadata.len(),
        total
    );
    metadata
}

fn is_committee(item: &FeedItem, committee_type: CommitteeType) -> bool {
    let name = item.description.trim();
    if name.is_empty() {
        return false;
    }
    if committee_type == CommitteeType::Joint {
        if name.contains(JOINT_RECORDS_WORD) {
            return false;
        }
        if JOINT_REPORT_WORDS.iter().any(|w| item.title.contains(w)) {
            return false;
        }
    }
    true
}

// ── Tests ──
