use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Selector;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::feed;
use crate::page;
use crate::parser::{self, NameExceptions};
use crate::record::{CommitteeMeta, CommitteeRecord, CommitteeType, RosterRecord, Warning, WarningKind};
use crate::settings::Settings;
use crate::topics::Topics;
use crate::truncate;

const SNIPPET_CHARS: usize = 160;

/// A finished row and everything that went wrong building it.
#[derive(Debug)]
pub struct Assembled {
    pub record: CommitteeRecord,
    pub warnings: Vec<Warning>,
}

/// Turns fetched committee pages into table rows.
pub struct Assembler {
    topics: Topics,
    selector: Selector,
    exceptions: NameExceptions,
}

impl Assembler {
    pub fn new(topics: Topics, selector: Selector, exceptions: NameExceptions) -> Self {
        Assembler {
            topics,
            selector,
            exceptions,
        }
    }

    /// Never fails: unreadable pages still produce a row with an empty roster.
    pub fn assemble(&self, meta: CommitteeMeta, page: Result<String, FetchError>) -> Assembled {
        let mut warnings = Vec::new();
        let roster = match page {
            Err(e) => {
                warnings.push(Warning::new(
                    WarningKind::FetchFailed,
                    "Page could not be fetched, still added",
                    e.to_string(),
                ));
                RosterRecord::absent()
            }
            Ok(html) => self.roster(&meta, &html, &mut warnings),
        };

        for w in &warnings {
            warn!(
                committee = %meta.name,
                kind = ?w.kind,
                snippet = %truncate(&w.snippet, SNIPPET_CHARS),
                "{}",
                w.message
            );
        }

        let topic = self.topics.get(&meta.name).map(str::to_string);
        Assembled {
            record: CommitteeRecord {
                meta,
                roster,
                topic,
            },
            warnings,
        }
    }

    fn roster(&self, meta: &CommitteeMeta, html: &str, warnings: &mut Vec<Warning>) -> RosterRecord {
        let Some(block) = page::content_block(html, &self.selector) else {
            warnings.push(Warning::new(
                WarningKind::MissingContent,
                "Missing committee info, still added",
                meta.link.as_str(),
            ));
            return RosterRecord::absent();
        };

        let text = page::normalize_text(&block);
        match parser::extract(&text, &self.exceptions) {
            Ok(extraction) => {
                warnings.extend(extraction.warnings);
                extraction.record
            }
            Err(e) => {
                warnings.push(Warning::new(WarningKind::LayoutViolation, e.to_string(), text));
                RosterRecord::absent()
            }
        }
    }
}

/// Discover committees in each feed, then scrape them one at a time.
/// Output follows feed order.
pub async fn run(
    settings: &Settings,
    types: &[CommitteeType],
    topics: Topics,
) -> Result<Vec<CommitteeRecord>> {
    let client = page::client(settings)?;
    let assembler = Assembler::new(
        topics,
        page::selector(&settings.content_selector)?,
        settings.exceptions(),
    );

    let mut metadata = Vec::new();
    for &committee_type in types {
        let url = settings.feed_url(committee_type);
        let xml = feed::fetch_feed(&client, &url).await?;
        let items = feed::parse_items(&xml)
            .with_context(|| format!("Failed to parse {} feed", committee_type))?;
        let found = feed::committee_metadata(items, committee_type);
        info!("{} feed: {} committees", committee_type, found.len());
        metadata.extend(found);
    }

    let pb = ProgressBar::new(metadata.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {wide_msg}")?
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(metadata.len());
    let mut degraded = 0usize;
    for meta in metadata {
        pb.set_message(meta.name.clone());
        let page = page::fetch_page(&client, &meta.link, settings.max_retries).await;
        let assembled = assembler.assemble(meta, page);
        if !assembled.warnings.is_empty() {
            degraded += 1;
        }
        records.push(assembled.record);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Assembled {} committees ({} with warnings)",
        records.len(),
        degraded
    );
    Ok(records)
}

// ── Tests ──
