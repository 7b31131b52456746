mod assemble;
mod error;
mod export;
mod feed;
mod page;
mod parser;
mod record;
mod settings;
mod topics;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use record::CommitteeType;
use settings::Settings;
use topics::Topics;

#[derive(Parser)]
#[command(name = "committee_roster", about = "Legislative committee roster scraper")]
struct Cli {
    /// Settings file (default: ./committees.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all committee feeds and pages, write committee_list.txt and committees.csv
    Run {
        /// Committee types to scrape (default: from settings)
        #[arg(short, long, value_enum, num_args = 1..)]
        types: Vec<CommitteeType>,
        /// Legislative session year, e.g. 2015
        #[arg(short, long)]
        session: Option<i32>,
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the committees found in one feed
    Feed {
        #[arg(value_enum)]
        committee_type: CommitteeType,
        #[arg(short, long)]
        session: Option<i32>,
    },
    /// Fetch one committee page and print its roster as JSON
    Page { url: String },
    /// Extract a roster from saved page text and print it as JSON
    Parse { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Run {
            types,
            session,
            out,
        } => {
            if session.is_some() {
                settings.session = session;
            }
            if let Some(out) = out {
                settings.output_dir = out;
            }
            let types = if types.is_empty() {
                settings.committee_types()?
            } else {
                types
            };
            let delimiter = settings.delimiter()?;

            let topics = Topics::load(&settings.topics_path)?;
            println!(
                "Scraping {} committee feeds for the {} session...",
                types.len(),
                settings.session()
            );
            let records = assemble::run(&settings, &types, topics).await?;
            export::save(&settings.output_dir, &records, delimiter)?;
            println!(
                "Saved {} committees to {}",
                records.len(),
                settings.output_dir.join(export::TABLE_FILE).display()
            );
            Ok(())
        }
        Commands::Feed {
            committee_type,
            session,
        } => {
            if session.is_some() {
                settings.session = session;
            }
            let client = page::client(&settings)?;
            let xml = feed::fetch_feed(&client, &settings.feed_url(committee_type)).await?;
            let metadata = feed::committee_metadata(feed::parse_items(&xml)?, committee_type);
            if metadata.is_empty() {
                println!("No committees in the {} feed.", committee_type);
                return Ok(());
            }
            for (i, m) in metadata.iter().enumerate() {
                println!("{:>3} | {:<60} | {}", i + 1, truncate(&m.name, 60), m.link);
            }
            println!("\n{} {} committees", metadata.len(), committee_type);
            Ok(())
        }
        Commands::Page { url } => {
            let client = page::client(&settings)?;
            let html = page::fetch_page(&client, &url, settings.max_retries).await?;
            let selector = page::selector(&settings.content_selector)?;
            let block = page::content_block(&html, &selector)
                .with_context(|| format!("No {} block on {}", settings.content_selector, url))?;
            let extraction =
                parser::extract(&page::normalize_text(&block), &settings.exceptions())?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
            Ok(())
        }
        Commands::Parse { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let extraction =
                parser::extract(&page::normalize_text(&raw), &settings.exceptions())?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(std::time::Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn cli_parses_run_options() {
        let cli = Cli::try_parse_from([
            "committee_roster", "run", "--types", "senate", "joint", "--session", "2015",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { types, session, out } => {
                assert_eq!(types, vec![CommitteeType::Senate, CommitteeType::Joint]);
                assert_eq!(session, Some(2015));
                assert_eq!(out, None);
            }
            _ => panic!("expected run"),
        }
    }
}
