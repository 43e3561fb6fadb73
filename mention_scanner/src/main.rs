//! Mention Scanner: counts stock ticker mentions on a forum channel over the last
//! 24 hours and publishes a ranked JSON summary.
//!
//! One run goes through three stages, each finishing before the next starts:
//!
//! - collection: newest posts of the channel, filtered to the lookback window, and
//!   their comments (with a bounded number of collapsed threads expanded), folded
//!   into one text corpus;
//! - matching: every symbol of the curated ticker list counted in the corpus;
//! - reporting: counts ranked, stamped with US Eastern time, written to a local
//!   JSON file and uploaded to the object store.
//!
//! Usage example (CLI):
//! ```bash
//! mention_scanner --tickers ./curated_stock_tickers.txt --publish local
//! ```
//!
//! Credentials are read from the environment (or a `.env` file), see `config`.
//! Any failure aborts the run before anything is published; the external scheduler
//! simply tries again next time.
#![warn(missing_docs)]
mod args;
mod collector;
mod config;
mod model;
mod publisher;
mod reddit;
mod signing;

use crate::args::Args;
use crate::collector::{Collector, CollectorSettings, ForumSource};
use crate::config::Config;
use crate::publisher::S3Publisher;
use crate::reddit::RedditSource;
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;
use mention_common::{MentionError, Report, Result, TickerDictionary, build_tally};

fn main() -> Result<(), MentionError> {
    init_logger();
    let args = Args::parse();
    let config = Config::from_env()?;
    let storage = config.storage_for(args.publish)?;

    let dictionary = TickerDictionary::load(&args.tickers)?;
    info!("Tickers: {} symbols from {}", dictionary.len(), args.tickers.display());

    let settings = CollectorSettings {
        channel: args.channel.clone(),
        max_candidates: args.max_posts,
        replace_more_limit: args.replace_more_limit,
        ..CollectorSettings::default()
    };
    let source = RedditSource::connect(&config.forum)?;
    let report = scan(source, settings, &dictionary, Utc::now)?;
    report.write_to(&args.output)?;

    match storage {
        Some(credentials) => {
            S3Publisher::new(credentials, &args.bucket, &args.object_key)?.publish(&args.output)?;
        }
        None => info!("Publishing disabled, report kept at {}", args.output.display()),
    }

    Ok(())
}

/// Collects, counts and ranks one channel scan.
///
/// The clock is read twice: once to anchor the lookback window before collecting,
/// and again once counting is done to stamp the report.
fn scan<S, C>(
    source: S,
    settings: CollectorSettings,
    dictionary: &TickerDictionary,
    mut clock: C,
) -> Result<Report>
where
    S: ForumSource,
    C: FnMut() -> DateTime<Utc>,
{
    let collection = Collector::new(source, settings).collect(clock())?;

    let tally = build_tally(dictionary, collection.corpus.as_str())?;
    info!("{} of {} symbols mentioned", tally.len(), dictionary.len());

    Ok(Report::build(
        collection.post_count,
        collection.comment_count,
        tally,
        clock(),
    ))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
