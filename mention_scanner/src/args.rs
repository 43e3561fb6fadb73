//! Command-line arguments for the mention scanner.
//!
//! Every flag has a default, so a bare `mention_scanner` run scans
//! `r/wallstreetbets` and publishes to the default bucket.
use clap::{Parser, ValueEnum};
use mention_common::net::{
    DEFAULT_BUCKET, DEFAULT_CHANNEL, DEFAULT_OBJECT_KEY, DEFAULT_REPORT_PATH,
    DEFAULT_TICKERS_PATH,
};
use strum_macros::{Display, EnumString};
use std::path::PathBuf;

/// Where the report goes once it is written locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PublishTarget {
    /// Upload to the object store.
    S3,
    /// Keep the local file only.
    Local,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the curated ticker list, one symbol per line.
    #[clap(long, default_value = DEFAULT_TICKERS_PATH)]
    pub tickers: PathBuf,

    /// Local path the JSON report is written to.
    #[clap(long, default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Forum channel to scan.
    #[clap(long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Newest posts examined before the age filter.
    #[clap(long, default_value_t = 900)]
    pub max_posts: usize,

    /// Collapsed comment threads expanded per post.
    #[clap(long, default_value_t = 1)]
    pub replace_more_limit: usize,

    /// Publish target for the report.
    #[clap(long, value_enum, default_value_t = PublishTarget::S3)]
    pub publish: PublishTarget,

    /// Destination bucket.
    #[clap(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Destination object key.
    #[clap(long, default_value = DEFAULT_OBJECT_KEY)]
    pub object_key: String,
}
