//!
//! Core types and logic of the ticker mention scanner.
//!
//! This crate aggregates:
//! - `error`: unified error type `MentionError` used across the workspace.
//! - `result`: handy `Result<T, MentionError>` alias.
//! - `tickers`: the curated ticker dictionary and its parser.
//! - `corpus`: the text buffer built by one collection run.
//! - `matcher`: boundary-aware mention counting and tally building.
//! - `report`: ranking, timestamp formatting and the JSON report.
//! - `net`: forum and object-store endpoints and defaults.
#![warn(missing_docs)]
pub mod corpus;
pub mod error;
pub mod matcher;
pub mod net;
pub mod report;
pub mod result;
pub mod tickers;

pub use corpus::Corpus;
pub use error::MentionError;
pub use matcher::{MentionCount, MentionMatcher, MentionTally, build_tally, count_mentions};
pub use report::{Report, build_report};
pub use result::Result;
pub use tickers::{TickerDictionary, TickerParser, TickerSymbol};
