//! Curated ticker dictionary and the helpers that load it.
//!
//! The dictionary is the universe of symbols a scan considers: nothing is ever
//! discovered from the corpus itself. Its order is the order in which symbols are
//! counted, and therefore the tie-break order of the final report.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::error::MentionError;
use crate::result::Result;

/// Ticker symbol as it appears in the curated list (e.g. `AAPL`).
pub type TickerSymbol = String;

/// Trait providing line-oriented parsing for ticker lists.
pub trait TickerParser: Sized {
    /// Parses a ticker list from a buffered reader.
    ///
    /// Each line holds a single symbol. Surrounding whitespace (including a `\r`
    /// left by CRLF files) is trimmed and blank lines are skipped. A line with
    /// whitespace inside the symbol is skipped with a warning.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Self, MentionError>;
}

/// Ordered, immutable list of ticker symbols loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerDictionary {
    symbols: Vec<TickerSymbol>,
}

impl TickerDictionary {
    /// Builds a dictionary from already-known symbols, keeping their order.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TickerSymbol>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Opens `path` and parses it with [`TickerParser::parse_from_file`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            MentionError::ParseTickersFile(format!("cannot open {}: {}", path.display(), e))
        })?;
        let dictionary = Self::parse_from_file(BufReader::new(file))?;
        debug!(
            "Loaded {} ticker symbols from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Symbols in list order.
    pub fn symbols(&self) -> &[TickerSymbol] {
        &self.symbols
    }

    /// Number of symbols, duplicates included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when the list holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl TickerParser for TickerDictionary {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Self, MentionError> {
        let mut symbols = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(MentionError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() {
                continue;
            }

            if trimmed_line.contains(char::is_whitespace) {
                warn!(
                    "Ticker list line {}: expected a single symbol, skipping {:?}",
                    index + 1,
                    trimmed_line
                );
                continue;
            }
            symbols.push(trimmed_line.to_string());
        }
        Ok(Self { symbols })
    }
}
