//! Boundary-aware ticker matching and tally building.
//!
//! A mention is a case-insensitive, word-boundary-delimited occurrence of the bare
//! symbol, plus every occurrence of the `$`-prefixed form under the same rules.
//! Word boundaries follow the `regex` crate's Unicode `\b`. Because `$` is not a
//! word character, `\b\$SYM` only fires when a word character sits right before the
//! sigil; a `$SYM` after whitespace is already counted once through the bare form.
use std::collections::HashSet;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::result::Result;
use crate::tickers::{TickerDictionary, TickerSymbol};

/// Number of occurrences of one symbol in a corpus.
pub type MentionCount = usize;

/// Prefix used on the forum to flag a ticker explicitly.
pub const SIGIL: char = '$';

/// Compiled patterns for a single ticker symbol.
#[derive(Debug, Clone)]
pub struct MentionMatcher {
    bare: Regex,
    prefixed: Regex,
}

impl MentionMatcher {
    /// Compiles the bare and `$`-prefixed patterns for `symbol`.
    pub fn new(symbol: &str) -> Result<Self> {
        let escaped = regex::escape(symbol);
        let bare = RegexBuilder::new(&format!(r"\b{}\b", escaped))
            .case_insensitive(true)
            .build()?;
        let prefixed = RegexBuilder::new(&format!(r"\b\{}{}\b", SIGIL, escaped))
            .case_insensitive(true)
            .build()?;

        Ok(Self { bare, prefixed })
    }

    /// Sum of non-overlapping bare and prefixed matches in `text`.
    pub fn count(&self, text: &str) -> MentionCount {
        self.bare.find_iter(text).count() + self.prefixed.find_iter(text).count()
    }
}

/// Counts mentions of `symbol` in `corpus`.
pub fn count_mentions(symbol: &str, corpus: &str) -> Result<MentionCount> {
    Ok(MentionMatcher::new(symbol)?.count(corpus))
}

/// Ordered symbol counts for one run.
///
/// Entries follow dictionary order, every symbol appears at most once and no
/// entry has a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionTally {
    entries: Vec<(TickerSymbol, MentionCount)>,
}

impl MentionTally {
    /// Count recorded for `symbol`, if it was mentioned at all.
    pub fn get(&self, symbol: &str) -> Option<MentionCount> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == symbol)
            .map(|(_, count)| *count)
    }

    /// Entries in dictionary order.
    pub fn entries(&self) -> &[(TickerSymbol, MentionCount)] {
        &self.entries
    }

    /// Number of mentioned symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no symbol was mentioned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the tally, yielding its entries.
    pub fn into_entries(self) -> Vec<(TickerSymbol, MentionCount)> {
        self.entries
    }
}

/// Counts every dictionary symbol in `corpus`, keeping only positive counts.
///
/// A symbol listed more than once is counted at its first position only.
pub fn build_tally(dictionary: &TickerDictionary, corpus: &str) -> Result<MentionTally> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for symbol in dictionary.symbols() {
        if !seen.insert(symbol.as_str()) {
            debug!("Skipping duplicate symbol: {}", symbol);
            continue;
        }

        debug!("Currently counting: {}", symbol);
        let occurrences = count_mentions(symbol, corpus)?;
        if occurrences > 0 {
            entries.push((symbol.clone(), occurrences));
        }
    }

    Ok(MentionTally { entries })
}
