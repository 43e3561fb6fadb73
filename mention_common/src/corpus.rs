//! Text gathered from one collection run.

/// Separator placed between two appended texts.
const SEGMENT_SEPARATOR: char = '\n';

/// Concatenated post titles and comment bodies, in fetch order.
///
/// Segments are joined with a newline so the last word of one text never fuses
/// with the first word of the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    text: String,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one text. Empty texts are ignored.
    pub fn push_segment(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(SEGMENT_SEPARATOR);
        }
        self.text.push_str(segment);
    }

    /// Full text of the corpus.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Size of the corpus in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
