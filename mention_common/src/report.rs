//! Ranked report published after each scan.
//!
//! The report is the only artifact a run leaves behind. Its JSON shape is consumed
//! by a frontend, so the field names and the `[symbol, count]` pair encoding are
//! fixed:
//!
//! ```json
//! {"posts": 412, "comments": 18211, "time": "04 March 09:15 PM", "data": [["GME", 311], ["AMC", 97]]}
//! ```
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;
use log::info;
use serde::{Deserialize, Serialize};

use crate::matcher::{MentionCount, MentionTally};
use crate::result::Result;
use crate::tickers::TickerSymbol;

/// Time zone the `time` field is rendered in.
pub const REPORT_TIME_ZONE: Tz = Eastern;

/// `strftime` pattern of the `time` field, e.g. `04 March 09:15 PM`.
pub const REPORT_TIME_FORMAT: &str = "%d %B %I:%M %p";

/// Result record of one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Posts created inside the lookback window.
    pub posts: usize,
    /// Non-empty comments collected under those posts.
    pub comments: usize,
    /// Generation time in US Eastern, see [`REPORT_TIME_FORMAT`].
    pub time: String,
    /// Mentioned symbols, most mentioned first.
    pub data: Vec<(TickerSymbol, MentionCount)>,
}

impl Report {
    /// Ranks `tally` and stamps the report with `now`.
    ///
    /// Ranking is a stable sort by count, descending: symbols with equal counts keep
    /// their dictionary order.
    pub fn build(
        post_count: usize,
        comment_count: usize,
        tally: MentionTally,
        now: DateTime<Utc>,
    ) -> Self {
        let mut data = tally.into_entries();
        data.sort_by(|a, b| b.1.cmp(&a.1));

        Report {
            posts: post_count,
            comments: comment_count,
            time: format_report_time(now),
            data,
        }
    }

    /// Encode the report to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }

    /// Writes the JSON encoding to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!(
            "Report with {} symbols written to {}",
            self.data.len(),
            path.display()
        );
        Ok(())
    }
}

/// Free-function form of [`Report::build`].
pub fn build_report(
    post_count: usize,
    comment_count: usize,
    tally: MentionTally,
    now: DateTime<Utc>,
) -> Report {
    Report::build(post_count, comment_count, tally, now)
}

/// Renders `now` in [`REPORT_TIME_ZONE`] using [`REPORT_TIME_FORMAT`].
pub fn format_report_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&REPORT_TIME_ZONE)
        .format(REPORT_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::build_tally;
    use crate::tickers::TickerDictionary;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn formats_time_in_eastern_standard_time() {
        assert_eq!(format_report_time(at(2024, 3, 5, 2, 15)), "04 March 09:15 PM");
    }

    #[test]
    fn formats_time_in_eastern_daylight_time() {
        assert_eq!(format_report_time(at(2024, 7, 4, 16, 30)), "04 July 12:30 PM");
    }

    #[test]
    fn ranks_by_count_and_keeps_dictionary_order_on_ties() {
        let dictionary = TickerDictionary::new(["AMC", "BB", "GME", "NOK"]);
        let tally = build_tally(&dictionary, "GME NOK GME BB AMC GME").unwrap();

        let report = Report::build(3, 10, tally, at(2024, 1, 1, 12, 0));

        assert_eq!(
            report.data,
            vec![
                ("GME".to_string(), 3),
                ("AMC".to_string(), 1),
                ("BB".to_string(), 1),
                ("NOK".to_string(), 1),
            ]
        );
        assert!(report.data.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    }

    #[test]
    fn serializes_pairs_as_arrays() {
        let dictionary = TickerDictionary::new(["TSLA"]);
        let tally = build_tally(&dictionary, "TSLA").unwrap();
        let report = Report::build(1, 2, tally, at(2024, 3, 5, 2, 15));

        let json: serde_json::Value = serde_json::from_slice(&report.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "posts": 1,
                "comments": 2,
                "time": "04 March 09:15 PM",
                "data": [["TSLA", 1]]
            })
        );
    }

    #[test]
    fn write_to_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reddit_most_mentioned_stocks.json");
        std::fs::write(&path, "stale content that is longer than the report").unwrap();

        let report = Report::build(0, 0, MentionTally::default(), at(2024, 3, 5, 2, 15));
        report.write_to(&path).unwrap();

        let written: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, report);
    }
}
