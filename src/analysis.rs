use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::counter::FrequencyCounter;
use crate::detector::filter_nefarious;
use crate::error::AnalyzerError;
use crate::extract::{Extractor, UserCounts};
use crate::geo::{resolve_countries, CountryLookup};
use crate::linux_parser::{parse_log, parse_timestamp, LogEntry};

/// Everything a single run learned from its input files.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Lines parsed into entries, across all files.
    pub processed: usize,
    pub malformed: usize,
    /// Entries that passed the nefarious filter.
    pub filtered: usize,
    pub addresses: FrequencyCounter<String>,
    pub users: UserCounts,
    pub countries: FrequencyCounter<String>,
    /// Addresses that contributed nothing to `countries`.
    pub unresolved: usize,
    pub first_seen: Option<NaiveDateTime>,
    pub last_seen: Option<NaiveDateTime>,
}

fn time_window(entries: &[LogEntry], year: i32) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let mut first: Option<NaiveDateTime> = None;
    let mut last: Option<NaiveDateTime> = None;

    for entry in entries {
        let Some(ts) = parse_timestamp(&entry.timestamp, year) else {
            debug!(timestamp = %entry.timestamp, "unparseable timestamp");
            continue;
        };
        first = Some(first.map_or(ts, |f| f.min(ts)));
        last = Some(last.map_or(ts, |l| l.max(ts)));
    }

    (first, last)
}

/// Runs parse, filter, extract and resolve over `paths`, in order.
/// Unreadable input is fatal; bad lines and unknown addresses are only counted.
pub fn analyze<L>(paths: &[PathBuf], lookup: &L, year: i32) -> Result<Analysis, AnalyzerError>
where
    L: CountryLookup + ?Sized,
{
    let mut entries = Vec::new();
    let mut analysis = Analysis::default();

    for path in paths {
        let parsed = parse_log(path)?;
        analysis.malformed += parsed.malformed;
        entries.extend(parsed.entries);
    }
    analysis.processed = entries.len();
    info!("Processed {} log entries", analysis.processed);

    let entries = filter_nefarious(entries);
    analysis.filtered = entries.len();
    info!("After filtering, {} log entries remain", analysis.filtered);

    let extractor = Extractor::new();
    analysis.addresses = extractor.count_addresses(&entries);
    analysis.users = extractor.count_usernames(&entries);

    let resolution = resolve_countries(&analysis.addresses, lookup);
    analysis.countries = resolution.countries;
    analysis.unresolved = resolution.unresolved;
    info!(
        countries = analysis.countries.len(),
        unresolved = analysis.unresolved,
        "resolved source addresses"
    );

    (analysis.first_seen, analysis.last_seen) = time_window(&entries, year);

    Ok(analysis)
}
