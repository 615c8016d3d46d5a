use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

use crate::analysis::Analysis;
use crate::counter::{FrequencyCounter, RankedEntry};
use crate::country::CountryRecord;
use crate::error::ReportError;

fn write_ranking<W: Write>(
    out: &mut W,
    title: &str,
    counter: &FrequencyCounter<String>,
    top: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}:", title)?;

    let ranked = counter.top_n(top);
    if ranked.is_empty() {
        writeln!(out, "  <none>")?;
    }
    for entry in ranked {
        writeln!(out, "- {} ({:.2}%)", entry.key, entry.percentage)?;
    }

    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, analysis: &Analysis, top: usize) -> io::Result<()> {
    writeln!(out, "Processed {} log entries", analysis.processed)?;
    if analysis.malformed > 0 {
        writeln!(out, "Skipped {} malformed lines", analysis.malformed)?;
    }
    writeln!(out, "After filtering, {} log entries remain", analysis.filtered)?;

    if let (Some(first), Some(last)) = (analysis.first_seen, analysis.last_seen) {
        writeln!(out, "First attempt: {}", first)?;
        writeln!(out, "Last attempt:  {}", last)?;
    }

    write_ranking(out, "Top IP addresses", &analysis.addresses, top)?;
    write_ranking(out, "Top valid users", &analysis.users.valid, top)?;
    write_ranking(out, "Top invalid users", &analysis.users.invalid, top)?;
    write_ranking(out, "Top countries", &analysis.countries, top)?;

    if analysis.unresolved > 0 {
        writeln!(out)?;
        writeln!(out, "{} addresses could not be placed in a country", analysis.unresolved)?;
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonSummary {
    processed: usize,
    malformed: usize,
    filtered: usize,
    unmatched_users: usize,
    unresolved_addresses: usize,
    first_seen: Option<NaiveDateTime>,
    last_seen: Option<NaiveDateTime>,
    addresses: Vec<RankedEntry<String>>,
    valid_users: Vec<RankedEntry<String>>,
    invalid_users: Vec<RankedEntry<String>>,
    countries: Vec<RankedEntry<String>>,
}

pub fn write_json<W: Write>(out: &mut W, analysis: &Analysis, top: usize) -> Result<(), ReportError> {
    let summary = JsonSummary {
        processed: analysis.processed,
        malformed: analysis.malformed,
        filtered: analysis.filtered,
        unmatched_users: analysis.users.unmatched,
        unresolved_addresses: analysis.unresolved,
        first_seen: analysis.first_seen,
        last_seen: analysis.last_seen,
        addresses: analysis.addresses.top_n(top),
        valid_users: analysis.users.valid.top_n(top),
        invalid_users: analysis.users.invalid.top_n(top),
        countries: analysis.countries.top_n(top),
    };

    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out).map_err(ReportError::Output)?;
    Ok(())
}

/// Converts every label before touching the file, so a bad label leaves no
/// partial CSV behind.
pub fn country_records(countries: &FrequencyCounter<String>) -> Result<Vec<CountryRecord>, ReportError> {
    let records = countries
        .ranked()
        .into_iter()
        .map(|(label, count)| CountryRecord::from_label(label, count))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

// Header is name,code,count.
pub fn write_country_csv(path: &Path, countries: &FrequencyCounter<String>) -> Result<usize, ReportError> {
    let records = country_records(countries)?;

    let csv_err = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in &records {
        writer.serialize(record).map_err(csv_err)?;
    }
    // serialize() only emits the header alongside the first row.
    if records.is_empty() {
        writer
            .write_record(["name", "code", "count"])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rows = records.len(), "wrote country CSV");
    Ok(records.len())
}
