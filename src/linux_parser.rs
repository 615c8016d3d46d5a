use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{AnalyzerError, ParseError};

// Syslog layout handled here:
//  "Jan 07 11:48:14 host sshd[4242]: Failed password for root from 10.0.0.5 port 22 ssh2"
//   |--timestamp--| |hst| |process| |message ...........................................|
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub process: String,
    pub message: String,
}

/// Entries of one log file plus the number of lines that could not be parsed.
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub entries: Vec<LogEntry>,
    pub malformed: usize,
}

pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(ParseError::TooFewFields { found: fields.len() });
    }

    // fields[3] is the hostname, which nothing downstream needs.
    Ok(LogEntry {
        timestamp: fields[..3].join(" "),
        process: parse_process(fields[4]).to_string(),
        message: fields[5..].join(" "),
    })
}

// "sshd[4242]:" -> "sshd". Without a PID only the syslog colon goes.
fn parse_process(field: &str) -> &str {
    match field.find('[') {
        Some(idx) => &field[..idx],
        None => field.strip_suffix(':').unwrap_or(field),
    }
}

pub fn parse_log(path: &Path) -> Result<ParsedLog, AnalyzerError> {
    let io_err = |source: std::io::Error| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut parsed = ParsedLog::default();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.map_err(io_err)?;
        let line = String::from_utf8_lossy(&raw);
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(entry) => parsed.entries.push(entry),
            Err(e) => {
                debug!(path = %path.display(), line = idx + 1, "skipping line: {}", e);
                parsed.malformed += 1;
            }
        }
    }

    if parsed.malformed > 0 {
        warn!(
            path = %path.display(),
            malformed = parsed.malformed,
            "skipped malformed lines"
        );
    }
    info!(path = %path.display(), entries = parsed.entries.len(), "parsed log file");

    Ok(parsed)
}

// Syslog timestamps carry no year, so the caller injects one:
//  "Jan 07 11:48:14" -> "2026 Jan 07 11:48:14"
pub fn parse_timestamp(raw: &str, year: i32) -> Option<NaiveDateTime> {
    let full = format!("{} {}", year, raw);
    NaiveDateTime::parse_from_str(&full, "%Y %b %d %H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;

    const LINE: &str =
        "Dec 30 14:23:45 server sshd[1234]: Failed password for root from 192.168.1.100 port 22 ssh2";

    #[test]
    fn test_parse_line_fields() {
        let entry = parse_line(LINE).unwrap();
        assert_eq!(entry.timestamp, "Dec 30 14:23:45");
        assert_eq!(entry.process, "sshd");
        assert_eq!(
            entry.message,
            "Failed password for root from 192.168.1.100 port 22 ssh2"
        );
    }

    #[test]
    fn test_fields_reconstruct_line_without_host_and_pid() {
        let entry = parse_line(LINE).unwrap();
        let rebuilt = format!("{} {} {}", entry.timestamp, entry.process, entry.message);
        let expected: Vec<&str> = LINE
            .split_whitespace()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .map(|(i, f)| if i == 4 { "sshd" } else { f })
            .collect();
        assert_eq!(rebuilt, expected.join(" "));
    }

    #[test]
    fn test_padded_day() {
        let entry = parse_line("Jan  5 01:02:03 host sshd[9]: Failed password for x").unwrap();
        assert_eq!(entry.timestamp, "Jan 5 01:02:03");
        assert_eq!(entry.process, "sshd");
    }

    #[test]
    fn test_process_without_pid() {
        let entry = parse_line("Jan 5 01:02:03 host kernel: something happened").unwrap();
        assert_eq!(entry.process, "kernel");

        let entry = parse_line("Jan 5 01:02:03 host sshd message").unwrap();
        assert_eq!(entry.process, "sshd");
    }

    #[test]
    fn test_five_fields_gives_empty_message() {
        let entry = parse_line("Jan 5 01:02:03 host CRON[1]:").unwrap();
        assert_eq!(entry.process, "CRON");
        assert!(entry.message.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            parse_line("Jan 5 01:02:03 host"),
            Err(ParseError::TooFewFields { found: 4 })
        );
        assert_eq!(parse_line(""), Err(ParseError::TooFewFields { found: 0 }));
    }

    #[test]
    fn test_parse_log_counts_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", LINE).unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Dec 30 14:23:46 server CRON[77]: (root) CMD (true)").unwrap();

        let parsed = parse_log(file.path()).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.malformed, 1);
        assert_eq!(parsed.entries[1].process, "CRON");
    }

    #[test]
    fn test_parse_log_missing_file() {
        let err = parse_log(Path::new("/nonexistent/auth.log")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/auth.log"));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("Jan 7 11:48:14", 2026).unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.day(), 7);
        assert_eq!(ts.hour(), 11);

        assert!(parse_timestamp("not a time", 2026).is_none());
    }
}
