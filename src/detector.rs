use crate::linux_parser::LogEntry;

const SSH_PROCESS: &str = "sshd";
const FAILED_PASSWORD: &str = "Failed password";

// An entry is nefarious when sshd reports a failed password. Invalid user
// names are sorted out later, during extraction.
pub fn is_nefarious(entry: &LogEntry) -> bool {
    entry.process == SSH_PROCESS && entry.message.starts_with(FAILED_PASSWORD)
}

pub fn filter_nefarious(entries: Vec<LogEntry>) -> Vec<LogEntry> {
    entries.into_iter().filter(is_nefarious).collect()
}
