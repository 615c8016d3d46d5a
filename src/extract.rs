//! Address and username extraction from failed password messages.
//!
//! Handles messages such as:
//!  "Failed password for root from 10.0.0.5 port 22 ssh2"
//!  "Failed password for invalid user admin from 1.2.3.4 port 22 ssh2"

use regex::Regex;
use tracing::debug;

use crate::counter::FrequencyCounter;
use crate::error::ExtractError;
use crate::linux_parser::LogEntry;

/// Login name taken from a failed password message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Username {
    /// The account exists on the host.
    Valid(String),
    /// sshd reported the account as unknown.
    Invalid(String),
}

/// Usernames split by whether sshd knew the account.
#[derive(Debug, Default)]
pub struct UserCounts {
    pub valid: FrequencyCounter<String>,
    pub invalid: FrequencyCounter<String>,
    /// Messages the username patterns did not match.
    pub unmatched: usize,
}

pub struct Extractor {
    address: Regex,
    valid_user: Regex,
    invalid_user: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            // Greedy lead-in: the last "from <addr>" in the message wins.
            address: Regex::new(r"^.*from\s+([0-9.]+)\s+").unwrap(),
            // Name sits between "for" and the "from <addr> port <n>" tail.
            valid_user: Regex::new(r"^Failed password for (\S+) from \S+ port \d+").unwrap(),
            invalid_user: Regex::new(r"^Failed password for invalid user (\S+) from \S+ port \d+")
                .unwrap(),
        }
    }

    pub fn extract_address<'a>(&self, message: &'a str) -> Option<&'a str> {
        self.address
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn extract_username(&self, message: &str) -> Result<Username, ExtractError> {
        let (regex, invalid) = if message.contains("invalid user") {
            (&self.invalid_user, true)
        } else {
            (&self.valid_user, false)
        };

        let name = regex
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ExtractError::UnexpectedMessage(message.to_string()))?;

        Ok(if invalid {
            Username::Invalid(name)
        } else {
            Username::Valid(name)
        })
    }

    pub fn count_addresses(&self, entries: &[LogEntry]) -> FrequencyCounter<String> {
        let mut addresses = FrequencyCounter::new();

        for entry in entries {
            match self.extract_address(&entry.message) {
                Some(address) => addresses.increment(address.to_string()),
                None => debug!(message = %entry.message, "no source address in message"),
            }
        }

        addresses
    }

    pub fn count_usernames(&self, entries: &[LogEntry]) -> UserCounts {
        let mut users = UserCounts::default();

        for entry in entries {
            match self.extract_username(&entry.message) {
                Ok(Username::Valid(name)) => users.valid.increment(name),
                Ok(Username::Invalid(name)) => users.invalid.increment(name),
                Err(e) => {
                    debug!("skipping username: {}", e);
                    users.unmatched += 1;
                }
            }
        }

        users
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
