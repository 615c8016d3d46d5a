use serde::Serialize;

use crate::error::LabelError;

/// One CSV row: country display name, ISO 3166-1 alpha-2 code, incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
    pub name: String,
    pub code: String,
    pub count: u64,
}

impl CountryRecord {
    pub fn from_label(label: &str, count: u64) -> Result<Self, LabelError> {
        let (name, code) = parse_label(label)?;
        Ok(Self {
            name: name.to_string(),
            code: code.to_string(),
            count,
        })
    }
}

pub fn is_alpha2(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

// Label layout is "<name> (<code>)", e.g. "Germany (DE)".
pub fn format_label(name: &str, code: &str) -> String {
    format!("{} ({})", name, code)
}

pub fn parse_label(label: &str) -> Result<(&str, &str), LabelError> {
    let malformed = || LabelError::Malformed(label.to_string());

    // Split on the last " (" so names carrying their own parentheses survive.
    let (name, rest) = label.rsplit_once(" (").ok_or_else(malformed)?;
    let code = rest.strip_suffix(')').ok_or_else(malformed)?;

    if name.is_empty() || !is_alpha2(code) {
        return Err(malformed());
    }

    Ok((name, code))
}
