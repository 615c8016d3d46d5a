use chrono::{Datelike, Utc};
use std::path::PathBuf;

pub const DEFAULT_DATABASE: &str = "/usr/share/GeoIP/GeoLite2-Country.mmdb";
pub const DEFAULT_OUTPUT: &str = "countries.csv";
pub const DEFAULT_TOP: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub database: PathBuf,
    pub output: PathBuf,
    pub top: usize,
    // syslog timestamps carry no year.
    pub year: i32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            top: DEFAULT_TOP,
            year: Utc::now().year(),
        }
    }
}
