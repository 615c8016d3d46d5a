//! Failed SSH password attempts from auth logs, tallied by source address,
//! username and country.
//!
//! The pipeline runs left to right: [`linux_parser`] splits lines into
//! entries, [`detector`] keeps the failed password attempts, [`extract`]
//! pulls out addresses and usernames, [`geo`] places addresses in
//! countries, and [`report`] prints rankings and writes the country CSV
//! consumed by the map renderer.

pub mod analysis;
pub mod config;
pub mod counter;
pub mod country;
pub mod detector;
pub mod error;
pub mod extract;
pub mod geo;
pub mod linux_parser;
pub mod report;

pub use analysis::{analyze, Analysis};
pub use config::AnalyzerConfig;
pub use counter::{FrequencyCounter, RankedEntry};
pub use country::CountryRecord;
pub use geo::{CountryLookup, MaxMindLookup};
pub use linux_parser::LogEntry;
