//! Country resolution for source addresses.
//!
//! Lookups go through [`CountryLookup`] so the aggregation logic can run
//! against an in-memory table in tests; [`MaxMindLookup`] is the offline
//! GeoLite2/GeoIP2 implementation used by the binary.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use maxminddb::{geoip2, MaxMindDBError, Reader};
use tracing::{debug, info, warn};

use crate::counter::FrequencyCounter;
use crate::country::{format_label, is_alpha2};
use crate::error::GeoError;

/// Country block of a database record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryInfo {
    /// Localized names keyed by language code ("en", "de", ...).
    pub names: BTreeMap<String, String>,
    pub iso_code: Option<String>,
}

impl CountryInfo {
    pub fn new(name_en: &str, iso_code: &str) -> Self {
        let mut names = BTreeMap::new();
        names.insert("en".to_string(), name_en.to_string());
        Self {
            names,
            iso_code: Some(iso_code.to_string()),
        }
    }

    fn from_maxmind(country: geoip2::country::Country<'_>) -> Self {
        Self {
            names: country
                .names
                .map(|n| {
                    n.into_iter()
                        .map(|(lang, name)| (lang.to_string(), name.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            iso_code: country.iso_code.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoRecord {
    pub registered_country: Option<CountryInfo>,
    pub country: Option<CountryInfo>,
}

pub trait CountryLookup {
    /// `Ok(None)` when the database has no record for the address.
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoError>;
}

/// Read-only MaxMind database handle, opened once per run.
pub struct MaxMindLookup {
    reader: Reader<Vec<u8>>,
}

impl MaxMindLookup {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeoError::NotFound(path.display().to_string()));
        }

        let reader = Reader::open_readfile(path).map_err(GeoError::Open)?;
        info!(
            path = %path.display(),
            database = %reader.metadata.database_type,
            "opened GeoIP database"
        );
        Ok(Self { reader })
    }
}

impl CountryLookup for MaxMindLookup {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, GeoError> {
        match self.reader.lookup::<geoip2::Country>(ip) {
            Ok(record) => Ok(Some(GeoRecord {
                registered_country: record.registered_country.map(CountryInfo::from_maxmind),
                country: record.country.map(CountryInfo::from_maxmind),
            })),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(source) => Err(GeoError::Lookup {
                address: ip.to_string(),
                source,
            }),
        }
    }
}

/// Country counts plus the number of addresses that could not be placed.
#[derive(Debug, Default)]
pub struct Resolution {
    pub countries: FrequencyCounter<String>,
    pub unresolved: usize,
}

fn info_label(country: &CountryInfo) -> Option<String> {
    let name = country.names.get("en")?;
    let code = country.iso_code.as_deref().filter(|c| is_alpha2(c))?;
    Some(format_label(name, code))
}

/// Label for a record: registered country first, then country. A block
/// without an English name or alpha-2 code is passed over.
pub fn country_label(record: &GeoRecord) -> Option<String> {
    [&record.registered_country, &record.country]
        .into_iter()
        .flatten()
        .find_map(info_label)
}

/// Sums each address's occurrence count into its country.
pub fn resolve_countries<L>(addresses: &FrequencyCounter<String>, lookup: &L) -> Resolution
where
    L: CountryLookup + ?Sized,
{
    let mut resolution = Resolution::default();

    for (address, count) in addresses.iter() {
        let ip: IpAddr = match address.parse() {
            Ok(ip) => ip,
            Err(_) => {
                warn!(%address, "not a valid IP address");
                resolution.unresolved += 1;
                continue;
            }
        };

        let record = match lookup.lookup(ip) {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(%address, "no GeoIP record for address");
                resolution.unresolved += 1;
                continue;
            }
            Err(e) => {
                warn!(%address, "unable to query address: {}", e);
                resolution.unresolved += 1;
                continue;
            }
        };

        match country_label(&record) {
            Some(label) => {
                debug!(%address, %label, count, "resolved address");
                resolution.countries.add(label, count);
            }
            None => {
                warn!(%address, "record has no usable country");
                resolution.unresolved += 1;
            }
        }
    }

    resolution
}
