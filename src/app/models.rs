//! Data models for GeoIP loading
//!
//! This module contains the core data structures produced by ingestion: the
//! canonical geolocation record, address prefixes and ranges, and the
//! provider provenance tag.

use crate::constants::{LATITUDE_RANGE, LONGITUDE_RANGE, MAX_ACCURACY_RADIUS_KM, UNKNOWN_CODE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

// =============================================================================
// Provider Provenance
// =============================================================================

/// Source provider for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// MaxMind GeoLite (legacy v1 or GeoLite2 v2 exports)
    Maxmind,
    /// NetAcuity edge exports
    Netacuity,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Maxmind => write!(f, "maxmind"),
            ProviderKind::Netacuity => write!(f, "netacuity"),
        }
    }
}

// =============================================================================
// Geolocation Record
// =============================================================================

/// Canonical geolocation record produced by ingestion
///
/// One record exists per vendor location (legacy v1, NetAcuity) or per
/// address block (GeoLite2 v2, with a synthetic sequence identifier). All
/// text fields are owned; cloning a record duplicates them, which is what
/// the per-block merge join relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Record identifier, unique within one provider instance (never 0)
    pub id: u32,

    /// Two-letter country code, "??" when unknown
    pub country_code: String,

    /// Two-letter continent code, "??" when unknown
    pub continent_code: String,

    /// Free-text region or subdivision code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Free-text city name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Free-text postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// IANA timezone name (GeoLite2 v2 only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Latitude in decimal degrees, -90..=90
    pub latitude: f64,

    /// Longitude in decimal degrees, -180..=180
    pub longitude: f64,

    /// Accuracy radius in km, 0..=10000 (0 = unspecified)
    pub accuracy_radius: u32,

    /// Metro code (0 = unspecified)
    pub metro_code: u32,

    /// Area code (legacy v1 only, 0 = unspecified)
    pub area_code: u32,

    /// European Union membership flag (carried for the v2 record surface)
    pub in_european_union: bool,

    /// Connection speed classification (NetAcuity only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_speed: Option<String>,

    /// Anonymous proxy flag (legacy-era)
    pub anonymous_proxy: bool,

    /// Satellite provider flag (legacy-era)
    pub satellite_provider: bool,

    /// Source provider
    pub source: ProviderKind,
}

impl GeoRecord {
    /// Create an empty record with its identifier assigned
    ///
    /// The identifier is fixed before any other field is populated;
    /// identifier 0 is reserved as "no record" and rejected here.
    pub fn new(id: u32, source: ProviderKind) -> Result<Self> {
        if id == crate::constants::RESERVED_RECORD_ID {
            return Err(Error::ReservedRecordId);
        }

        Ok(Self {
            id,
            country_code: UNKNOWN_CODE.to_string(),
            continent_code: UNKNOWN_CODE.to_string(),
            region: None,
            city: None,
            postal_code: None,
            timezone: None,
            latitude: 0.0,
            longitude: 0.0,
            accuracy_radius: 0,
            metro_code: 0,
            area_code: 0,
            in_european_union: false,
            connection_speed: None,
            anonymous_proxy: false,
            satellite_provider: false,
            source,
        })
    }

    /// Validate record data for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if self.id == crate::constants::RESERVED_RECORD_ID {
            return Err(Error::ReservedRecordId);
        }

        if !(LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&self.latitude) {
            return Err(Error::configuration(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                self.latitude
            )));
        }

        if !(LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&self.longitude) {
            return Err(Error::configuration(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                self.longitude
            )));
        }

        if self.accuracy_radius > MAX_ACCURACY_RADIUS_KM {
            return Err(Error::configuration(format!(
                "Invalid accuracy radius {}: must not exceed {} km",
                self.accuracy_radius, MAX_ACCURACY_RADIUS_KM
            )));
        }

        if self.country_code.len() != 2 {
            return Err(Error::configuration(format!(
                "Invalid country code '{}': must be two characters",
                self.country_code
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Address Prefixes and Ranges
// =============================================================================

/// A CIDR-style address prefix: an address plus a prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prefix {
    /// Base address of the prefix
    pub address: IpAddr,

    /// Number of leading network bits
    pub length: u8,
}

impl Prefix {
    /// Create a prefix, validating the length against the address family
    pub fn new(address: IpAddr, length: u8) -> Result<Self> {
        let width = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };

        if length > width {
            return Err(Error::configuration(format!(
                "Invalid prefix length /{} for address {}",
                length, address
            )));
        }

        Ok(Self { address, length })
    }

    /// Address bit width for this prefix's family
    pub fn family_width(&self) -> u8 {
        match self.address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}

/// An inclusive address range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpRange {
    /// Inclusive IPv4 range
    V4 { lower: Ipv4Addr, upper: Ipv4Addr },
    /// Inclusive IPv6 range
    V6 { lower: Ipv6Addr, upper: Ipv6Addr },
}

impl IpRange {
    /// Create an IPv4 range, rejecting inverted bounds
    pub fn v4(lower: Ipv4Addr, upper: Ipv4Addr) -> Result<Self> {
        if lower > upper {
            return Err(Error::configuration(format!(
                "Inverted address range: {} > {}",
                lower, upper
            )));
        }
        Ok(Self::V4 { lower, upper })
    }

    /// Create an IPv6 range, rejecting inverted bounds
    pub fn v6(lower: Ipv6Addr, upper: Ipv6Addr) -> Result<Self> {
        if lower > upper {
            return Err(Error::configuration(format!(
                "Inverted address range: {} > {}",
                lower, upper
            )));
        }
        Ok(Self::V6 { lower, upper })
    }
}

/// Address coverage of one blocks-file row
///
/// Legacy and NetAcuity rows carry an explicit inclusive range; GeoLite2 v2
/// rows carry an already-aligned network that passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coverage {
    /// Explicit inclusive [lower, upper] range to decompose
    Range(IpRange),
    /// Single network prefix, used as-is
    Network(Prefix),
}
