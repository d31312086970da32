//! Schema registry for vendor CSV layouts
//!
//! Column layouts are fixed per (vendor, file kind, format version); a
//! schema change upstream means a new table here, never runtime inference.
//! Each schema variant carries its own ordered field-kind table, so cell
//! dispatch routes on the variant plus a column index and cross-schema
//! column collisions cannot arise.

use crate::app::models::ProviderKind;
use crate::constants::signatures;
use std::fmt;

/// What a file contains: location rows or address-block rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Locations,
    Blocks,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Locations => write!(f, "locations"),
            FileKind::Blocks => write!(f, "blocks"),
        }
    }
}

/// Vendor format version; a locations/blocks pair must agree on this
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// MaxMind GeoLite v1 (numeric address ranges, shared-location join)
    LegacyV1,
    /// MaxMind GeoLite2 v2 (CIDR networks, per-block merge join)
    V2,
    /// NetAcuity edge (numeric address ranges, shared-location join)
    NetacuityEdge,
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::LegacyV1 => write!(f, "GeoLite v1"),
            FormatVersion::V2 => write!(f, "GeoLite2 v2"),
            FormatVersion::NetacuityEdge => write!(f, "NetAcuity edge"),
        }
    }
}

/// Validation contract for one column of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned record identifier starting a location row
    LocationId,
    /// Unsigned identifier referencing a location row
    ForeignKey,
    /// Fixed two-character country code
    CountryCode { fold_upper: bool },
    /// Fixed two-character continent code
    ContinentCode,
    /// NetAcuity small-integer continent index (0..=7)
    ContinentIndex,
    /// Free-text region / subdivision code
    Region,
    /// Free-text city name
    City,
    /// Free-text postal code
    PostalCode,
    /// Free-text timezone name
    Timezone,
    /// Free-text connection speed classification
    ConnectionSpeed,
    /// Bounded signed decimal, -90..=90, empty is a hard error
    Latitude,
    /// Bounded signed decimal, -180..=180, empty is a hard error
    Longitude,
    /// Non-negative integer, 0..=10000, empty defaults to 0
    AccuracyRadius,
    /// Non-negative integer, empty defaults to 0
    MetroCode,
    /// Non-negative integer, empty defaults to 0
    AreaCode,
    /// Absolute numeric IPv4 address, inclusive range lower bound
    RangeStart,
    /// Absolute numeric IPv4 address, inclusive range upper bound
    RangeEnd,
    /// Textual network, "address/prefixlen" or bare address
    Network,
    /// Known vendor column that consumes a slot but is never read
    Ignored,
}

/// One column of a schema: its vendor name and validation contract
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn col(name: &'static str, kind: FieldKind) -> Column {
    Column { name, kind }
}

/// MaxMind GeoLite v1 locations layout (9 columns)
const LEGACY_LOCATIONS: &[Column] = &[
    col("locId", FieldKind::LocationId),
    col("country", FieldKind::CountryCode { fold_upper: true }),
    col("region", FieldKind::Region),
    col("city", FieldKind::City),
    col("postalCode", FieldKind::PostalCode),
    col("latitude", FieldKind::Latitude),
    col("longitude", FieldKind::Longitude),
    col("metroCode", FieldKind::MetroCode),
    col("areaCode", FieldKind::AreaCode),
];

/// MaxMind GeoLite v1 blocks layout (3 columns)
const LEGACY_BLOCKS: &[Column] = &[
    col("startIpNum", FieldKind::RangeStart),
    col("endIpNum", FieldKind::RangeEnd),
    col("locId", FieldKind::ForeignKey),
];

/// MaxMind GeoLite2 v2 locations layout (14 columns)
const LOCATIONS_V2: &[Column] = &[
    col("geoname_id", FieldKind::LocationId),
    col("locale_code", FieldKind::Ignored),
    col("continent_code", FieldKind::ContinentCode),
    col("continent_name", FieldKind::Ignored),
    col("country_iso_code", FieldKind::CountryCode { fold_upper: false }),
    col("country_name", FieldKind::Ignored),
    col("subdivision_1_iso_code", FieldKind::Region),
    col("subdivision_1_name", FieldKind::Ignored),
    col("subdivision_2_iso_code", FieldKind::Ignored),
    col("subdivision_2_name", FieldKind::Ignored),
    col("city_name", FieldKind::City),
    col("metro_code", FieldKind::MetroCode),
    col("time_zone", FieldKind::Timezone),
    col("is_in_european_union", FieldKind::Ignored),
];

/// MaxMind GeoLite2 v2 blocks layout (10 columns)
const BLOCKS_V2: &[Column] = &[
    col("network", FieldKind::Network),
    col("geoname_id", FieldKind::ForeignKey),
    col("registered_country_geoname_id", FieldKind::Ignored),
    col("represented_country_geoname_id", FieldKind::Ignored),
    col("is_anonymous_proxy", FieldKind::Ignored),
    col("is_satellite_provider", FieldKind::Ignored),
    col("postal_code", FieldKind::PostalCode),
    col("latitude", FieldKind::Latitude),
    col("longitude", FieldKind::Longitude),
    col("accuracy_radius", FieldKind::AccuracyRadius),
];

/// NetAcuity edge locations layout (22 columns, trailing confidence and
/// offset columns consume slots but are never read)
const NETACUITY_LOCATIONS: &[Column] = &[
    col("id", FieldKind::LocationId),
    col("country", FieldKind::CountryCode { fold_upper: false }),
    col("region", FieldKind::Ignored),
    col("city", FieldKind::City),
    col("postal", FieldKind::PostalCode),
    col("latitude", FieldKind::Latitude),
    col("longitude", FieldKind::Longitude),
    col("metro_code", FieldKind::MetroCode),
    col("area_codes", FieldKind::Ignored),
    col("continent_code", FieldKind::ContinentIndex),
    col("connection_speed", FieldKind::ConnectionSpeed),
    col("country_conf", FieldKind::Ignored),
    col("region_conf", FieldKind::Ignored),
    col("city_conf", FieldKind::Ignored),
    col("postal_conf", FieldKind::Ignored),
    col("metro_conf", FieldKind::Ignored),
    col("area_conf", FieldKind::Ignored),
    col("continent_conf", FieldKind::Ignored),
    col("gmt_offset", FieldKind::Ignored),
    col("in_dst", FieldKind::Ignored),
    col("timezone_name", FieldKind::Ignored),
    col("conn_speed_conf", FieldKind::Ignored),
];

/// NetAcuity edge blocks layout (3 columns)
const NETACUITY_BLOCKS: &[Column] = &[
    col("start_ip", FieldKind::RangeStart),
    col("end_ip", FieldKind::RangeEnd),
    col("location_id", FieldKind::ForeignKey),
];

/// A detected (vendor, file kind, version) column layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    LegacyLocations,
    LegacyBlocks,
    LocationsV2,
    BlocksV2,
    NetacuityLocations,
    NetacuityBlocks,
}

impl Schema {
    /// All known schemas, in detection order
    pub const ALL: &'static [Schema] = &[
        Schema::LegacyLocations,
        Schema::LegacyBlocks,
        Schema::LocationsV2,
        Schema::BlocksV2,
        Schema::NetacuityLocations,
        Schema::NetacuityBlocks,
    ];

    /// Literal header prefix that identifies this schema
    pub fn signature(&self) -> &'static str {
        match self {
            Schema::LegacyLocations => signatures::LEGACY_LOCATIONS,
            Schema::LegacyBlocks => signatures::LEGACY_BLOCKS,
            Schema::LocationsV2 => signatures::LOCATIONS_V2,
            Schema::BlocksV2 => signatures::BLOCKS_V2,
            Schema::NetacuityLocations => signatures::NETACUITY_LOCATIONS,
            Schema::NetacuityBlocks => signatures::NETACUITY_BLOCKS,
        }
    }

    /// Ordered column table for this schema
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Schema::LegacyLocations => LEGACY_LOCATIONS,
            Schema::LegacyBlocks => LEGACY_BLOCKS,
            Schema::LocationsV2 => LOCATIONS_V2,
            Schema::BlocksV2 => BLOCKS_V2,
            Schema::NetacuityLocations => NETACUITY_LOCATIONS,
            Schema::NetacuityBlocks => NETACUITY_BLOCKS,
        }
    }

    /// Exact column count every row must match
    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Whether this schema describes location rows or block rows
    pub fn kind(&self) -> FileKind {
        match self {
            Schema::LegacyLocations | Schema::LocationsV2 | Schema::NetacuityLocations => {
                FileKind::Locations
            }
            Schema::LegacyBlocks | Schema::BlocksV2 | Schema::NetacuityBlocks => FileKind::Blocks,
        }
    }

    /// Vendor format version
    pub fn version(&self) -> FormatVersion {
        match self {
            Schema::LegacyLocations | Schema::LegacyBlocks => FormatVersion::LegacyV1,
            Schema::LocationsV2 | Schema::BlocksV2 => FormatVersion::V2,
            Schema::NetacuityLocations | Schema::NetacuityBlocks => FormatVersion::NetacuityEdge,
        }
    }

    /// Provider this schema belongs to
    pub fn provider(&self) -> ProviderKind {
        match self.version() {
            FormatVersion::LegacyV1 | FormatVersion::V2 => ProviderKind::Maxmind,
            FormatVersion::NetacuityEdge => ProviderKind::Netacuity,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.version(), self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(Schema::LegacyLocations.column_count(), 9);
        assert_eq!(Schema::LegacyBlocks.column_count(), 3);
        assert_eq!(Schema::LocationsV2.column_count(), 14);
        assert_eq!(Schema::BlocksV2.column_count(), 10);
        assert_eq!(Schema::NetacuityLocations.column_count(), 22);
        assert_eq!(Schema::NetacuityBlocks.column_count(), 3);
    }

    #[test]
    fn test_kinds_and_versions() {
        assert_eq!(Schema::LegacyLocations.kind(), FileKind::Locations);
        assert_eq!(Schema::LegacyBlocks.kind(), FileKind::Blocks);
        assert_eq!(Schema::LegacyBlocks.version(), FormatVersion::LegacyV1);
        assert_eq!(Schema::BlocksV2.version(), FormatVersion::V2);
        assert_eq!(
            Schema::NetacuityLocations.version(),
            FormatVersion::NetacuityEdge
        );
    }

    #[test]
    fn test_providers() {
        assert_eq!(Schema::LocationsV2.provider(), ProviderKind::Maxmind);
        assert_eq!(Schema::LegacyBlocks.provider(), ProviderKind::Maxmind);
        assert_eq!(Schema::NetacuityBlocks.provider(), ProviderKind::Netacuity);
    }

    #[test]
    fn test_signatures_are_distinct() {
        for (i, a) in Schema::ALL.iter().enumerate() {
            for b in &Schema::ALL[i + 1..] {
                assert!(
                    !a.signature().starts_with(b.signature())
                        && !b.signature().starts_with(a.signature()),
                    "ambiguous signatures: {} / {}",
                    a.signature(),
                    b.signature()
                );
            }
        }
    }

    #[test]
    fn test_schemas_start_with_an_identifying_column() {
        // Every locations schema opens with the record-starting id column
        assert_eq!(
            Schema::LegacyLocations.columns()[0].kind,
            FieldKind::LocationId
        );
        assert_eq!(Schema::LocationsV2.columns()[0].kind, FieldKind::LocationId);
        assert_eq!(
            Schema::NetacuityLocations.columns()[0].kind,
            FieldKind::LocationId
        );
    }
}
