//! Application constants for the GeoIP loader
//!
//! This module contains header signatures, default file names, numeric
//! limits, and the immutable reference tables (country-to-continent and
//! the NetAcuity continent index) shared by all provider instances.

// =============================================================================
// Header Signatures
// =============================================================================

/// Header signatures for format detection
///
/// Detection matches these as exact literal prefixes of the first
/// non-comment line of a file.
pub mod signatures {
    /// MaxMind GeoLite v1 locations file ("locId,country,region,...")
    pub const LEGACY_LOCATIONS: &str = "locId,";

    /// MaxMind GeoLite v1 blocks file ("startIpNum,endIpNum,locId")
    pub const LEGACY_BLOCKS: &str = "startIpNum,";

    /// MaxMind GeoLite2 v2 locations file ("geoname_id,locale_code,...")
    pub const LOCATIONS_V2: &str = "geoname_id,";

    /// MaxMind GeoLite2 v2 blocks file ("network,geoname_id,...")
    pub const BLOCKS_V2: &str = "network,";

    /// NetAcuity edge locations file ("id,country,region,...")
    pub const NETACUITY_LOCATIONS: &str = "id,country,";

    /// NetAcuity edge blocks file ("start_ip,end_ip,location_id")
    pub const NETACUITY_BLOCKS: &str = "start_ip,";
}

/// Prefixes of lines the format detector skips before the header
pub const COMMENT_LINE_PREFIXES: &[&str] = &["#", "Copyright"];

// =============================================================================
// Default File Names (directory mode)
// =============================================================================

/// MaxMind GeoLite v1 default file names
pub const LEGACY_LOCATIONS_FILENAME: &str = "GeoLiteCity-Location.csv";
pub const LEGACY_BLOCKS_FILENAME: &str = "GeoLiteCity-Blocks.csv";

/// MaxMind GeoLite2 v2 default file names
pub const V2_LOCATIONS_FILENAME: &str = "GeoLite2-City-Locations-en.csv";
pub const V2_BLOCKS_V4_FILENAME: &str = "GeoLite2-City-Blocks-IPv4.csv";
pub const V2_BLOCKS_V6_FILENAME: &str = "GeoLite2-City-Blocks-IPv6.csv";

/// NetAcuity edge default file names
pub const NETACUITY_LOCATIONS_FILENAME: &str = "netacuity-locations.csv";
pub const NETACUITY_BLOCKS_FILENAME: &str = "netacuity-blocks.csv";

// =============================================================================
// Validation Limits and Defaults
// =============================================================================

/// Record identifier reserved as "no record"
pub const RESERVED_RECORD_ID: u32 = 0;

/// Placeholder for an unknown two-letter code
pub const UNKNOWN_CODE: &str = "??";

/// Vendor token meaning "no code" in legacy country columns
pub const MISSING_CODE_TOKEN: &str = "--";

/// Maximum accepted accuracy radius in km (a quarter of Earth's circumference)
pub const MAX_ACCURACY_RADIUS_KM: u32 = 10_000;

/// Latitude domain in decimal degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Longitude domain in decimal degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Maximum number of blocks files per load (one per address family)
pub const MAX_BLOCK_FILES: usize = 2;

// =============================================================================
// Continent Reference Tables
// =============================================================================

/// NetAcuity continent codes indexed by the small-integer continent column
pub const NETACUITY_CONTINENTS: &[&str] = &["??", "AF", "AN", "AS", "EU", "NA", "OC", "SA"];

/// Look up the two-letter continent code for a NetAcuity continent index
///
/// Indexes outside 0..=7 map to the unknown code.
pub fn continent_for_index(index: u32) -> &'static str {
    NETACUITY_CONTINENTS
        .get(index as usize)
        .copied()
        .unwrap_or(UNKNOWN_CODE)
}

/// Country code to continent code mapping, sorted by country code
///
/// Includes the legacy vendor's special codes (A1 anonymous proxy,
/// A2 satellite provider, AP Asia/Pacific, EU Europe, O1 other).
pub const COUNTRY_CONTINENTS: &[(&str, &str)] = &[
    ("A1", "??"),
    ("A2", "??"),
    ("AD", "EU"),
    ("AE", "AS"),
    ("AF", "AS"),
    ("AG", "NA"),
    ("AI", "NA"),
    ("AL", "EU"),
    ("AM", "AS"),
    ("AO", "AF"),
    ("AP", "AS"),
    ("AQ", "AN"),
    ("AR", "SA"),
    ("AS", "OC"),
    ("AT", "EU"),
    ("AU", "OC"),
    ("AW", "NA"),
    ("AX", "EU"),
    ("AZ", "AS"),
    ("BA", "EU"),
    ("BB", "NA"),
    ("BD", "AS"),
    ("BE", "EU"),
    ("BF", "AF"),
    ("BG", "EU"),
    ("BH", "AS"),
    ("BI", "AF"),
    ("BJ", "AF"),
    ("BL", "NA"),
    ("BM", "NA"),
    ("BN", "AS"),
    ("BO", "SA"),
    ("BQ", "NA"),
    ("BR", "SA"),
    ("BS", "NA"),
    ("BT", "AS"),
    ("BV", "AN"),
    ("BW", "AF"),
    ("BY", "EU"),
    ("BZ", "NA"),
    ("CA", "NA"),
    ("CC", "AS"),
    ("CD", "AF"),
    ("CF", "AF"),
    ("CG", "AF"),
    ("CH", "EU"),
    ("CI", "AF"),
    ("CK", "OC"),
    ("CL", "SA"),
    ("CM", "AF"),
    ("CN", "AS"),
    ("CO", "SA"),
    ("CR", "NA"),
    ("CU", "NA"),
    ("CV", "AF"),
    ("CW", "NA"),
    ("CX", "AS"),
    ("CY", "AS"),
    ("CZ", "EU"),
    ("DE", "EU"),
    ("DJ", "AF"),
    ("DK", "EU"),
    ("DM", "NA"),
    ("DO", "NA"),
    ("DZ", "AF"),
    ("EC", "SA"),
    ("EE", "EU"),
    ("EG", "AF"),
    ("EH", "AF"),
    ("ER", "AF"),
    ("ES", "EU"),
    ("ET", "AF"),
    ("EU", "EU"),
    ("FI", "EU"),
    ("FJ", "OC"),
    ("FK", "SA"),
    ("FM", "OC"),
    ("FO", "EU"),
    ("FR", "EU"),
    ("GA", "AF"),
    ("GB", "EU"),
    ("GD", "NA"),
    ("GE", "AS"),
    ("GF", "SA"),
    ("GG", "EU"),
    ("GH", "AF"),
    ("GI", "EU"),
    ("GL", "NA"),
    ("GM", "AF"),
    ("GN", "AF"),
    ("GP", "NA"),
    ("GQ", "AF"),
    ("GR", "EU"),
    ("GS", "AN"),
    ("GT", "NA"),
    ("GU", "OC"),
    ("GW", "AF"),
    ("GY", "SA"),
    ("HK", "AS"),
    ("HM", "AN"),
    ("HN", "NA"),
    ("HR", "EU"),
    ("HT", "NA"),
    ("HU", "EU"),
    ("ID", "AS"),
    ("IE", "EU"),
    ("IL", "AS"),
    ("IM", "EU"),
    ("IN", "AS"),
    ("IO", "AS"),
    ("IQ", "AS"),
    ("IR", "AS"),
    ("IS", "EU"),
    ("IT", "EU"),
    ("JE", "EU"),
    ("JM", "NA"),
    ("JO", "AS"),
    ("JP", "AS"),
    ("KE", "AF"),
    ("KG", "AS"),
    ("KH", "AS"),
    ("KI", "OC"),
    ("KM", "AF"),
    ("KN", "NA"),
    ("KP", "AS"),
    ("KR", "AS"),
    ("KW", "AS"),
    ("KY", "NA"),
    ("KZ", "AS"),
    ("LA", "AS"),
    ("LB", "AS"),
    ("LC", "NA"),
    ("LI", "EU"),
    ("LK", "AS"),
    ("LR", "AF"),
    ("LS", "AF"),
    ("LT", "EU"),
    ("LU", "EU"),
    ("LV", "EU"),
    ("LY", "AF"),
    ("MA", "AF"),
    ("MC", "EU"),
    ("MD", "EU"),
    ("ME", "EU"),
    ("MF", "NA"),
    ("MG", "AF"),
    ("MH", "OC"),
    ("MK", "EU"),
    ("ML", "AF"),
    ("MM", "AS"),
    ("MN", "AS"),
    ("MO", "AS"),
    ("MP", "OC"),
    ("MQ", "NA"),
    ("MR", "AF"),
    ("MS", "NA"),
    ("MT", "EU"),
    ("MU", "AF"),
    ("MV", "AS"),
    ("MW", "AF"),
    ("MX", "NA"),
    ("MY", "AS"),
    ("MZ", "AF"),
    ("NA", "AF"),
    ("NC", "OC"),
    ("NE", "AF"),
    ("NF", "OC"),
    ("NG", "AF"),
    ("NI", "NA"),
    ("NL", "EU"),
    ("NO", "EU"),
    ("NP", "AS"),
    ("NR", "OC"),
    ("NU", "OC"),
    ("NZ", "OC"),
    ("O1", "??"),
    ("OM", "AS"),
    ("PA", "NA"),
    ("PE", "SA"),
    ("PF", "OC"),
    ("PG", "OC"),
    ("PH", "AS"),
    ("PK", "AS"),
    ("PL", "EU"),
    ("PM", "NA"),
    ("PN", "OC"),
    ("PR", "NA"),
    ("PS", "AS"),
    ("PT", "EU"),
    ("PW", "OC"),
    ("PY", "SA"),
    ("QA", "AS"),
    ("RE", "AF"),
    ("RO", "EU"),
    ("RS", "EU"),
    ("RU", "EU"),
    ("RW", "AF"),
    ("SA", "AS"),
    ("SB", "OC"),
    ("SC", "AF"),
    ("SD", "AF"),
    ("SE", "EU"),
    ("SG", "AS"),
    ("SH", "AF"),
    ("SI", "EU"),
    ("SJ", "EU"),
    ("SK", "EU"),
    ("SL", "AF"),
    ("SM", "EU"),
    ("SN", "AF"),
    ("SO", "AF"),
    ("SR", "SA"),
    ("SS", "AF"),
    ("ST", "AF"),
    ("SV", "NA"),
    ("SX", "NA"),
    ("SY", "AS"),
    ("SZ", "AF"),
    ("TC", "NA"),
    ("TD", "AF"),
    ("TF", "AN"),
    ("TG", "AF"),
    ("TH", "AS"),
    ("TJ", "AS"),
    ("TK", "OC"),
    ("TL", "AS"),
    ("TM", "AS"),
    ("TN", "AF"),
    ("TO", "OC"),
    ("TR", "AS"),
    ("TT", "NA"),
    ("TV", "OC"),
    ("TW", "AS"),
    ("TZ", "AF"),
    ("UA", "EU"),
    ("UG", "AF"),
    ("UM", "OC"),
    ("US", "NA"),
    ("UY", "SA"),
    ("UZ", "AS"),
    ("VA", "EU"),
    ("VC", "NA"),
    ("VE", "SA"),
    ("VG", "NA"),
    ("VI", "NA"),
    ("VN", "AS"),
    ("VU", "OC"),
    ("WF", "OC"),
    ("WS", "OC"),
    ("YE", "AS"),
    ("YT", "AF"),
    ("ZA", "AF"),
    ("ZM", "AF"),
    ("ZW", "AF"),
];

/// Look up the continent code for a two-letter country code
///
/// Unknown countries (including the "??" placeholder) map to the unknown
/// continent code.
pub fn continent_for_country(country_code: &str) -> &'static str {
    COUNTRY_CONTINENTS
        .binary_search_by_key(&country_code, |&(country, _)| country)
        .map(|idx| COUNTRY_CONTINENTS[idx].1)
        .unwrap_or(UNKNOWN_CODE)
}
