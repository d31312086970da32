//! Field validators for vendor CSV cells
//!
//! Pure token-to-value conversions, one per field kind. Failures carry only
//! a reason string; the streaming parser attaches file, line, and column
//! context when it raises the cell error.

use crate::app::models::Prefix;
use crate::constants::{
    LATITUDE_RANGE, LONGITUDE_RANGE, MAX_ACCURACY_RADIUS_KM, MISSING_CODE_TOKEN, UNKNOWN_CODE,
};
use std::net::{IpAddr, Ipv4Addr};

/// Conversion result for one cell; the reason becomes the cell diagnostic
pub type FieldResult<T> = std::result::Result<T, String>;

/// Parse a fixed two-character code
///
/// Empty tokens and the vendor's "--" placeholder normalize to "??"; any
/// other token must be exactly two characters. Case folding to uppercase
/// is applied only for the legacy vendor's country column.
pub fn parse_code2(token: &str, fold_upper: bool) -> FieldResult<String> {
    if token.is_empty() || token == MISSING_CODE_TOKEN {
        return Ok(UNKNOWN_CODE.to_string());
    }

    if token.chars().count() != 2 {
        return Err(format!(
            "expected a two-character code, found '{}'",
            token
        ));
    }

    if fold_upper {
        Ok(token.to_ascii_uppercase())
    } else {
        Ok(token.to_string())
    }
}

/// Parse a latitude in decimal degrees; an empty token is a hard error
pub fn parse_latitude(token: &str) -> FieldResult<f64> {
    parse_bounded_decimal(token, "latitude", LATITUDE_RANGE.0, LATITUDE_RANGE.1)
}

/// Parse a longitude in decimal degrees; an empty token is a hard error
pub fn parse_longitude(token: &str) -> FieldResult<f64> {
    parse_bounded_decimal(token, "longitude", LONGITUDE_RANGE.0, LONGITUDE_RANGE.1)
}

fn parse_bounded_decimal(token: &str, field: &str, min: f64, max: f64) -> FieldResult<f64> {
    if token.is_empty() {
        return Err(format!("empty value for required {} field", field));
    }

    let value: f64 = token
        .parse()
        .map_err(|_| format!("invalid {} '{}'", field, token))?;

    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(format!(
            "{} {} out of range [{}, {}]",
            field, token, min, max
        ));
    }

    Ok(value)
}

/// Parse an accuracy radius in km; an empty token defaults to 0
pub fn parse_accuracy_radius(token: &str) -> FieldResult<u32> {
    let value = parse_defaultable_u32(token, "accuracy radius")?;
    if value > MAX_ACCURACY_RADIUS_KM {
        return Err(format!(
            "accuracy radius {} exceeds maximum {}",
            value, MAX_ACCURACY_RADIUS_KM
        ));
    }
    Ok(value)
}

/// Parse a non-negative integer where an empty token defaults to 0
/// (metro code, area code, accuracy radius)
pub fn parse_defaultable_u32(token: &str, field: &str) -> FieldResult<u32> {
    if token.is_empty() {
        return Ok(0);
    }

    token
        .parse()
        .map_err(|_| format!("invalid {} '{}'", field, token))
}

/// Parse an unsigned record identifier; empty, non-numeric, and the
/// reserved value 0 are hard errors
pub fn parse_record_id(token: &str) -> FieldResult<u32> {
    if token.is_empty() {
        return Err("empty record identifier".to_string());
    }

    let id: u32 = token
        .parse()
        .map_err(|_| format!("invalid record identifier '{}'", token))?;

    if id == crate::constants::RESERVED_RECORD_ID {
        return Err("record identifier 0 is reserved".to_string());
    }

    Ok(id)
}

/// Parse an optional free-text field; empty tokens leave the field unset
pub fn parse_optional_text(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parse a NetAcuity continent index (0..=7) into a continent code
pub fn parse_continent_index(token: &str) -> FieldResult<String> {
    if token.is_empty() {
        return Err("empty continent index".to_string());
    }

    let index: u32 = token
        .parse()
        .map_err(|_| format!("invalid continent index '{}'", token))?;

    if index > 7 {
        return Err(format!("continent index {} out of range 0..=7", index));
    }

    Ok(crate::constants::continent_for_index(index).to_string())
}

/// Parse an absolute numeric IPv4 address (legacy vendor encoding)
pub fn parse_numeric_v4(token: &str) -> FieldResult<Ipv4Addr> {
    if token.is_empty() {
        return Err("empty address value".to_string());
    }

    let value: u32 = token
        .parse()
        .map_err(|_| format!("invalid numeric address '{}'", token))?;

    Ok(Ipv4Addr::from(value))
}

/// Parse a textual network: "address/prefixlen" or a bare address
///
/// A missing prefix length defaults to the full width of the address
/// family (a single-address network).
pub fn parse_network(token: &str) -> FieldResult<Prefix> {
    if token.is_empty() {
        return Err("empty network value".to_string());
    }

    let (addr_part, len_part) = match token.split_once('/') {
        Some((addr, len)) => (addr, Some(len)),
        None => (token, None),
    };

    let address: IpAddr = addr_part
        .parse()
        .map_err(|_| format!("invalid network address '{}'", token))?;

    let width = match address {
        IpAddr::V4(_) => 32u8,
        IpAddr::V6(_) => 128u8,
    };

    let length = match len_part {
        Some(len) => len
            .parse::<u8>()
            .ok()
            .filter(|&l| l <= width)
            .ok_or_else(|| format!("invalid prefix length in '{}'", token))?,
        None => width,
    };

    // Constructor cannot fail after the width check above
    Prefix::new(address, length).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalization() {
        assert_eq!(parse_code2("", false).unwrap(), "??");
        assert_eq!(parse_code2("--", false).unwrap(), "??");
        assert_eq!(parse_code2("US", false).unwrap(), "US");
    }

    #[test]
    fn test_code_case_folding_is_legacy_only() {
        assert_eq!(parse_code2("us", true).unwrap(), "US");
        assert_eq!(parse_code2("us", false).unwrap(), "us");
    }

    #[test]
    fn test_code_wrong_length_is_an_error() {
        assert!(parse_code2("USA", false).is_err());
        assert!(parse_code2("U", true).is_err());
    }

    #[test]
    fn test_latitude_bounds() {
        assert_eq!(parse_latitude("37.751").unwrap(), 37.751);
        assert_eq!(parse_latitude("-90").unwrap(), -90.0);
        assert!(parse_latitude("90.001").is_err());
        assert!(parse_latitude("-90.001").is_err());
        assert!(parse_latitude("nan").is_err());
        assert!(parse_latitude("inf").is_err());
    }

    #[test]
    fn test_latitude_empty_is_an_error() {
        assert!(parse_latitude("").is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert_eq!(parse_longitude("-97.822").unwrap(), -97.822);
        assert!(parse_longitude("180.5").is_err());
        assert!(parse_longitude("12.3abc").is_err());
    }

    #[test]
    fn test_accuracy_radius() {
        assert_eq!(parse_accuracy_radius("").unwrap(), 0);
        assert_eq!(parse_accuracy_radius("500").unwrap(), 500);
        assert_eq!(parse_accuracy_radius("10000").unwrap(), 10_000);
        assert!(parse_accuracy_radius("10001").is_err());
        assert!(parse_accuracy_radius("-5").is_err());
    }

    #[test]
    fn test_defaultable_integers() {
        assert_eq!(parse_defaultable_u32("", "metro code").unwrap(), 0);
        assert_eq!(parse_defaultable_u32("678", "metro code").unwrap(), 678);
        assert!(parse_defaultable_u32("67x", "metro code").is_err());
    }

    #[test]
    fn test_record_id() {
        assert_eq!(parse_record_id("12345").unwrap(), 12345);
        assert!(parse_record_id("").is_err());
        assert!(parse_record_id("abc").is_err());
        assert!(parse_record_id("12.5").is_err());
        assert!(parse_record_id("0").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(parse_optional_text(""), None);
        assert_eq!(parse_optional_text("Wichita"), Some("Wichita".to_string()));
    }

    #[test]
    fn test_continent_index() {
        assert_eq!(parse_continent_index("0").unwrap(), "??");
        assert_eq!(parse_continent_index("4").unwrap(), "EU");
        assert_eq!(parse_continent_index("7").unwrap(), "SA");
        assert!(parse_continent_index("8").is_err());
        assert!(parse_continent_index("").is_err());
        assert!(parse_continent_index("x").is_err());
    }

    #[test]
    fn test_numeric_v4() {
        assert_eq!(
            parse_numeric_v4("167772160").unwrap(),
            "10.0.0.0".parse::<Ipv4Addr>().unwrap()
        );
        assert_eq!(
            parse_numeric_v4("4294967295").unwrap(),
            Ipv4Addr::new(255, 255, 255, 255)
        );
        assert!(parse_numeric_v4("4294967296").is_err());
        assert!(parse_numeric_v4("").is_err());
        assert!(parse_numeric_v4("10.0.0.0").is_err());
    }

    #[test]
    fn test_network() {
        let prefix = parse_network("1.0.0.0/24").unwrap();
        assert_eq!(prefix.to_string(), "1.0.0.0/24");

        let bare = parse_network("192.0.2.1").unwrap();
        assert_eq!(bare.length, 32);

        let v6 = parse_network("2001:db8::/32").unwrap();
        assert_eq!(v6.length, 32);
        assert_eq!(parse_network("2001:db8::1").unwrap().length, 128);

        assert!(parse_network("1.0.0.0/33").is_err());
        assert!(parse_network("2001:db8::/129").is_err());
        assert!(parse_network("not-an-address/8").is_err());
        assert!(parse_network("").is_err());
    }
}
