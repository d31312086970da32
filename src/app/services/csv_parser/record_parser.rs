//! Per-schema row assembly
//!
//! Builds one location or block row from a validated CSV record, walking
//! the schema's column table cell by cell. The two tolerated vendor data
//! defects surface here as discards instead of errors: coordinate-less
//! location rows, and v2 block rows with an empty foreign key.

use super::field_parsers::{
    parse_accuracy_radius, parse_code2, parse_continent_index, parse_defaultable_u32,
    parse_latitude, parse_longitude, parse_network, parse_numeric_v4, parse_optional_text,
    parse_record_id,
};
use super::schema::{FieldKind, Schema};
use crate::app::models::{Coverage, GeoRecord, IpRange};
use crate::constants::continent_for_country;
use csv::StringRecord;
use std::net::Ipv4Addr;

/// A failed cell or row, without file/line context
///
/// The streaming parser owns the file name and line number and turns this
/// into the crate-level cell or row error.
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based column of the offending cell; None for whole-row failures
    pub column: Option<usize>,
    pub message: String,
}

impl RowFailure {
    fn cell(column: usize, message: impl Into<String>) -> Self {
        Self {
            column: Some(column + 1),
            message: message.into(),
        }
    }

    fn row(message: impl Into<String>) -> Self {
        Self {
            column: None,
            message: message.into(),
        }
    }
}

/// Why a row was dropped without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Location row with an identifier but empty latitude/longitude
    MissingCoordinates,
    /// v2 block row with an empty foreign-key column
    MissingForeignKey,
}

/// A fully-parsed location row
#[derive(Debug, Clone)]
pub struct LocationRow {
    pub record: GeoRecord,
}

/// A fully-parsed block row, before join resolution
#[derive(Debug, Clone)]
pub struct BlockRow {
    /// Address coverage: an inclusive range or a pass-through network
    pub coverage: Coverage,

    /// Foreign key into the locations data
    pub key: u32,

    /// Block-level field overlays (v2 schema only)
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_radius: Option<u32>,
}

/// One kept row of either file kind
#[derive(Debug, Clone)]
pub enum RowData {
    Location(LocationRow),
    Block(BlockRow),
}

/// Outcome of assembling one row
#[derive(Debug, Clone)]
pub enum RowOutcome {
    Row(RowData),
    Discarded(DiscardReason),
}

/// Assemble one row according to the schema's column table
///
/// The caller must already have verified the exact column count.
pub fn parse_row(schema: Schema, record: &StringRecord) -> Result<RowOutcome, RowFailure> {
    match schema.kind() {
        super::schema::FileKind::Locations => parse_location_row(schema, record),
        super::schema::FileKind::Blocks => parse_block_row(schema, record),
    }
}

fn parse_location_row(schema: Schema, record: &StringRecord) -> Result<RowOutcome, RowFailure> {
    let mut row: Option<GeoRecord> = None;

    for (idx, column) in schema.columns().iter().enumerate() {
        let token = record.get(idx).unwrap_or("");

        match column.kind {
            FieldKind::LocationId => {
                let id = parse_record_id(token).map_err(|m| RowFailure::cell(idx, m))?;
                let geo = GeoRecord::new(id, schema.provider())
                    .map_err(|e| RowFailure::cell(idx, e.to_string()))?;
                row = Some(geo);
            }
            FieldKind::Ignored => {}
            _ => {
                // The record-starting column is always first in every schema
                let geo = row
                    .as_mut()
                    .ok_or_else(|| RowFailure::row("row started before its identifier column"))?;
                match column.kind {
                    FieldKind::CountryCode { fold_upper } => {
                        geo.country_code =
                            parse_code2(token, fold_upper).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::ContinentCode => {
                        geo.continent_code =
                            parse_code2(token, false).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::ContinentIndex => {
                        geo.continent_code =
                            parse_continent_index(token).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::Region => geo.region = parse_optional_text(token),
                    FieldKind::City => geo.city = parse_optional_text(token),
                    FieldKind::PostalCode => geo.postal_code = parse_optional_text(token),
                    FieldKind::Timezone => geo.timezone = parse_optional_text(token),
                    FieldKind::ConnectionSpeed => {
                        geo.connection_speed = parse_optional_text(token)
                    }
                    FieldKind::Latitude => {
                        // Known vendor defect: a located row without
                        // coordinates is dropped whole, identifier included
                        if token.is_empty() {
                            return Ok(RowOutcome::Discarded(DiscardReason::MissingCoordinates));
                        }
                        geo.latitude =
                            parse_latitude(token).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::Longitude => {
                        if token.is_empty() {
                            return Ok(RowOutcome::Discarded(DiscardReason::MissingCoordinates));
                        }
                        geo.longitude =
                            parse_longitude(token).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::MetroCode => {
                        geo.metro_code = parse_defaultable_u32(token, "metro code")
                            .map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::AreaCode => {
                        geo.area_code = parse_defaultable_u32(token, "area code")
                            .map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::AccuracyRadius => {
                        geo.accuracy_radius =
                            parse_accuracy_radius(token).map_err(|m| RowFailure::cell(idx, m))?;
                    }
                    FieldKind::LocationId
                    | FieldKind::ForeignKey
                    | FieldKind::RangeStart
                    | FieldKind::RangeEnd
                    | FieldKind::Network
                    | FieldKind::Ignored => {
                        return Err(RowFailure::cell(idx, "unexpected column in locations schema"));
                    }
                }
            }
        }
    }

    let mut geo =
        row.ok_or_else(|| RowFailure::row("locations schema has no identifier column"))?;

    // Legacy v1 has no continent column; derive it from the country code.
    // The vendor also encodes two flags as special country codes: A1 marks
    // an anonymous proxy, A2 a satellite provider.
    if schema == Schema::LegacyLocations {
        geo.continent_code = continent_for_country(&geo.country_code).to_string();
        match geo.country_code.as_str() {
            "A1" => geo.anonymous_proxy = true,
            "A2" => geo.satellite_provider = true,
            _ => {}
        }
    }

    Ok(RowOutcome::Row(RowData::Location(LocationRow {
        record: geo,
    })))
}

fn parse_block_row(schema: Schema, record: &StringRecord) -> Result<RowOutcome, RowFailure> {
    let mut range_start: Option<Ipv4Addr> = None;
    let mut range_end: Option<Ipv4Addr> = None;
    let mut network = None;
    let mut key: Option<u32> = None;
    let mut postal_code = None;
    let mut latitude = None;
    let mut longitude = None;
    let mut accuracy_radius = None;

    for (idx, column) in schema.columns().iter().enumerate() {
        let token = record.get(idx).unwrap_or("");

        match column.kind {
            FieldKind::RangeStart => {
                range_start =
                    Some(parse_numeric_v4(token).map_err(|m| RowFailure::cell(idx, m))?);
            }
            FieldKind::RangeEnd => {
                range_end = Some(parse_numeric_v4(token).map_err(|m| RowFailure::cell(idx, m))?);
            }
            FieldKind::Network => {
                network = Some(parse_network(token).map_err(|m| RowFailure::cell(idx, m))?);
            }
            FieldKind::ForeignKey => {
                // Known vendor defect in v2 exports: blocks without a
                // geoname id carry no usable record and are dropped whole
                if token.is_empty() && schema == Schema::BlocksV2 {
                    return Ok(RowOutcome::Discarded(DiscardReason::MissingForeignKey));
                }
                key = Some(parse_record_id(token).map_err(|m| RowFailure::cell(idx, m))?);
            }
            FieldKind::PostalCode => postal_code = parse_optional_text(token),
            FieldKind::Latitude => {
                // Empty block coordinates mean "no overlay", not an error
                if !token.is_empty() {
                    latitude = Some(parse_latitude(token).map_err(|m| RowFailure::cell(idx, m))?);
                }
            }
            FieldKind::Longitude => {
                if !token.is_empty() {
                    longitude =
                        Some(parse_longitude(token).map_err(|m| RowFailure::cell(idx, m))?);
                }
            }
            FieldKind::AccuracyRadius => {
                if !token.is_empty() {
                    accuracy_radius = Some(
                        parse_accuracy_radius(token).map_err(|m| RowFailure::cell(idx, m))?,
                    );
                }
            }
            FieldKind::Ignored => {}
            _ => {
                return Err(RowFailure::cell(idx, "unexpected column in blocks schema"));
            }
        }
    }

    let coverage = match (network, range_start, range_end) {
        (Some(prefix), None, None) => Coverage::Network(prefix),
        (None, Some(lower), Some(upper)) => {
            let range = IpRange::v4(lower, upper).map_err(|e| RowFailure::row(e.to_string()))?;
            Coverage::Range(range)
        }
        _ => return Err(RowFailure::row("blocks schema lacks address coverage")),
    };

    let key = key.ok_or_else(|| RowFailure::row("blocks schema lacks a foreign key column"))?;

    Ok(RowOutcome::Row(RowData::Block(BlockRow {
        coverage,
        key,
        postal_code,
        latitude,
        longitude,
        accuracy_radius,
    })))
}
