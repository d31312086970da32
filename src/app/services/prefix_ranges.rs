//! Range decomposition and prefix association
//!
//! Converts an inclusive address range into the minimal set of
//! CIDR-aligned prefixes exactly covering it, and hands each prefix of a
//! row's coverage to the prefix store together with the row's record.
//!
//! The decomposition repeatedly takes the largest power-of-two-aligned
//! block starting at the current lower bound that does not overshoot the
//! remaining range. The resulting cover is unique, has no overlaps or
//! gaps, and contains at most twice the address bit-width in prefixes.

use super::prefix_store::PrefixStore;
use crate::app::models::{Coverage, GeoRecord, IpRange, Prefix};
use crate::Result;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Decompose an inclusive range into its minimal CIDR cover
pub fn decompose_range(range: &IpRange) -> Vec<Prefix> {
    match *range {
        IpRange::V4 { lower, upper } => {
            decompose_bits(u32::from(lower) as u128, u32::from(upper) as u128, 32)
                .into_iter()
                .map(|(addr, length)| Prefix {
                    address: IpAddr::V4(Ipv4Addr::from(addr as u32)),
                    length,
                })
                .collect()
        }
        IpRange::V6 { lower, upper } => {
            decompose_bits(u128::from(lower), u128::from(upper), 128)
                .into_iter()
                .map(|(addr, length)| Prefix {
                    address: IpAddr::V6(Ipv6Addr::from(addr)),
                    length,
                })
                .collect()
        }
    }
}

/// Register a row's full address coverage with the prefix store
///
/// An explicit range is decomposed first; an already-aligned network is
/// handed over unchanged. Returns the number of prefixes added. A store
/// failure aborts mid-row: prefixes already added for this row stay in
/// the store, and the caller must treat the row as fully failed.
pub fn associate_coverage(
    store: &mut dyn PrefixStore,
    coverage: &Coverage,
    record: &Arc<GeoRecord>,
) -> Result<usize> {
    match coverage {
        Coverage::Network(prefix) => {
            store.add_prefix(*prefix, Arc::clone(record))?;
            Ok(1)
        }
        Coverage::Range(range) => {
            let prefixes = decompose_range(range);
            for prefix in &prefixes {
                store.add_prefix(*prefix, Arc::clone(record))?;
            }
            Ok(prefixes.len())
        }
    }
}

/// Greedy minimal cover of [lower, upper] for an address family of
/// `width` bits; bounds are family-encoded into the low bits of u128
fn decompose_bits(lower: u128, upper: u128, width: u8) -> Vec<(u128, u8)> {
    debug_assert!(lower <= upper);
    let width = width as u32;
    let mut prefixes = Vec::new();
    let mut cur = lower;

    loop {
        // Host bits permitted by the alignment of the current bound
        let align = if cur == 0 {
            width
        } else {
            cur.trailing_zeros().min(width)
        };

        // Host bits permitted by the size of the remaining range:
        // floor(log2(remaining + 1))
        let remaining = upper - cur;
        let span = if remaining == u128::MAX {
            128
        } else {
            127 - (remaining + 1).leading_zeros()
        };

        let host_bits = align.min(span);
        prefixes.push((cur, (width - host_bits) as u8));

        if host_bits >= width {
            // A single prefix covered the whole family
            break;
        }

        match cur.checked_add(1u128 << host_bits) {
            Some(next) if next <= upper => cur = next,
            _ => break,
        }
    }

    prefixes
}
