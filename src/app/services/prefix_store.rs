//! Prefix-indexed record store
//!
//! The destination of the whole pipeline: a mapping from address prefix to
//! shared geolocation record. Loading only needs `add_prefix`; the
//! in-memory implementation also answers longest-prefix queries so loaded
//! data can be inspected from the CLI and exercised in tests.

use crate::app::models::{GeoRecord, Prefix};
use crate::{Error, Result};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// Sink for prefix-to-record associations
pub trait PrefixStore {
    /// Associate a prefix with a record
    ///
    /// Re-adding a prefix replaces the earlier association; later vendor
    /// rows win, matching file order.
    fn add_prefix(&mut self, prefix: Prefix, record: Arc<GeoRecord>) -> Result<()>;
}

/// In-memory prefix store with longest-prefix-match lookups
///
/// Entries are keyed by (masked address, prefix length) per family. A
/// lookup probes lengths from most to least specific, so a /31 entry
/// shadows an enclosing /16 for its two addresses.
#[derive(Debug, Default)]
pub struct MemoryPrefixStore {
    v4: HashMap<(u32, u8), Arc<GeoRecord>>,
    v6: HashMap<(u128, u8), Arc<GeoRecord>>,
}

impl MemoryPrefixStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored prefixes across both families
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Whether the store holds no prefixes
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Find the record for the most specific prefix containing `addr`
    pub fn lookup(&self, addr: IpAddr) -> Option<&Arc<GeoRecord>> {
        match addr {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                for length in (0..=32u8).rev() {
                    if let Some(record) = self.v4.get(&(mask_v4(bits, length), length)) {
                        return Some(record);
                    }
                }
                None
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                for length in (0..=128u8).rev() {
                    if let Some(record) = self.v6.get(&(mask_v6(bits, length), length)) {
                        return Some(record);
                    }
                }
                None
            }
        }
    }

    /// Iterate over all stored prefix/record pairs
    pub fn iter(&self) -> impl Iterator<Item = (Prefix, &Arc<GeoRecord>)> {
        let v4 = self.v4.iter().map(|(&(bits, length), record)| {
            (
                Prefix {
                    address: IpAddr::V4(bits.into()),
                    length,
                },
                record,
            )
        });
        let v6 = self.v6.iter().map(|(&(bits, length), record)| {
            (
                Prefix {
                    address: IpAddr::V6(bits.into()),
                    length,
                },
                record,
            )
        });
        v4.chain(v6)
    }
}

impl PrefixStore for MemoryPrefixStore {
    fn add_prefix(&mut self, prefix: Prefix, record: Arc<GeoRecord>) -> Result<()> {
        if prefix.length > prefix.family_width() {
            return Err(Error::association(format!(
                "invalid prefix length /{} for {}",
                prefix.length, prefix.address
            )));
        }

        match prefix.address {
            IpAddr::V4(addr) => {
                let key = (mask_v4(u32::from(addr), prefix.length), prefix.length);
                self.v4.insert(key, record);
            }
            IpAddr::V6(addr) => {
                let key = (mask_v6(u128::from(addr), prefix.length), prefix.length);
                self.v6.insert(key, record);
            }
        }
        Ok(())
    }
}

fn mask_v4(bits: u32, length: u8) -> u32 {
    if length == 0 {
        0
    } else {
        bits & (u32::MAX << (32 - length))
    }
}

fn mask_v6(bits: u128, length: u8) -> u128 {
    if length == 0 {
        0
    } else {
        bits & (u128::MAX << (128 - length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ProviderKind;

    fn record(id: u32) -> Arc<GeoRecord> {
        Arc::new(GeoRecord::new(id, ProviderKind::Maxmind).unwrap())
    }

    fn prefix(s: &str) -> Prefix {
        let (addr, length) = s.split_once('/').unwrap();
        Prefix::new(addr.parse().unwrap(), length.parse().unwrap()).unwrap()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut store = MemoryPrefixStore::new();
        store.add_prefix(prefix("10.0.0.0/30"), record(1)).unwrap();

        assert_eq!(store.lookup(ip("10.0.0.2")).unwrap().id, 1);
        assert!(store.lookup(ip("10.0.0.4")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut store = MemoryPrefixStore::new();
        store.add_prefix(prefix("10.0.0.0/16"), record(1)).unwrap();
        store.add_prefix(prefix("10.0.4.0/24"), record(2)).unwrap();

        assert_eq!(store.lookup(ip("10.0.4.9")).unwrap().id, 2);
        assert_eq!(store.lookup(ip("10.0.5.9")).unwrap().id, 1);
    }

    #[test]
    fn test_default_route_matches_everything() {
        let mut store = MemoryPrefixStore::new();
        store.add_prefix(prefix("0.0.0.0/0"), record(1)).unwrap();

        assert_eq!(store.lookup(ip("203.0.113.80")).unwrap().id, 1);
        assert!(store.lookup(ip("2001:db8::1")).is_none());
    }

    #[test]
    fn test_families_are_independent() {
        let mut store = MemoryPrefixStore::new();
        store.add_prefix(prefix("10.0.0.0/8"), record(1)).unwrap();
        store
            .add_prefix(prefix("2001:db8::/32"), record(2))
            .unwrap();

        assert_eq!(store.lookup(ip("10.1.2.3")).unwrap().id, 1);
        assert_eq!(store.lookup(ip("2001:db8::42")).unwrap().id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_readding_a_prefix_replaces_the_record() {
        let mut store = MemoryPrefixStore::new();
        store.add_prefix(prefix("10.0.0.0/24"), record(1)).unwrap();
        store.add_prefix(prefix("10.0.0.0/24"), record(2)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup(ip("10.0.0.1")).unwrap().id, 2);
    }

    #[test]
    fn test_unmasked_host_bits_are_ignored() {
        let mut store = MemoryPrefixStore::new();
        // Base address carries stray host bits; the store masks them
        store.add_prefix(prefix("10.0.0.7/24"), record(1)).unwrap();

        assert_eq!(store.lookup(ip("10.0.0.200")).unwrap().id, 1);
    }
}
