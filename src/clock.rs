//! Replica identity and vector clocks.
//!
//! Every participant mints one [`ReplicaId`] per session and stamps each of
//! its operations with a [`VectorClock`] snapshot. Clock comparison yields
//! the causal partial order over operations; the replicated log extends it
//! to a total order (see [`crate::replica`]).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Opaque per-session replica identifier.
///
/// Minted once per running client from 64 random bits; stable for the
/// session's lifetime. On the wire it travels as a 16-digit hex string, and
/// its derived ordering doubles as the tie-break between concurrent
/// operations, so it must compare identically on every replica.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ReplicaId(u64);

impl ReplicaId {
    /// Mint a fresh random identifier.
    pub fn mint() -> Self {
        Self(fastrand::u64(..))
    }

    /// Build an identifier from a known value, e.g. in tests that need a
    /// predictable tie-break.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Error parsing a replica id from its hex string form.
#[derive(Debug, Error)]
#[error("invalid replica id `{0}`")]
pub struct ParseReplicaIdError(String);

impl FromStr for ReplicaId {
    type Err = ParseReplicaIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16)
            .map(ReplicaId)
            .map_err(|_| ParseReplicaIdError(s.to_owned()))
    }
}

impl Serialize for ReplicaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReplicaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A vector clock: one counter per replica ever observed.
///
/// Counters for absent replicas read as zero. A replica's own counter
/// increases by exactly one per operation it originates; counters learned
/// from other replicas only ever move forward, via [`VectorClock::observe`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock(BTreeMap<ReplicaId, u64>);

impl VectorClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The counter recorded for `id`, zero if never observed.
    pub fn get(&self, id: ReplicaId) -> u64 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Advance the counter for `id` by one and return the new value.
    pub fn increment(&mut self, id: ReplicaId) -> u64 {
        let counter = self.0.entry(id).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Merge another clock into this one by pointwise maximum.
    pub fn observe(&mut self, other: &VectorClock) {
        for (&id, &counter) in &other.0 {
            let entry = self.0.entry(id).or_insert(0);
            if *entry < counter {
                *entry = counter;
            }
        }
    }

    /// Causal comparison under the standard vector-clock partial order.
    ///
    /// `Some(Less)` means `self` causally precedes `other` (every component
    /// is `<=` and at least one is `<`); `None` means the clocks are
    /// concurrent.
    pub fn causal_cmp(&self, other: &VectorClock) -> Option<Ordering> {
        let mut less = false;
        let mut greater = false;
        for &id in self.0.keys().chain(other.0.keys()) {
            let a = self.get(id);
            let b = other.get(id);
            if a < b {
                less = true;
            } else if a > b {
                greater = true;
            }
            if less && greater {
                return None;
            }
        }
        match (less, greater) {
            (false, false) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (true, true) => None,
        }
    }

    /// Sum of all counters. Strictly increases along causal dominance, which
    /// makes it usable as the leading key of a causality-respecting total
    /// order.
    pub fn weight(&self) -> u64 {
        self.0.values().sum()
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, counter)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}: {counter}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ReplicaId {
        ReplicaId::from_raw(raw)
    }

    #[test]
    fn test_replica_id_roundtrip() {
        let original = ReplicaId::from_raw(0xdead_beef_0042_1337);
        let parsed: ReplicaId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
        assert!("not hex!".parse::<ReplicaId>().is_err());
    }

    #[test]
    fn test_increment_and_get() {
        let mut clock = VectorClock::new();
        assert_eq!(clock.get(id(1)), 0);
        assert_eq!(clock.increment(id(1)), 1);
        assert_eq!(clock.increment(id(1)), 2);
        assert_eq!(clock.get(id(1)), 2);
        assert_eq!(clock.get(id(2)), 0);
    }

    #[test]
    fn test_observe_takes_pointwise_max() {
        let mut a = VectorClock::new();
        a.increment(id(1));
        a.increment(id(1));

        let mut b = VectorClock::new();
        b.increment(id(1));
        b.increment(id(2));

        a.observe(&b);
        assert_eq!(a.get(id(1)), 2);
        assert_eq!(a.get(id(2)), 1);
        // Observing is idempotent.
        let snapshot = a.clone();
        a.observe(&b);
        assert_eq!(a, snapshot);
    }

    #[test]
    fn test_causal_cmp() {
        let mut earlier = VectorClock::new();
        earlier.increment(id(1));

        let mut later = earlier.clone();
        later.increment(id(1));
        later.increment(id(2));

        assert_eq!(earlier.causal_cmp(&later), Some(Ordering::Less));
        assert_eq!(later.causal_cmp(&earlier), Some(Ordering::Greater));
        assert_eq!(earlier.causal_cmp(&earlier.clone()), Some(Ordering::Equal));

        let mut concurrent = VectorClock::new();
        concurrent.increment(id(3));
        assert_eq!(earlier.causal_cmp(&concurrent), None);
        assert_eq!(concurrent.causal_cmp(&earlier), None);
    }

    #[test]
    fn test_weight_respects_dominance() {
        let mut a = VectorClock::new();
        a.increment(id(1));
        let mut b = a.clone();
        b.increment(id(2));
        assert!(a.weight() < b.weight());
    }

    #[test]
    fn test_serde_hex_keys() {
        let mut clock = VectorClock::new();
        clock.increment(id(0xab));
        let json = serde_json::to_string(&clock).unwrap();
        assert_eq!(json, r#"{"00000000000000ab":1}"#);
        let back: VectorClock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clock);
    }
}
