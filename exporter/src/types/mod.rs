//! Core domain types used by the exporter.
//!
//! This module defines the content fingerprint used for change detection
//! and the per-neighbor observation records fed in by the scraper. The goal
//! is to avoid "naked" byte buffers and loose counter tuples in public APIs
//! and instead use domain-specific newtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Neighbor observations and their traffic counters.
pub mod peer;

pub use peer::{PeerObservation, TrafficCounters};

/// Length in bytes of a [`Fingerprint`].
pub const FINGERPRINT_LEN: usize = 32;

/// Strongly-typed 256-bit content fingerprint (BLAKE3-256).
///
/// Fingerprints are only ever compared for equality: two observations with
/// the same fingerprint are treated as "nothing changed". They are not
/// persisted or exchanged between processes, so the exact digest is not
/// part of any contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Computes a new [`Fingerprint`] as the BLAKE3-256 hash of `data`.
    pub fn compute(data: &[u8]) -> Self {
        let h = blake3::hash(data);
        Fingerprint(*h.as_bytes())
    }

    /// Returns the underlying 32-byte digest as a borrowed array.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
