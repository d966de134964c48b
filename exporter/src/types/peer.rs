// exporter/src/types/peer.rs

//! Neighbor observation records.
//!
//! A [`PeerObservation`] is what the scraper hands to the activity tracker
//! once per scrape cycle: the neighbor's address plus the traffic tallies
//! the node reported for it. The tracker never looks at individual fields;
//! it only compares [`Fingerprint`]s.

use serde::{Deserialize, Serialize};

use super::Fingerprint;

/// Per-neighbor transaction tallies as reported by the node.
///
/// All values are cumulative since the neighbor connection was established,
/// so an idle neighbor keeps reporting the same numbers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficCounters {
    /// All transactions received from the neighbor.
    #[serde(default)]
    pub all: u64,
    /// Received transactions that failed validation.
    #[serde(default)]
    pub invalid: u64,
    /// Received transactions that were new to this node.
    #[serde(default)]
    pub new: u64,
    /// Random transaction requests received from the neighbor.
    #[serde(default)]
    pub random_requests: u64,
    /// Transactions sent to the neighbor.
    #[serde(default)]
    pub sent: u64,
}

/// One neighbor as seen during a single scrape.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PeerObservation {
    /// Stable neighbor address, e.g. `"udp://node.example.org:14600"`.
    pub address: String,
    /// Traffic tallies at the time of the scrape.
    #[serde(default)]
    pub counters: TrafficCounters,
}

impl PeerObservation {
    pub fn new(address: impl Into<String>, counters: TrafficCounters) -> Self {
        Self {
            address: address.into(),
            counters,
        }
    }

    /// Fingerprint of the inbound traffic seen from this neighbor.
    ///
    /// Only the address and the received-side tallies (`all`, `invalid`,
    /// `new`) are covered. Outbound traffic is driven by this node, so it
    /// says nothing about whether the neighbor is feeding us.
    pub fn fingerprint(&self) -> Fingerprint {
        let c = &self.counters;
        let encoded = format!("{} {} {} {}", self.address, c.all, c.invalid, c.new);
        Fingerprint::compute(encoded.as_bytes())
    }
}
