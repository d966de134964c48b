//! Per-neighbor fingerprint history.

use crate::types::Fingerprint;

/// Lifecycle of a neighbor slot.
///
/// Slots only ever move forward: there is no transition back to
/// [`SlotState::Unbound`] because bound slots are never evicted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotState {
    /// No slot is bound to the address.
    Unbound,
    /// Bound, but fewer observations than the history depth have been
    /// recorded. Unset cells still take part in the activity comparison.
    Filling,
    /// At least one observation per history cell has been recorded.
    Full,
}

/// Ring buffer of fingerprints for a single neighbor address.
///
/// The buffer is indexed by the matrix-wide cursor rather than by a
/// per-slot head, so all slots rotate in lockstep. `None` marks a cell that
/// has never been written.
#[derive(Clone, Debug)]
pub struct PeerSlot {
    address: String,
    history: Box<[Option<Fingerprint>]>,
    observations: u64,
    last_cycle: Option<u64>,
}

impl PeerSlot {
    pub(crate) fn new(address: impl Into<String>, depth: usize) -> Self {
        Self {
            address: address.into(),
            history: vec![None; depth].into_boxed_slice(),
            observations: 0,
            last_cycle: None,
        }
    }

    /// Address this slot is bound to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw history cells, indexed by cursor position.
    pub fn history(&self) -> &[Option<Fingerprint>] {
        &self.history
    }

    /// Number of distinct cycles in which this neighbor was registered.
    pub fn observations(&self) -> u64 {
        self.observations
    }

    pub fn state(&self) -> SlotState {
        if self.observations >= self.history.len() as u64 {
            SlotState::Full
        } else {
            SlotState::Filling
        }
    }

    /// Returns `true` unless every history cell holds the same value.
    pub fn is_active(&self) -> bool {
        match self.history.split_first() {
            Some((first, rest)) => rest.iter().any(|cell| cell != first),
            None => false,
        }
    }

    /// Writes `fingerprint` at `cursor`. A second write in the same cycle
    /// replaces the first and is not counted as a new observation.
    pub(crate) fn record(&mut self, cycle: u64, cursor: usize, fingerprint: Fingerprint) {
        self.history[cursor] = Some(fingerprint);
        if self.last_cycle != Some(cycle) {
            self.last_cycle = Some(cycle);
            self.observations = self.observations.saturating_add(1);
        }
    }
}
