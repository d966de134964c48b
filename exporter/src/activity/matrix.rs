// exporter/src/activity/matrix.rs

//! Fixed-capacity activity matrix shared by all neighbors.

use std::collections::HashMap;

use crate::config::{ActivityConfig, DEFAULT_SLOT_CAPACITY};
use crate::types::PeerObservation;

use super::slot::{PeerSlot, SlotState};

/// Activity verdict for one neighbor in one cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeerActivity {
    pub address: String,
    pub active: bool,
    /// `false` if the neighbor did not fit in the matrix and its
    /// observation was dropped.
    pub tracked: bool,
}

/// Outcome of a full scrape cycle.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CycleReport {
    /// Per-neighbor verdicts, in input order.
    pub peers: Vec<PeerActivity>,
    /// Number of neighbors reported active.
    pub active_count: usize,
    /// Number of observations dropped because every slot was taken.
    pub dropped: usize,
}

/// Bounded set of neighbor slots sharing a single history cursor.
///
/// The matrix is not synchronized. It expects one writer that runs each
/// cycle to completion (advance, register everything, read verdicts) before
/// starting the next; [`crate::NeighborCollector`] enforces that with a
/// mutex.
///
/// Slots are bound to addresses on first sight and are never released.
/// Once `slot_capacity` addresses have been seen, observations for any new
/// address are dropped and that address always reads inactive.
#[derive(Clone, Debug)]
pub struct ActivityMatrix {
    cursor: usize,
    cycle: u64,
    capacity: usize,
    depth: usize,
    slots: Vec<PeerSlot>,
    index: HashMap<String, usize>,
}

impl ActivityMatrix {
    /// Creates an empty matrix. A history depth of zero is treated as one.
    ///
    /// Storage grows as neighbors are bound; only a default-sized block is
    /// reserved up front, so a very large `slot_capacity` costs nothing
    /// until that many neighbors show up.
    pub fn new(config: ActivityConfig) -> Self {
        let reserve = config.slot_capacity.min(DEFAULT_SLOT_CAPACITY);
        Self {
            cursor: 0,
            cycle: 0,
            capacity: config.slot_capacity,
            depth: config.history_depth.max(1),
            slots: Vec::with_capacity(reserve),
            index: HashMap::with_capacity(reserve),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ActivityConfig::default())
    }

    /// Current write position in every slot's history.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn history_depth(&self) -> usize {
        self.depth
    }

    /// Number of bound slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Moves the cursor to the next history cell, wrapping at the depth.
    ///
    /// Call exactly once per scrape cycle, before any [`register`] calls.
    /// Calling it more or less often does not break anything, it only
    /// stretches or shrinks the window relative to wall-clock time.
    ///
    /// [`register`]: ActivityMatrix::register
    pub fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1) % self.depth;
        self.cycle = self.cycle.wrapping_add(1);
    }

    /// Returns the slot index bound to `address`, binding the next free slot
    /// if the address is new.
    ///
    /// Returns `None` when the address is unknown and every slot is already
    /// bound to another address.
    pub fn find_or_create_slot(&mut self, address: &str) -> Option<usize> {
        if let Some(&idx) = self.index.get(address) {
            return Some(idx);
        }
        if self.slots.len() >= self.capacity {
            return None;
        }

        let idx = self.slots.len();
        self.slots.push(PeerSlot::new(address, self.depth));
        self.index.insert(address.to_string(), idx);
        tracing::debug!(address, slot = idx, "bound neighbor slot");
        Some(idx)
    }

    /// Records the observation's fingerprint at the current cursor.
    ///
    /// Returns `false` if the neighbor could not be given a slot and the
    /// observation was dropped.
    pub fn register(&mut self, observation: &PeerObservation) -> bool {
        let Some(idx) = self.find_or_create_slot(&observation.address) else {
            tracing::debug!(
                address = %observation.address,
                capacity = self.capacity,
                "no free neighbor slot, observation dropped"
            );
            return false;
        };

        let fingerprint = observation.fingerprint();
        self.slots[idx].record(self.cycle, self.cursor, fingerprint);
        true
    }

    /// Returns `true` if the neighbor's fingerprint changed anywhere in the
    /// current window.
    ///
    /// Unknown addresses (never registered, or dropped for capacity) read
    /// `false`. Cells that have never been written compare equal to each
    /// other but not to a real fingerprint, so a slot still filling up reads
    /// active once it has at least one observation.
    ///
    /// This is a pure read: querying an address never binds a slot, so
    /// asking about neighbors that are not in the feed does not use up
    /// capacity.
    pub fn is_active(&self, address: &str) -> bool {
        self.slot(address).is_some_and(PeerSlot::is_active)
    }

    pub fn slot_state(&self, address: &str) -> SlotState {
        self.slot(address).map_or(SlotState::Unbound, PeerSlot::state)
    }

    pub fn slot(&self, address: &str) -> Option<&PeerSlot> {
        self.index.get(address).map(|&idx| &self.slots[idx])
    }

    /// Iterates over bound slots in binding order.
    pub fn slots(&self) -> impl Iterator<Item = &PeerSlot> {
        self.slots.iter()
    }

    /// Runs one scrape cycle: advances the cursor once, then registers and
    /// evaluates every observation in order.
    pub fn observe_cycle(&mut self, observations: &[PeerObservation]) -> CycleReport {
        self.advance_cursor();

        let mut report = CycleReport {
            peers: Vec::with_capacity(observations.len()),
            ..CycleReport::default()
        };

        for observation in observations {
            let tracked = self.register(observation);
            let active = self.is_active(&observation.address);

            tracing::debug!(
                address = %observation.address,
                active,
                "neighbor active status"
            );

            if !tracked {
                report.dropped += 1;
            }
            if active {
                report.active_count += 1;
            }
            report.peers.push(PeerActivity {
                address: observation.address.clone(),
                active,
                tracked,
            });
        }

        if report.dropped > 0 {
            tracing::warn!(
                dropped = report.dropped,
                capacity = self.capacity,
                "neighbor slot capacity exhausted, extra neighbors are not tracked"
            );
        }
        tracing::debug!(
            active = report.active_count,
            total = observations.len(),
            "active neighbors this cycle"
        );

        report
    }

    /// Runs one scrape cycle and returns the number of active neighbors.
    pub fn count_active(&mut self, observations: &[PeerObservation]) -> usize {
        self.observe_cycle(observations).active_count
    }
}

impl Default for ActivityMatrix {
    fn default() -> Self {
        Self::with_defaults()
    }
}
