//! Neighbor liveness detection.
//!
//! Each scrape cycle the exporter fingerprints every neighbor's inbound
//! traffic counters and stores the fingerprint in a small per-neighbor ring
//! buffer. A neighbor counts as active while any fingerprint in its window
//! differs from the others, i.e. its counters moved at some point during
//! the last `history_depth` cycles.
//!
//! Memory is bounded by `slot_capacity * history_depth` fingerprints no
//! matter how long the process runs.
//!
//! ```ignore
//! use iri_exporter::{ActivityMatrix, PeerObservation};
//!
//! let mut matrix = ActivityMatrix::with_defaults();
//! let active = matrix.count_active(&observations);
//! ```

pub mod matrix;
pub mod slot;

pub use matrix::{ActivityMatrix, CycleReport, PeerActivity};
pub use slot::{PeerSlot, SlotState};
