//! IRI exporter library crate.
//!
//! This crate provides the neighbor side of a Prometheus exporter for an
//! IOTA IRI node:
//!
//! - strongly-typed observation and fingerprint types (`types`),
//! - bounded neighbor liveness detection (`activity`),
//! - Prometheus-based neighbor metrics (`metrics`),
//! - a scrape-cycle orchestrator tying the two together (`collector`),
//! - and a top-level configuration (`config`).
//!
//! Fetching the neighbor list from the node and serving `/metrics` are
//! left to the hosting binary.

pub mod activity;
pub mod collector;
pub mod config;
pub mod metrics;
pub mod types;

// Re-export top-level configuration types.
pub use config::{
    ActivityConfig, DEFAULT_HISTORY_DEPTH, DEFAULT_METRICS_NAMESPACE, DEFAULT_SLOT_CAPACITY,
    ExporterConfig, MetricsConfig,
};

// Re-export the activity tracker.
pub use activity::{ActivityMatrix, CycleReport, PeerActivity, PeerSlot, SlotState};

// Re-export metrics registry and the collector.
pub use collector::NeighborCollector;
pub use metrics::{MetricsRegistry, NeighborMetrics};

// Re-export domain types at the crate root for convenience.
pub use types::*;
