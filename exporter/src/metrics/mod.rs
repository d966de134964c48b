//! Metrics and instrumentation for the exporter.
//!
//! This module defines Prometheus-compatible neighbor metrics and renders
//! them in the Prometheus text format. Serving the text over HTTP is left
//! to the hosting binary.
//!
//! Typical usage:
//!
//! ```ignore
//! use iri_exporter::{MetricsConfig, MetricsRegistry};
//!
//! let registry = MetricsRegistry::new(&MetricsConfig::default())?;
//! registry.neighbors.total_neighbors.set(3.0);
//! let body = registry.gather_text();
//! ```

pub mod prometheus;

pub use self::prometheus::{MetricsRegistry, NEIGHBOR_LABEL, NeighborMetrics};
