//! Top-level configuration for the exporter core.
//!
//! This module aggregates configuration for:
//!
//! - neighbor activity tracking (slot capacity and history depth),
//! - the Prometheus registry (metric namespace).
//!
//! Higher-level binaries construct an [`ExporterConfig`] from defaults,
//! flags, or environment variables as needed.

/// Maximum number of distinct neighbor addresses tracked at once.
pub const DEFAULT_SLOT_CAPACITY: usize = 32;

/// Number of scrape cycles a neighbor's fingerprints are remembered for.
pub const DEFAULT_HISTORY_DEPTH: usize = 5;

/// Prefix prepended to every exported metric name.
pub const DEFAULT_METRICS_NAMESPACE: &str = "iota";

/// Sizing of the neighbor activity matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActivityConfig {
    /// Maximum number of neighbor slots. Slots are bound on first sight and
    /// never released; neighbors beyond this are not tracked.
    pub slot_capacity: usize,
    /// Number of cycles in the activity window. A neighbor is active if its
    /// fingerprint changed anywhere in this many cycles.
    pub history_depth: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Configuration for the Prometheus metrics registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetricsConfig {
    /// Namespace prefix, e.g. `"iota"` gives `iota_neighbors_active`.
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_METRICS_NAMESPACE.to_string(),
        }
    }
}

/// Top-level configuration for the exporter core.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExporterConfig {
    pub activity: ActivityConfig,
    pub metrics: MetricsConfig,
}
