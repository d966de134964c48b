//! Prometheus-backed neighbor metrics.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and the strongly-typed neighbor metrics, and renders them in
//! the text exposition format for whatever serves `/metrics`.

use prometheus::{self, Encoder, Gauge, GaugeVec, IntCounter, Opts, Registry, TextEncoder};

use crate::config::MetricsConfig;

/// Label carrying the neighbor address on per-neighbor metrics.
pub const NEIGHBOR_LABEL: &str = "id";

/// Neighbor-related Prometheus metrics.
///
/// These are registered into a [`Registry`] and updated once per scrape
/// cycle by [`crate::NeighborCollector`].
#[derive(Clone)]
pub struct NeighborMetrics {
    /// Number of scrape cycles run.
    pub scrapes_total: IntCounter,
    /// Number of neighbors reported by the node in the last cycle.
    pub total_neighbors: Gauge,
    /// Number of neighbors considered active in the last cycle.
    pub active_neighbors: Gauge,
    /// 1 if the neighbor's inbound traffic moved within the window, else 0.
    pub active: GaugeVec,
    pub new_transactions: GaugeVec,
    pub random_transactions: GaugeVec,
    pub all_transactions: GaugeVec,
    pub invalid_transactions: GaugeVec,
    pub sent_transactions: GaugeVec,
}

impl NeighborMetrics {
    /// Registers neighbor metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let scrapes_total = IntCounter::with_opts(Opts::new(
            "neighbors_scrapes_total",
            "Total number of neighbor scrape cycles",
        ))?;
        registry.register(Box::new(scrapes_total.clone()))?;

        let total_neighbors = Gauge::with_opts(Opts::new(
            "neighbors_info_total_neighbors",
            "Total number of neighbors as reported by the node",
        ))?;
        registry.register(Box::new(total_neighbors.clone()))?;

        let active_neighbors = Gauge::with_opts(Opts::new(
            "neighbors_active_neighbors",
            "Total number of neighbors that are active",
        ))?;
        registry.register(Box::new(active_neighbors.clone()))?;

        let active = register_neighbor_vec(
            registry,
            "neighbors_active",
            "Whether the neighbor is active based on incoming transactions (1/0)",
        )?;
        let new_transactions = register_neighbor_vec(
            registry,
            "neighbors_new_transactions",
            "Number of new transactions received from a neighbor",
        )?;
        let random_transactions = register_neighbor_vec(
            registry,
            "neighbors_random_transactions",
            "Number of random transaction requests received from a neighbor",
        )?;
        let all_transactions = register_neighbor_vec(
            registry,
            "neighbors_all_transactions",
            "Number of transactions of all types received from a neighbor",
        )?;
        let invalid_transactions = register_neighbor_vec(
            registry,
            "neighbors_invalid_transactions",
            "Number of invalid transactions received from a neighbor",
        )?;
        let sent_transactions = register_neighbor_vec(
            registry,
            "neighbors_sent_transactions",
            "Number of transactions sent to a neighbor",
        )?;

        Ok(Self {
            scrapes_total,
            total_neighbors,
            active_neighbors,
            active,
            new_transactions,
            random_transactions,
            all_transactions,
            invalid_transactions,
            sent_transactions,
        })
    }
}

fn register_neighbor_vec(
    registry: &Registry,
    name: &str,
    help: &str,
) -> Result<GaugeVec, prometheus::Error> {
    let vec = GaugeVec::new(Opts::new(name, help), &[NEIGHBOR_LABEL])?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

/// Wrapper around a Prometheus registry and the neighbor metrics.
///
/// This is the main handle passed around in the exporter. It can be
/// wrapped in an [`Arc`](std::sync::Arc) and shared across threads.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub neighbors: NeighborMetrics,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// prefixed by the configured namespace and registers the neighbor
    /// metrics.
    pub fn new(config: &MetricsConfig) -> Result<Self, prometheus::Error> {
        let prefix = Some(config.namespace.clone()).filter(|ns| !ns.is_empty());
        let registry = Registry::new_custom(prefix, None)?;
        let neighbors = NeighborMetrics::register(&registry)?;
        Ok(Self {
            registry,
            neighbors,
        })
    }

    /// Underlying registry, for callers that want to add their own metrics.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
