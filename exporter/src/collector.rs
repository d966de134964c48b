//! Scrape-cycle orchestration.
//!
//! The [`NeighborCollector`] is what a `/metrics` handler calls on every
//! scrape: it feeds the neighbor list through the [`ActivityMatrix`] and
//! copies the verdicts and raw counters into [`NeighborMetrics`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::activity::{ActivityMatrix, CycleReport, SlotState};
use crate::config::ActivityConfig;
use crate::metrics::{MetricsRegistry, NeighborMetrics};
use crate::types::PeerObservation;

/// Owns the activity matrix and publishes each cycle into the registry.
///
/// Overlapping scrapes are serialized: a whole cycle (advance, register,
/// evaluate, publish) runs under one lock, so concurrent callers cannot
/// interleave cursor moves with registrations.
///
/// Per-neighbor series only exist for neighbors in the latest feed. When a
/// neighbor drops out, its labelled series are removed from every gauge;
/// its matrix slot stays bound, so it resumes its history if it returns.
pub struct NeighborCollector {
    state: Mutex<CollectorState>,
    metrics: Arc<MetricsRegistry>,
}

struct CollectorState {
    matrix: ActivityMatrix,
    /// Addresses with live per-neighbor series.
    published: HashSet<String>,
}

impl NeighborCollector {
    pub fn new(config: ActivityConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            state: Mutex::new(CollectorState {
                matrix: ActivityMatrix::new(config),
                published: HashSet::new(),
            }),
            metrics,
        }
    }

    /// Metrics registry this collector publishes into.
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Runs one scrape cycle over `observations` and updates every
    /// neighbor metric.
    pub fn collect(&self, observations: &[PeerObservation]) -> CycleReport {
        let mut state = self.lock();
        let report = state.matrix.observe_cycle(observations);

        let m = &self.metrics.neighbors;
        m.scrapes_total.inc();
        m.total_neighbors.set(observations.len() as f64);
        m.active_neighbors.set(report.active_count as f64);

        for (observation, verdict) in observations.iter().zip(&report.peers) {
            publish_neighbor(m, observation, verdict.active);
        }

        let current: HashSet<String> = observations.iter().map(|o| o.address.clone()).collect();
        for gone in state.published.difference(&current) {
            tracing::debug!(address = %gone, "neighbor left the feed, removing its series");
            retire_neighbor(m, gone);
        }
        state.published = current;

        tracing::debug!(
            active = report.active_count,
            total = observations.len(),
            "published neighbor metrics"
        );

        report
    }

    /// Activity verdict for a single neighbor as of the last cycle.
    pub fn is_active(&self, address: &str) -> bool {
        self.lock().matrix.is_active(address)
    }

    pub fn slot_state(&self, address: &str) -> SlotState {
        self.lock().matrix.slot_state(address)
    }

    // A panic mid-cycle leaves at most one partially written history
    // column, which the next cycles overwrite.
    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn publish_neighbor(m: &NeighborMetrics, observation: &PeerObservation, active: bool) {
    let labels = [observation.address.as_str()];
    let c = &observation.counters;

    m.active
        .with_label_values(&labels)
        .set(if active { 1.0 } else { 0.0 });
    m.new_transactions.with_label_values(&labels).set(c.new as f64);
    m.random_transactions
        .with_label_values(&labels)
        .set(c.random_requests as f64);
    m.all_transactions.with_label_values(&labels).set(c.all as f64);
    m.invalid_transactions
        .with_label_values(&labels)
        .set(c.invalid as f64);
    m.sent_transactions.with_label_values(&labels).set(c.sent as f64);
}

fn retire_neighbor(m: &NeighborMetrics, address: &str) {
    let labels = [address];
    let vecs = [
        &m.active,
        &m.new_transactions,
        &m.random_transactions,
        &m.all_transactions,
        &m.invalid_transactions,
        &m.sent_transactions,
    ];

    for series in vecs {
        if let Err(e) = series.remove_label_values(&labels) {
            tracing::debug!(address, "no series to remove: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_HISTORY_DEPTH, MetricsConfig};
    use crate::types::TrafficCounters;

    fn collector() -> NeighborCollector {
        let metrics =
            Arc::new(MetricsRegistry::new(&MetricsConfig::default()).expect("create registry"));
        NeighborCollector::new(ActivityConfig::default(), metrics)
    }

    fn observation(address: &str, all: u64, new: u64) -> PeerObservation {
        PeerObservation::new(
            address,
            TrafficCounters {
                all,
                invalid: 1,
                new,
                random_requests: 4,
                sent: 250,
            },
        )
    }

    fn gauge(m: &prometheus::GaugeVec, address: &str) -> f64 {
        m.with_label_values(&[address]).get()
    }

    #[test]
    fn collect_publishes_counters_for_every_neighbor() {
        let collector = collector();
        let observations = [
            observation("udp://a.example.org:14600", 10, 3),
            observation("tcp://b.example.org:15600", 20, 6),
        ];

        let report = collector.collect(&observations);
        assert_eq!(report.peers.len(), 2);

        let m = &collector.metrics().neighbors;
        assert_eq!(m.scrapes_total.get(), 1);
        assert_eq!(m.total_neighbors.get(), 2.0);
        assert_eq!(m.active_neighbors.get(), 2.0);

        // The first neighbor in the list is published like any other.
        let first = "udp://a.example.org:14600";
        assert_eq!(gauge(&m.active, first), 1.0);
        assert_eq!(gauge(&m.all_transactions, first), 10.0);
        assert_eq!(gauge(&m.new_transactions, first), 3.0);
        assert_eq!(gauge(&m.invalid_transactions, first), 1.0);
        assert_eq!(gauge(&m.random_transactions, first), 4.0);
        assert_eq!(gauge(&m.sent_transactions, first), 250.0);

        assert_eq!(gauge(&m.all_transactions, "tcp://b.example.org:15600"), 20.0);
    }

    #[test]
    fn idle_neighbor_flag_drops_to_zero() {
        let collector = collector();
        let idle = observation("idle.example.org", 50, 5);
        let busy_addr = "busy.example.org";

        for cycle in 0..DEFAULT_HISTORY_DEPTH as u64 {
            collector.collect(&[idle.clone(), observation(busy_addr, 50 + cycle, 5)]);
        }

        let m = &collector.metrics().neighbors;
        assert_eq!(gauge(&m.active, "idle.example.org"), 0.0);
        assert_eq!(gauge(&m.active, busy_addr), 1.0);
        assert_eq!(m.active_neighbors.get(), 1.0);
        assert!(!collector.is_active("idle.example.org"));
        assert!(collector.is_active(busy_addr));
        assert_eq!(collector.slot_state("idle.example.org"), SlotState::Full);
        assert_eq!(m.scrapes_total.get(), DEFAULT_HISTORY_DEPTH as u64);
    }

    #[test]
    fn concurrent_collects_each_advance_once() {
        let collector = Arc::new(collector());
        let obs = observation("foo.com", 1, 1);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let collector = collector.clone();
                let obs = obs.clone();
                std::thread::spawn(move || {
                    collector.collect(&[obs]);
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("collector thread");
        }

        assert_eq!(collector.metrics().neighbors.scrapes_total.get(), 8);
        assert!(!collector.is_active("foo.com"));
        assert_eq!(collector.slot_state("foo.com"), SlotState::Full);
    }

    #[test]
    fn departed_neighbor_series_are_removed() {
        let collector = collector();
        let gone = "udp://gone.example.org:14600";
        let stays = "udp://stays.example.org:14600";

        collector.collect(&[observation(gone, 1, 1), observation(stays, 1, 1)]);
        assert!(collector.metrics().gather_text().contains(gone));

        collector.collect(&[observation(stays, 2, 2)]);
        let text = collector.metrics().gather_text();
        assert!(!text.contains(gone));
        assert!(text.contains(&format!(r#"iota_neighbors_active{{id="{stays}"}} 1"#)));
        assert_eq!(collector.metrics().neighbors.total_neighbors.get(), 1.0);

        // The slot is kept, so a returning neighbor is published again.
        assert_ne!(collector.slot_state(gone), SlotState::Unbound);
        collector.collect(&[observation(gone, 5, 5), observation(stays, 2, 2)]);
        let text = collector.metrics().gather_text();
        assert!(text.contains(&format!(r#"iota_neighbors_all_transactions{{id="{gone}"}} 5"#)));
    }

    #[test]
    fn rendered_text_contains_neighbor_series() {
        let collector = collector();
        collector.collect(&[observation("foo.com", 7, 2)]);

        let text = collector.metrics().gather_text();
        assert!(text.contains(r#"iota_neighbors_active{id="foo.com"} 1"#));
        assert!(text.contains(r#"iota_neighbors_new_transactions{id="foo.com"} 2"#));
        assert!(text.contains("iota_neighbors_info_total_neighbors 1"));
        assert!(text.contains("iota_neighbors_scrapes_total 1"));
    }
}
