use crate::classifier::{classify, IncidentReport, TopologyUpdate};
use crate::incidents::{IncidentAggregator, IngestOutcome};
use crate::models::{
    DashboardSnapshot, NodeHistogramEntry, PoissonPoint, RateEstimate, Ticket, TopologySnapshot,
};
use crate::rate::{poisson_series, RateEstimator, ResetPolicy};
use crate::topology::{AppliedSnapshot, TopologyStore};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

/// What happened to one inbound record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IngestReport {
    pub topology: Option<AppliedSnapshot>,
    pub topology_rejected: bool,
    pub incident: Option<IngestOutcome>,
}

impl IngestReport {
    pub fn discarded(&self) -> bool {
        self.topology.is_none() && self.incident.is_none()
    }
}

/// Everything the dashboard derives from the stream. Owned by a single writer; readers get
/// cloned snapshots.
#[derive(Debug)]
pub struct DashboardState {
    topology: TopologyStore,
    incidents: IncidentAggregator,
    rate: RateEstimator,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(crate::incidents::DEFAULT_TICKET_CAPACITY, ResetPolicy::default())
    }
}

impl DashboardState {
    pub fn new(ticket_capacity: usize, reset_policy: ResetPolicy) -> Self {
        Self {
            topology: TopologyStore::new(),
            incidents: IncidentAggregator::new(ticket_capacity),
            rate: RateEstimator::new(reset_policy),
        }
    }

    /// Applies one decoded record to completion. Never fails: records that cannot be used are
    /// logged and dropped, leaving the previous state in place.
    pub fn ingest(&mut self, record: &Value, now: DateTime<Utc>) -> IngestReport {
        let routes = match classify(record) {
            Ok(routes) => routes,
            Err(e) => {
                debug!(error = %e, "discarding unroutable record");
                return IngestReport::default();
            }
        };
        if routes.is_unroutable() {
            debug!("discarding record with neither topology nor incident shape");
        }

        let mut report = IngestReport::default();
        match routes.topology {
            Some(Ok(update)) => report.topology = Some(self.apply_topology(update)),
            Some(Err(e)) => {
                warn!(error = %e, "keeping previous topology");
                report.topology_rejected = true;
            }
            None => {}
        }
        if let Some(incident) = routes.incident {
            report.incident = Some(self.apply_incident(incident, now));
        }
        report
    }

    pub fn apply_topology(&mut self, update: TopologyUpdate) -> AppliedSnapshot {
        let applied = self.topology.apply_snapshot(update);
        let created = applied
            .nodes
            .iter()
            .filter(|id| self.incidents.ensure_entry(id))
            .count();
        debug!(
            nodes = applied.nodes.len(),
            new_histogram_entries = created,
            carried_forward = applied.carried_forward.len(),
            "topology snapshot applied"
        );
        applied
    }

    pub fn apply_incident(
        &mut self,
        incident: IncidentReport,
        now: DateTime<Utc>,
    ) -> IngestOutcome {
        let node_id = incident.node_id.clone();
        let outcome = self.incidents.ingest(incident, now);
        if outcome.counted {
            self.rate.record(now);
            self.rate.tick(now);
        } else {
            debug!(node = %node_id, "incident for unknown node, histogram untouched");
        }
        outcome
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> f64 {
        self.rate.tick(now)
    }

    pub fn on_reconnect(&mut self) -> bool {
        self.rate.on_reconnect()
    }

    pub fn topology(&self) -> &TopologyStore {
        &self.topology
    }

    pub fn incidents(&self) -> &IncidentAggregator {
        &self.incidents
    }

    pub fn topology_snapshot(&self) -> TopologySnapshot {
        self.topology.snapshot()
    }

    pub fn histogram(&self) -> Vec<NodeHistogramEntry> {
        self.incidents.histogram().to_vec()
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.incidents.tickets().to_vec()
    }

    pub fn rate(&self) -> RateEstimate {
        self.rate.estimate()
    }

    pub fn poisson(&self, range: u64) -> Vec<PoissonPoint> {
        poisson_series(self.rate.value(), range)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            topology: self.topology_snapshot(),
            histogram: self.histogram(),
            tickets: self.tickets(),
            rate: self.rate(),
        }
    }
}
