use crate::classifier::{IncidentReport, PriorityCode};
use crate::models::{DisplayPriority, NodeHistogramEntry, NodeId, SeverityBucket, Ticket};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

pub const DEFAULT_TICKET_CAPACITY: usize = 50;

/// Label shown on the ticket feed.
///
/// Codes outside `p1..p5` fall back to `Low`.
pub fn display_priority(code: &PriorityCode) -> DisplayPriority {
    match code {
        PriorityCode::P1 => DisplayPriority::Critical,
        PriorityCode::P2 => DisplayPriority::High,
        PriorityCode::P3 => DisplayPriority::Medium,
        PriorityCode::P4 | PriorityCode::P5 => DisplayPriority::Low,
        PriorityCode::Unknown(_) => DisplayPriority::Low,
    }
}

/// Histogram bucket an incident is counted under.
///
/// Deliberately not derived from [`display_priority`]: `p1` counts as `High` here while it is
/// displayed as `Critical`. Codes outside `p1..p5` fall back to `Low`.
pub fn severity_bucket(code: &PriorityCode) -> SeverityBucket {
    match code {
        PriorityCode::P1 | PriorityCode::P2 => SeverityBucket::High,
        PriorityCode::P3 => SeverityBucket::Medium,
        PriorityCode::P4 | PriorityCode::P5 => SeverityBucket::Low,
        PriorityCode::Unknown(_) => SeverityBucket::Low,
    }
}

/// Most-recent-first ticket feed with a fixed capacity.
#[derive(Debug)]
pub struct TicketBuffer {
    tickets: VecDeque<Ticket>,
    capacity: usize,
}

impl TicketBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tickets: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts at the front, evicting the oldest ticket when full.
    pub fn push(&mut self, ticket: Ticket) -> Option<Ticket> {
        let evicted = if self.tickets.len() == self.capacity {
            self.tickets.pop_back()
        } else {
            None
        };
        self.tickets.push_front(ticket);
        evicted
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter()
    }

    pub fn to_vec(&self) -> Vec<Ticket> {
        self.tickets.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub ticket_id: Uuid,
    /// Whether a histogram entry was bumped. Only counted incidents feed the rate.
    pub counted: bool,
}

#[derive(Debug)]
pub struct IncidentAggregator {
    histogram: Vec<NodeHistogramEntry>,
    index: HashMap<NodeId, usize>,
    tickets: TicketBuffer,
}

impl Default for IncidentAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_CAPACITY)
    }
}

impl IncidentAggregator {
    pub fn new(ticket_capacity: usize) -> Self {
        Self {
            histogram: Vec::new(),
            index: HashMap::new(),
            tickets: TicketBuffer::new(ticket_capacity),
        }
    }

    /// Adds a zeroed entry for `node_id` unless one exists. Returns true when one was created.
    pub fn ensure_entry(&mut self, node_id: &str) -> bool {
        if self.index.contains_key(node_id) {
            return false;
        }
        self.index.insert(node_id.to_string(), self.histogram.len());
        self.histogram.push(NodeHistogramEntry::new(node_id));
        true
    }

    pub fn ingest(&mut self, report: IncidentReport, now: DateTime<Utc>) -> IngestOutcome {
        let bucket = severity_bucket(&report.priority);
        let ticket = Ticket {
            id: Uuid::new_v4(),
            title: report.heading,
            description: report.description,
            display_priority: display_priority(&report.priority),
            node_id: report.node_id,
            received_at: now,
        };
        let ticket_id = ticket.id;

        let counted = match self.index.get(&ticket.node_id) {
            Some(&slot) => {
                let entry = &mut self.histogram[slot];
                entry.total += 1;
                entry.counts.bump(bucket);
                true
            }
            None => false,
        };

        self.tickets.push(ticket);
        IngestOutcome { ticket_id, counted }
    }

    pub fn entry(&self, node_id: &str) -> Option<&NodeHistogramEntry> {
        self.index.get(node_id).map(|&slot| &self.histogram[slot])
    }

    pub fn histogram(&self) -> &[NodeHistogramEntry] {
        &self.histogram
    }

    pub fn tickets(&self) -> &TicketBuffer {
        &self.tickets
    }
}
