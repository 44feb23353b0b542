use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NodeId = String;

/// 2D map position as delivered by the transport: `[x, y]`.
pub type Coordinate = [f64; 2];

pub type Adjacency = IndexMap<NodeId, Vec<NodeId>>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Hub,
    Ordinary,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NodeAttributes {
    pub health: u8,
    #[serde(rename = "nodeType")]
    pub node_type: NodeType,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Critical,
    Degraded,
    Healthy,
}

impl HealthBand {
    pub fn from_health(health: u8) -> Self {
        match health {
            0..=29 => HealthBand::Critical,
            30..=69 => HealthBand::Degraded,
            _ => HealthBand::Healthy,
        }
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct TopologyState {
    #[serde(rename = "networkMap")]
    pub adjacency: Adjacency,
    #[serde(rename = "nodeCordinate")]
    pub coordinates: IndexMap<NodeId, Coordinate>,
    #[serde(rename = "nodeAttributes")]
    pub attributes: IndexMap<NodeId, NodeAttributes>,
}

impl TopologyState {
    pub fn contains(&self, node_id: &str) -> bool {
        self.adjacency.contains_key(node_id)
            || self.coordinates.contains_key(node_id)
            || self.attributes.contains_key(node_id)
    }
}

/// Aggregation space used by the per-node histogram.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityBucket {
    Low,
    Medium,
    High,
}

/// Label space shown on tickets. Finer than [`SeverityBucket`].
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    #[serde(rename = "Low")]
    pub low: u64,
    #[serde(rename = "Medium")]
    pub medium: u64,
    #[serde(rename = "High")]
    pub high: u64,
}

impl SeverityCounts {
    pub fn get(&self, bucket: SeverityBucket) -> u64 {
        match bucket {
            SeverityBucket::Low => self.low,
            SeverityBucket::Medium => self.medium,
            SeverityBucket::High => self.high,
        }
    }

    pub fn sum(&self) -> u64 {
        self.low + self.medium + self.high
    }

    pub(crate) fn bump(&mut self, bucket: SeverityBucket) {
        match bucket {
            SeverityBucket::Low => self.low += 1,
            SeverityBucket::Medium => self.medium += 1,
            SeverityBucket::High => self.high += 1,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NodeHistogramEntry {
    #[serde(rename = "id")]
    pub node_id: NodeId,
    #[serde(rename = "node")]
    pub short_label: String,
    pub total: u64,
    #[serde(flatten)]
    pub counts: SeverityCounts,
}

impl NodeHistogramEntry {
    pub fn new(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            short_label: short_label(node_id),
            total: 0,
            counts: SeverityCounts::default(),
        }
    }
}

/// First four characters of a node id, used as its compact label.
pub fn short_label(node_id: &str) -> String {
    node_id.chars().take(4).collect()
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "priority")]
    pub display_priority: DisplayPriority,
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    #[serde(rename = "receivedAt")]
    pub received_at: DateTime<Utc>,
}

impl Ticket {
    /// Wall-clock `HH:MM:SS` used by the ticket feed.
    pub fn display_time(&self) -> String {
        self.received_at.format("%H:%M:%S").to_string()
    }
}

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq)]
pub struct RateEstimate {
    #[serde(rename = "cumulativeCount")]
    pub cumulative_count: u64,
    #[serde(rename = "windowStart")]
    pub window_start: Option<DateTime<Utc>>,
    pub value: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub label: String,
    pub position: Option<Coordinate>,
    pub health: Option<u8>,
    #[serde(rename = "healthBand")]
    pub health_band: Option<HealthBand>,
    #[serde(rename = "nodeType")]
    pub node_type: Option<NodeType>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TopologySnapshot {
    #[serde(flatten)]
    pub state: TopologyState,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct PoissonPoint {
    pub k: u64,
    pub probability: f64,
}

/// One consistent read of everything the dashboard shows.
#[derive(Debug, Serialize, Clone)]
pub struct DashboardSnapshot {
    pub topology: TopologySnapshot,
    pub histogram: Vec<NodeHistogramEntry>,
    pub tickets: Vec<Ticket>,
    pub rate: RateEstimate,
}
