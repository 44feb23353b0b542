//! Routing of decoded transport records.
//!
//! Records carry no explicit discriminant. A record with a `networkMap` key is a topology
//! snapshot, a record with a `priority` key is an incident. The two checks are independent, so
//! a single record may feed both the topology store and the incident aggregator.

use crate::error::ClassifyError;
use crate::models::{Adjacency, Coordinate, NodeAttributes, NodeId, NodeType};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub const TOPOLOGY_KEY: &str = "networkMap";
pub const INCIDENT_KEY: &str = "priority";

/// A complete topology snapshot, validated and ready to swap in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyUpdate {
    pub network_map: Adjacency,
    pub node_coordinate: IndexMap<NodeId, Coordinate>,
    pub node_attributes: IndexMap<NodeId, NodeAttributes>,
}

/// Priority code as sent by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityCode {
    P1,
    P2,
    P3,
    P4,
    P5,
    Unknown(String),
}

impl PriorityCode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "p1" => PriorityCode::P1,
            "p2" => PriorityCode::P2,
            "p3" => PriorityCode::P3,
            "p4" => PriorityCode::P4,
            "p5" => PriorityCode::P5,
            _ => PriorityCode::Unknown(raw.to_string()),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => PriorityCode::parse(s),
            other => PriorityCode::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentReport {
    pub priority: PriorityCode,
    pub node_id: NodeId,
    pub heading: String,
    pub description: String,
}

/// Where a record goes. Both halves may be present.
#[derive(Debug, Default)]
pub struct Routes {
    pub topology: Option<Result<TopologyUpdate, ClassifyError>>,
    pub incident: Option<IncidentReport>,
}

impl Routes {
    pub fn is_unroutable(&self) -> bool {
        self.topology.is_none() && self.incident.is_none()
    }
}

#[derive(Deserialize)]
struct WireTopology {
    #[serde(rename = "networkMap")]
    network_map: Adjacency,
    #[serde(rename = "nodeCordinate")]
    node_coordinate: IndexMap<NodeId, Coordinate>,
    #[serde(rename = "nodeAttributes")]
    node_attributes: IndexMap<NodeId, WireAttributes>,
}

#[derive(Deserialize)]
struct WireAttributes {
    health: f64,
    #[serde(rename = "nodeType")]
    node_type: NodeType,
}

impl From<WireAttributes> for NodeAttributes {
    fn from(wire: WireAttributes) -> Self {
        NodeAttributes {
            health: wire.health.clamp(0.0, 100.0).round() as u8,
            node_type: wire.node_type,
        }
    }
}

pub fn classify(record: &Value) -> Result<Routes, ClassifyError> {
    let fields = record.as_object().ok_or(ClassifyError::NotAnObject)?;
    let mut routes = Routes::default();

    if fields.contains_key(TOPOLOGY_KEY) {
        routes.topology = Some(parse_topology(record));
    }

    if let Some(priority) = fields.get(INCIDENT_KEY) {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        routes.incident = Some(IncidentReport {
            priority: PriorityCode::from_value(priority),
            node_id: text("nodeid"),
            heading: text("heading"),
            description: text("description"),
        });
    }

    Ok(routes)
}

fn parse_topology(record: &Value) -> Result<TopologyUpdate, ClassifyError> {
    let wire = WireTopology::deserialize(record).map_err(ClassifyError::Topology)?;
    Ok(TopologyUpdate {
        network_map: wire.network_map,
        node_coordinate: wire.node_coordinate,
        node_attributes: wire
            .node_attributes
            .into_iter()
            .map(|(id, attrs)| (id, attrs.into()))
            .collect(),
    })
}
