use crate::classifier::TopologyUpdate;
use crate::edges::edges_of;
use crate::models::{short_label, HealthBand, NodeId, RenderNode, TopologySnapshot, TopologyState};

/// Outcome of swapping in a topology snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedSnapshot {
    /// Node ids of the incoming `networkMap`, in message order.
    pub nodes: Vec<NodeId>,
    /// Previously known node ids the snapshot omitted and that were kept with their old values.
    pub carried_forward: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct TopologyStore {
    state: TopologyState,
}

impl TopologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces adjacency, coordinates and attributes with the snapshot's in one step.
    ///
    /// Known nodes are never dropped: anything the snapshot leaves out keeps its last value.
    pub fn apply_snapshot(&mut self, update: TopologyUpdate) -> AppliedSnapshot {
        let mut next = TopologyState {
            adjacency: update.network_map,
            coordinates: update.node_coordinate,
            attributes: update.node_attributes,
        };
        let nodes: Vec<NodeId> = next.adjacency.keys().cloned().collect();
        let mut carried_forward = Vec::new();

        for (id, neighbours) in &self.state.adjacency {
            if !next.adjacency.contains_key(id) {
                next.adjacency.insert(id.clone(), neighbours.clone());
                carried_forward.push(id.clone());
            }
        }
        for (id, coordinate) in &self.state.coordinates {
            next.coordinates.entry(id.clone()).or_insert(*coordinate);
        }
        for (id, attributes) in &self.state.attributes {
            next.attributes
                .entry(id.clone())
                .or_insert_with(|| attributes.clone());
        }

        self.state = next;
        AppliedSnapshot {
            nodes,
            carried_forward,
        }
    }

    pub fn state(&self) -> &TopologyState {
        &self.state
    }

    pub fn node_count(&self) -> usize {
        self.state.adjacency.len()
    }

    pub fn snapshot(&self) -> TopologySnapshot {
        let nodes = self
            .state
            .adjacency
            .keys()
            .map(|id| {
                let attributes = self.state.attributes.get(id);
                RenderNode {
                    id: id.clone(),
                    label: short_label(id),
                    position: self.state.coordinates.get(id).copied(),
                    health: attributes.map(|a| a.health),
                    health_band: attributes.map(|a| HealthBand::from_health(a.health)),
                    node_type: attributes.map(|a| a.node_type),
                }
            })
            .collect();

        TopologySnapshot {
            state: self.state.clone(),
            nodes,
            edges: edges_of(&self.state.adjacency),
        }
    }
}
