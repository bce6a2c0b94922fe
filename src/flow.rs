//! The Cardano reward distribution graph.
//!
//! Nodes are balances, rates and participants; edges follow ADA from the
//! reserve and fees through the reward pot to pools, delegators and the
//! treasury. Layout and rendering are left to the caller.

use serde::Serialize;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// A pool of ADA (reserves, treasury).
    Balance,
    /// An aggregate that collects flows.
    Pot,
    /// A rate, formula or rule applied along the way.
    Rule,
    /// A party receiving or paying out ADA.
    Participant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    pub id: u8,
    pub label: &'static str,
    pub role: NodeRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub source: u8,
    pub target: u8,
}

/// Explanatory text for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeDescription {
    pub definition: &'static str,
    pub description: &'static str,
}

const fn node(id: u8, label: &'static str, role: NodeRole) -> FlowNode {
    FlowNode { id, label, role }
}

const fn edge(source: u8, target: u8) -> FlowEdge {
    FlowEdge { source, target }
}

pub const NODES: [FlowNode; 21] = [
    node(1, "ADA Reserves", NodeRole::Balance),
    node(2, "Total Transaction Fees", NodeRole::Pot),
    node(3, "Monetary Expansion Rate * Performance of All Stake Pools", NodeRole::Rule),
    node(4, "Total Reward Pot", NodeRole::Pot),
    node(5, "Unclaimed Rewards", NodeRole::Rule),
    node(6, "1 - Treasury Growth Rate", NodeRole::Rule),
    node(7, "Stake Pool Rewards Pot", NodeRole::Pot),
    node(10, "Rewards Equation for Pool n", NodeRole::Rule),
    node(13, "Stake Pool n", NodeRole::Participant),
    node(14, "Margin & Minimum Pool Cost", NodeRole::Rule),
    node(15, "Rewards", NodeRole::Rule),
    node(16, "Operators", NodeRole::Participant),
    node(17, "Delegators", NodeRole::Participant),
    node(18, "Stake Pool Registrations & Deregistrations", NodeRole::Rule),
    node(19, "Stake Key Registrations & Deregistrations", NodeRole::Rule),
    node(20, "Deposits", NodeRole::Participant),
    node(21, "Unclaimed Refunds for Retired Pools", NodeRole::Rule),
    node(22, "Treasury", NodeRole::Balance),
    node(23, "Payouts", NodeRole::Participant),
    node(24, "Rewards Going to Deregistered Stake Addresses", NodeRole::Rule),
    node(25, "Treasury Growth Rate", NodeRole::Rule),
];

pub const EDGES: [FlowEdge; 24] = [
    edge(1, 3),
    edge(3, 4),
    edge(2, 4),
    edge(4, 6),
    edge(6, 7),
    edge(7, 5),
    edge(5, 1),
    edge(7, 10),
    edge(10, 13),
    edge(13, 15),
    edge(13, 14),
    edge(15, 17),
    edge(14, 16),
    edge(19, 17),
    edge(18, 16),
    edge(19, 20),
    edge(18, 20),
    edge(20, 21),
    edge(21, 22),
    edge(22, 23),
    edge(4, 25),
    edge(25, 22),
    edge(7, 24),
    edge(24, 22),
];

/// Read-only view over the reward distribution graph.
#[derive(Debug, Clone, Copy)]
pub struct RewardFlow {
    nodes: &'static [FlowNode],
    edges: &'static [FlowEdge],
}

impl Default for RewardFlow {
    fn default() -> Self {
        Self {
            nodes: &NODES,
            edges: &EDGES,
        }
    }
}

impl RewardFlow {
    pub fn nodes(&self) -> &'static [FlowNode] {
        self.nodes
    }

    pub fn edges(&self) -> &'static [FlowEdge] {
        self.edges
    }

    pub fn node(&self, id: u8) -> Option<&'static FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes fed directly by `id`.
    pub fn downstream(&self, id: u8) -> Vec<&'static FlowNode> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .filter_map(|e| self.node(e.target))
            .collect()
    }

    /// Nodes feeding directly into `id`.
    pub fn upstream(&self, id: u8) -> Vec<&'static FlowNode> {
        self.edges
            .iter()
            .filter(|e| e.target == id)
            .filter_map(|e| self.node(e.source))
            .collect()
    }

    /// Explanation shown when a node is selected, if one exists.
    pub fn describe(&self, label: &str) -> Option<NodeDescription> {
        match label {
            "ADA Reserves" => Some(NodeDescription {
                definition: "The total amount of ADA that is held in reserve by the Cardano protocol.",
                description: "These reserves are used for monetary expansion and to fund rewards over time.",
            }),
            "Total Transaction Fees" => Some(NodeDescription {
                definition: "The sum of all transaction fees collected from users.",
                description: "Transaction fees contribute to the total reward pot and help prevent network spam.",
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_edge_connects_known_nodes() {
        let flow = RewardFlow::default();
        for e in flow.edges() {
            assert!(flow.node(e.source).is_some(), "missing source {}", e.source);
            assert!(flow.node(e.target).is_some(), "missing target {}", e.target);
        }
    }

    #[test]
    fn reward_pot_splits_between_pools_and_treasury() {
        let flow = RewardFlow::default();
        let labels: Vec<_> = flow.downstream(4).iter().map(|n| n.label).collect();
        assert_eq!(labels, ["1 - Treasury Growth Rate", "Treasury Growth Rate"]);

        let feeders: Vec<_> = flow.upstream(22).iter().map(|n| n.id).collect();
        assert_eq!(feeders, [21, 25, 24]);
    }

    #[test]
    fn unclaimed_rewards_return_to_reserve() {
        let flow = RewardFlow::default();
        let targets: Vec<_> = flow.downstream(5).iter().map(|n| n.id).collect();
        assert_eq!(targets, [1]);
    }

    #[test]
    fn descriptions_are_optional() {
        let flow = RewardFlow::default();
        assert!(flow.describe("ADA Reserves").is_some());
        assert!(flow.describe("Payouts").is_none());
    }
}
