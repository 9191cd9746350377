//! Arena-backed search tree. Nodes live in one flat allocation and refer
//! to each other by index, so the tree drops in one free at the end of a
//! call.

use rift_core::LaneState;

use crate::actions::LaneAction;

/// Index of a node within its tree's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub state: LaneState,
    /// Action that led here. `None` only at the root.
    pub action: Option<LaneAction>,
    pub parent: Option<NodeId>,
    pub children: Vec<(LaneAction, NodeId)>,
    pub untried: Vec<LaneAction>,
    pub visits: u64,
    pub total_reward: f64,
}

impl Node {
    pub(crate) fn avg_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// UCB1 selection value. Unvisited nodes sort first.
    pub(crate) fn ucb1(&self, parent_visits: u64, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let explore =
            exploration * ((parent_visits.max(1) as f64).ln() / self.visits as f64).sqrt();
        self.avg_reward() + explore
    }
}

pub(crate) struct Tree {
    nodes: Vec<Node>,
}

pub(crate) const ROOT: NodeId = NodeId(0);

impl Tree {
    pub(crate) fn with_root(state: LaneState, untried: Vec<LaneAction>) -> Self {
        Tree {
            nodes: vec![Node {
                state,
                action: None,
                parent: None,
                children: Vec::new(),
                untried,
                visits: 0,
                total_reward: 0.0,
            }],
        }
    }

    pub(crate) fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Child of `id` maximizing UCB1.
    pub(crate) fn best_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        node.children
            .iter()
            .map(|(_, child)| *child)
            .max_by(|a, b| {
                let ua = self.get(*a).ucb1(node.visits, exploration);
                let ub = self.get(*b).ucb1(node.visits, exploration);
                ua.partial_cmp(&ub).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Propagate a rollout reward from `id` back to the root.
    pub(crate) fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get_mut(current);
            node.visits += 1;
            node.total_reward += reward;
            cursor = node.parent;
        }
    }
}
