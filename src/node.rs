//! A single electrical node (potential variable).

/// Stable index of a [`Node`] within a built [`crate::circuit::Circuit`].
///
/// Ground is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const GROUND: NodeId = NodeId(0);

    pub fn is_ground(self) -> bool {
        self.0 == 0
    }
}

/// One voltage variable of the MNA system.
///
/// Nodes are created by [`crate::circuit::Circuit::build`] and owned by
/// the `Circuit`; a `Node`'s `potential` is overwritten after every
/// successful solve and otherwise reflects the last solved state.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub potential: f64,
}

impl Node {
    pub fn new(id: NodeId, name: Option<String>) -> Self {
        Node {
            id,
            name,
            potential: 0.0,
        }
    }

    pub fn ground() -> Self {
        Node {
            id: NodeId::GROUND,
            name: Some("0".to_string()),
            potential: 0.0,
        }
    }
}
