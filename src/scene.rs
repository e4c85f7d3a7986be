use serde::{Deserialize, Serialize};

use crate::movement::NodePosture;

/// Handle of a scene node (tank body, ghost tank, smoke effect)
pub type NodeHandle = hecs::Entity;

/// Types of nodes in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Tank,
    NpcTank,
    GhostTank,
    BarrelSmoke,
}

/// Scene nodes as seen by turn playback
///
/// Implemented by whatever owns the visual proxies. Playback only creates and
/// destroys transient effect nodes and pushes postures into existing ones.
pub trait SceneNodes {
    fn instantiate(&mut self, kind: NodeKind) -> NodeHandle;
    fn destroy(&mut self, handle: NodeHandle);
    fn apply_posture(&mut self, handle: NodeHandle, posture: &NodePosture);
}

/// Which node an animated posture belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTarget {
    /// The unit that owns the action list
    Unit,
    /// A node created during playback
    Node(NodeHandle),
}

/// Posture to apply to a node this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPosture {
    pub target: AnimationTarget,
    pub posture: NodePosture,
}

impl AnimationPosture {
    pub fn unit(posture: NodePosture) -> Self {
        Self {
            target: AnimationTarget::Unit,
            posture,
        }
    }

    pub fn node(handle: NodeHandle, posture: NodePosture) -> Self {
        Self {
            target: AnimationTarget::Node(handle),
            posture,
        }
    }
}
