use crate::engine::scene::{NodeId, Scene, SceneNode};

/// Round shadow-receiving floor centered on the origin.
pub struct Floor {
    node: NodeId,
    radius: f32,
}

impl Floor {
    pub fn new(scene: &mut Scene, radius: f32) -> Self {
        let mut floor = SceneNode::floor(radius);
        floor.receive_shadow = true;
        let node = scene.add(floor);
        Self { node, radius }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}
