use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Group,
    Mesh { bounds_min: [f32; 3], bounds_max: [f32; 3] },
    Floor { radius: f32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub scale: f32,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub env_map_intensity: f32,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, bounds_min: [f32; 3], bounds_max: [f32; 3]) -> Self {
        Self::with_kind(
            name,
            NodeKind::Mesh {
                bounds_min,
                bounds_max,
            },
        )
    }

    pub fn floor(radius: f32) -> Self {
        Self::with_kind("floor", NodeKind::Floor { radius })
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            scale: 1.0,
            cast_shadow: false,
            receive_shadow: false,
            env_map_intensity: 1.0,
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. } | NodeKind::Floor { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    pub shadow_camera_far: f32,
    pub shadow_normal_bias: f32,
}

/// Flat scene description: nodes with shadow flags plus one sun light.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    sun: Option<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [SceneNode] {
        &mut self.nodes
    }

    /// Visits `root` and every node below it.
    pub fn traverse_mut(&mut self, root: NodeId, mut visit: impl FnMut(&mut SceneNode)) {
        let mut in_subtree = vec![false; self.nodes.len()];
        for idx in 0..self.nodes.len() {
            let inside = idx == root.0
                || self.nodes[idx]
                    .parent
                    .is_some_and(|parent| parent.0 < idx && in_subtree[parent.0]);
            in_subtree[idx] = inside;
            if inside {
                visit(&mut self.nodes[idx]);
            }
        }
    }

    /// World scale of a node: its own scale times every ancestor's.
    pub fn world_scale(&self, id: NodeId) -> f32 {
        let mut scale = 1.0;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            scale *= node.scale;
            current = node.parent;
        }
        scale
    }

    pub fn set_sun(&mut self, light: DirectionalLight) {
        self.sun = Some(light);
    }

    pub fn sun(&self) -> Option<&DirectionalLight> {
        self.sun.as_ref()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sun = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traverse_reaches_descendants_only() {
        let mut scene = Scene::new();
        let floor = scene.add(SceneNode::floor(5.0));
        let root = scene.add(SceneNode::group("fox"));
        let body = scene.add(SceneNode::mesh("body", [0.0; 3], [1.0; 3]).with_parent(root));

        let mut seen = Vec::new();
        scene.traverse_mut(root, |node| {
            node.cast_shadow = true;
            seen.push(node.name.clone());
        });

        assert_eq!(seen, vec!["fox", "body"]);
        assert!(scene.node(body).unwrap().cast_shadow);
        assert!(!scene.node(floor).unwrap().cast_shadow);
    }

    #[test]
    fn world_scale_multiplies_ancestors() {
        let mut scene = Scene::new();
        let root = scene.add(SceneNode::group("fox").with_scale(0.02));
        let body = scene.add(SceneNode::mesh("body", [0.0; 3], [1.0; 3]).with_parent(root).with_scale(2.0));
        assert!((scene.world_scale(body) - 0.04).abs() < 1e-6);
    }

    #[test]
    fn clear_drops_nodes_and_light() {
        let mut scene = Scene::new();
        scene.add(SceneNode::floor(5.0));
        scene.set_sun(DirectionalLight {
            position: [1.0, 1.0, 1.0],
            color: [1.0; 3],
            intensity: 1.0,
            cast_shadow: true,
            shadow_map_size: 512,
            shadow_camera_far: 10.0,
            shadow_normal_bias: 0.0,
        });
        scene.clear();
        assert!(scene.nodes().is_empty());
        assert!(scene.sun().is_none());
    }
}
