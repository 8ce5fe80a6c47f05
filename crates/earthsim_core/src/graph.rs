//! Scene graph container
//!
//! The SceneGraph owns every node and the parent/child links between them.
//! Nodes are addressed by generational [`NodeKey`]s, so a key to a removed
//! node never aliases a newer one.

use slotmap::{new_key_type, SlotMap};
use earthsim_math::{mat4, Mat4, Vec3};
use crate::{DirtyFlags, Node, NodeKind, Transform};

new_key_type! {
    /// Generational key to a node in the scene graph
    pub struct NodeKey;
}

/// A point light resolved to world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldLight {
    pub key: NodeKey,
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Error from structural scene graph operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneGraphError {
    /// The requested parent does not exist
    MissingParent(NodeKey),
}

impl std::fmt::Display for SceneGraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneGraphError::MissingParent(key) => write!(f, "Parent node not found: {:?}", key),
        }
    }
}

impl std::error::Error for SceneGraphError {}

/// The scene graph containing all nodes
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Add a top-level node
    pub fn add_root(&mut self, mut node: Node) -> NodeKey {
        node.parent = None;
        node.children.clear();
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Add a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeKey, mut node: Node) -> Result<NodeKey, SceneGraphError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneGraphError::MissingParent(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        Ok(key)
    }

    /// Remove a node and its whole subtree
    ///
    /// Returns the removed node itself, or None if the key was stale.
    pub fn remove(&mut self, key: NodeKey) -> Option<Node> {
        let parent = self.nodes.get(key)?.parent;
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(p) {
                    parent_node.children.retain(|&c| c != key);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }

        let mut stack = self.nodes.get(key).map(|n| n.children.clone()).unwrap_or_default();
        let mut descendants = 0;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.remove(child) {
                stack.extend(node.children);
                descendants += 1;
            }
        }
        log::debug!("Removed node {:?} and {} descendants", key, descendants);
        self.nodes.remove(key)
    }

    /// Get a node by key
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get a mutable node by key
    ///
    /// Changing the transform through this reference does not propagate dirty
    /// flags; use [`SceneGraph::set_transform`] for that.
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Find the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<(NodeKey, &Node)> {
        self.nodes.iter().find(|(_, n)| n.name.as_deref() == Some(name))
    }

    /// Replace a node's transform and mark its subtree dirty
    ///
    /// Returns false if the key was stale.
    pub fn set_transform(&mut self, key: NodeKey, transform: Transform) -> bool {
        self.update_transform(key, |t| *t = transform)
    }

    /// Modify a node's transform in place and mark its subtree dirty
    pub fn update_transform<F: FnOnce(&mut Transform)>(&mut self, key: NodeKey, f: F) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                f(&mut node.transform);
                self.mark_subtree_dirty(key, DirtyFlags::TRANSFORM);
                true
            }
            None => false,
        }
    }

    /// Mark a node and all its descendants dirty
    pub fn mark_subtree_dirty(&mut self, key: NodeKey, flags: DirtyFlags) {
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(k) {
                node.mark_dirty(flags);
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Get the local-to-world matrix of a node
    ///
    /// Returns None if the key was stale.
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let mut m = self.nodes.get(key)?.transform.local_matrix();
        let mut current = self.nodes[key].parent;
        while let Some(p) = current {
            let parent = self.nodes.get(p)?;
            m = mat4::mul(parent.transform.local_matrix(), m);
            current = parent.parent;
        }
        Some(m)
    }

    /// Get the world-space position of a node's origin
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_matrix(key).map(mat4::get_translation)
    }

    /// Iterate over all point lights in world space
    pub fn lights(&self) -> impl Iterator<Item = WorldLight> + '_ {
        self.nodes.iter().filter_map(move |(key, node)| match node.kind {
            NodeKind::PointLight { color } => self.world_position(key).map(|position| WorldLight {
                key,
                position,
                color,
            }),
            _ => None,
        })
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Check if any node has dirty flags set
    pub fn has_dirty_nodes(&self) -> bool {
        self.nodes.values().any(|n| n.is_dirty())
    }

    /// Keys of all dirty nodes
    pub fn dirty_nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.iter().filter(|(_, n)| n.is_dirty()).map(|(k, _)| k)
    }

    /// Clear dirty flags on every node
    pub fn clear_all_dirty(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_dirty();
        }
    }

    /// Get the number of nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over keys and nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;

    const EPSILON: f32 = 1e-3;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_add_root_and_child() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group().with_name("galaxy"));
        let child = graph.add_child(root, Node::sphere(1.0, 8, Material::default())).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.roots(), &[root]);
        assert_eq!(graph.get(child).unwrap().parent(), Some(root));
        assert_eq!(graph.get(root).unwrap().children(), &[child]);
    }

    #[test]
    fn test_add_child_missing_parent() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group());
        graph.remove(root);

        let err = graph.add_child(root, Node::group()).unwrap_err();
        assert_eq!(err, SceneGraphError::MissingParent(root));
        assert!(err.to_string().contains("Parent node not found"));
    }

    #[test]
    fn test_find_by_name() {
        let mut graph = SceneGraph::new();
        graph.add_root(Node::group().with_name("a"));
        let b = graph.add_root(Node::group().with_name("b"));

        assert_eq!(graph.find_by_name("b").map(|(k, _)| k), Some(b));
        assert!(graph.find_by_name("missing").is_none());
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let galaxy = graph.add_root(
            Node::group().with_transform(Transform::from_translation(Vec3::new(700.0, 500.0, 0.0))),
        );
        let moon = graph
            .add_child(
                galaxy,
                Node::sphere(30.0, 16, Material::default())
                    .with_transform(Transform::identity().with_offset(Vec3::new(0.0, -50.0, -500.0))),
            )
            .unwrap();

        let p = graph.world_position(moon).unwrap();
        assert!(vec_approx_eq(p, Vec3::new(700.0, 450.0, -500.0)), "got {:?}", p);
    }

    #[test]
    fn test_set_transform_marks_subtree_dirty() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group());
        let child = graph.add_child(root, Node::group()).unwrap();
        let grandchild = graph.add_child(child, Node::point_light([1.0; 3])).unwrap();
        let other = graph.add_root(Node::group());
        graph.clear_all_dirty();
        assert!(!graph.has_dirty_nodes());

        assert!(graph.set_transform(root, Transform::from_translation(Vec3::X)));

        let dirty: Vec<NodeKey> = graph.dirty_nodes().collect();
        assert_eq!(dirty.len(), 3);
        assert!(dirty.contains(&grandchild));
        assert!(!dirty.contains(&other));
        assert!(graph.get(grandchild).unwrap().dirty_flags().contains(DirtyFlags::TRANSFORM));
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group());
        let child = graph.add_child(root, Node::group()).unwrap();
        let grandchild = graph.add_child(child, Node::group()).unwrap();

        assert!(graph.remove(child).is_some());
        assert_eq!(graph.node_count(), 1);
        assert!(graph.get(grandchild).is_none());
        assert!(graph.get(root).unwrap().children().is_empty());

        // Stale keys are harmless
        assert!(graph.remove(child).is_none());
        assert!(!graph.set_transform(child, Transform::identity()));
        assert!(graph.world_matrix(child).is_none());
    }

    #[test]
    fn test_lights_in_world_space() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(
            Node::group().with_transform(Transform::from_translation(Vec3::new(10.0, 0.0, 0.0))),
        );
        graph
            .add_child(
                root,
                Node::point_light([1.0, 0.5, 0.25])
                    .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 5.0))),
            )
            .unwrap();
        graph.add_child(root, Node::group()).unwrap();

        let lights: Vec<WorldLight> = graph.lights().collect();
        assert_eq!(lights.len(), 1);
        assert!(vec_approx_eq(lights[0].position, Vec3::new(10.0, 0.0, 5.0)));
        assert_eq!(lights[0].color, [1.0, 0.5, 0.25]);
    }
}
