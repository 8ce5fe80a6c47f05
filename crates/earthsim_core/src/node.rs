//! Scene graph nodes
//!
//! A Node is a group, a textured sphere, a point light or the backdrop image,
//! placed relative to its parent by a [`Transform`].

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use crate::{Material, NodeKey, Transform};

bitflags! {
    /// Flags indicating which parts of a node have changed and need updating
    ///
    /// The renderer re-uploads per-node uniforms only for dirty nodes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (own or an ancestor's) has changed
        const TRANSFORM = 1 << 0;
        /// Material has changed
        const MATERIAL = 1 << 1;
        /// All flags set - node needs full rebuild
        const ALL = Self::TRANSFORM.bits() | Self::MATERIAL.bits();
    }
}

/// What a node renders as
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure transform container
    Group,
    /// A textured sphere centered on the node origin
    Sphere {
        radius: f32,
        divisions: u32,
        material: Material,
    },
    /// A point light at the node origin
    PointLight {
        /// Linear RGB color
        color: [f32; 3],
    },
    /// A flat background image, centered on the node origin at `depth`
    Backdrop {
        image: String,
        depth: f32,
    },
}

impl NodeKind {
    /// Short name for logging
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Sphere { .. } => "sphere",
            NodeKind::PointLight { .. } => "light",
            NodeKind::Backdrop { .. } => "backdrop",
        }
    }
}

/// A node in the scene graph
///
/// Each node has:
/// - An optional name (for lookup by name)
/// - A kind (what it renders as)
/// - A transform relative to its parent
/// - Parent and child links (maintained by the SceneGraph)
/// - Dirty flags (for change tracking)
#[derive(Clone, Debug)]
pub struct Node {
    /// Optional name for this node (for lookup)
    pub name: Option<String>,
    /// What this node renders as
    pub kind: NodeKind,
    /// Transform relative to the parent
    pub transform: Transform,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    dirty: DirtyFlags,
}

impl Node {
    /// Create a new node with an identity transform
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::identity(),
            parent: None,
            children: Vec::new(),
            dirty: DirtyFlags::ALL, // New nodes are dirty
        }
    }

    /// Create an empty group node
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Create a sphere node
    pub fn sphere(radius: f32, divisions: u32, material: Material) -> Self {
        Self::new(NodeKind::Sphere { radius, divisions, material })
    }

    /// Create a point light node
    pub fn point_light(color: [f32; 3]) -> Self {
        Self::new(NodeKind::PointLight { color })
    }

    /// Create a backdrop node
    pub fn backdrop(image: impl Into<String>, depth: f32) -> Self {
        Self::new(NodeKind::Backdrop { image: image.into(), depth })
    }

    /// Set the name of this node (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the transform of this node
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child nodes
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Material, for sphere nodes
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Sphere { material, .. } => Some(material),
            _ => None,
        }
    }

    // --- Dirty tracking methods ---

    /// Check if this node has any dirty flags set
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get the current dirty flags
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark this node as dirty with the given flags
    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Clear all dirty flags
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Set the material of a sphere node and mark it as dirty
    ///
    /// Returns false (and changes nothing) for other node kinds.
    pub fn set_material(&mut self, new_material: Material) -> bool {
        match &mut self.kind {
            NodeKind::Sphere { material, .. } => {
                *material = new_material;
                self.mark_dirty(DirtyFlags::MATERIAL);
                true
            }
            _ => false,
        }
    }
}
