//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building the scene graph: a backdrop root and a
//! galaxy group holding the bodies, which the view rig rotates and moves.

use earthsim_core::{
    Animation, BodyTemplate, GalaxyView, Node, NodeKey, Scene, SceneGraph,
};

/// The finished scene, ready for the systems
pub struct BuiltScene {
    pub graph: SceneGraph,
    /// The group node the view rig drives
    pub galaxy: NodeKey,
    pub animation: Animation,
    pub view: GalaxyView,
}

/// Builder for constructing scenes
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new()
///     .with_view(GalaxyView::default())
///     .add_backdrop("galaxy_background.jpg", 5000.0)
///     .add_body(&earth_template)
///     .build();
/// ```
pub struct SceneBuilder {
    graph: SceneGraph,
    galaxy: NodeKey,
    animation: Animation,
    view: GalaxyView,
}

impl SceneBuilder {
    /// Create a new scene builder with an empty galaxy group
    pub fn new() -> Self {
        let view = GalaxyView::default();
        let mut graph = SceneGraph::new();
        let galaxy = graph.add_root(
            Node::group()
                .with_name("galaxy")
                .with_transform(view.transform()),
        );

        Self {
            graph,
            galaxy,
            animation: Animation::new(),
            view,
        }
    }

    /// Build everything a scene file describes
    pub fn from_scene(scene: &Scene, view: GalaxyView) -> Self {
        let mut builder = Self::new().with_view(view);
        if let Some(backdrop) = &scene.backdrop {
            builder = builder.add_backdrop(backdrop.image.clone(), backdrop.depth);
        }
        for body in &scene.bodies {
            builder = builder.add_body(body);
        }
        builder
    }

    /// Use the given view rig
    pub fn with_view(mut self, view: GalaxyView) -> Self {
        self.graph.set_transform(self.galaxy, view.transform());
        self.view = view;
        self
    }

    /// Start with the animation paused or running
    pub fn with_animation_paused(mut self, paused: bool) -> Self {
        self.animation = self.animation.with_paused(paused);
        self
    }

    /// Add the background image
    ///
    /// The backdrop is a root node outside the galaxy, so it stays fixed
    /// while the view rotates.
    pub fn add_backdrop(mut self, image: impl Into<String>, depth: f32) -> Self {
        self.graph.add_root(Node::backdrop(image, depth).with_name("backdrop"));
        self
    }

    /// Add a body inside the galaxy, with its light and spin track
    pub fn add_body(mut self, body: &BodyTemplate) -> Self {
        let key = match self.graph.add_child(self.galaxy, body.to_node()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("Failed to add body '{}': {}", body.name, e);
                return self;
            }
        };

        if let Some(light) = body.light_node() {
            if let Err(e) = self.graph.add_child(key, light) {
                log::error!("Failed to add light for '{}': {}", body.name, e);
            }
        }

        if body.spin_rate != 0.0 {
            self.animation.add_track(key, body.spin_rate);
        }

        log::debug!(
            "Added body '{}' (radius {}, {} divisions)",
            body.name,
            body.radius,
            body.divisions
        );
        self
    }

    /// Add a custom node inside the galaxy
    pub fn add_node(mut self, node: Node) -> Self {
        if let Err(e) = self.graph.add_child(self.galaxy, node) {
            log::error!("Failed to add node: {}", e);
        }
        self
    }

    /// Build the scene
    pub fn build(self) -> BuiltScene {
        BuiltScene {
            graph: self.graph,
            galaxy: self.galaxy,
            animation: self.animation,
            view: self.view,
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthsim_core::{Material, NodeKind, Vec3};
    use earthsim_input::ViewControl;

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuilder::new().build();
        assert_eq!(scene.graph.node_count(), 1);
        assert!(scene.animation.tracks().is_empty());
        assert_eq!(scene.graph.get(scene.galaxy).unwrap().name.as_deref(), Some("galaxy"));
    }

    #[test]
    fn test_default_scene() {
        let scene = SceneBuilder::from_scene(&Scene::earth_moon(), GalaxyView::default()).build();

        // galaxy, backdrop, earth, moon, moon light
        assert_eq!(scene.graph.node_count(), 5);
        assert_eq!(scene.animation.tracks().len(), 2);
        assert_eq!(scene.graph.lights().count(), 1);

        let (backdrop, node) = scene.graph.find_by_name("backdrop").unwrap();
        assert!(node.parent().is_none());
        assert!(matches!(node.kind, NodeKind::Backdrop { depth, .. } if depth == 5000.0));
        assert!(scene.graph.roots().contains(&backdrop));

        let (_, earth) = scene.graph.find_by_name("earth").unwrap();
        assert_eq!(earth.parent(), Some(scene.galaxy));
    }

    #[test]
    fn test_with_view_sets_galaxy_transform() {
        let mut view = GalaxyView::default();
        view.set_depth(-200.0);
        let scene = SceneBuilder::new().with_view(view).build();

        let p = scene.graph.world_position(scene.galaxy).unwrap();
        assert_eq!(p, Vec3::new(700.0, 500.0, -200.0));
        assert_eq!(scene.view.depth(), -200.0);
    }

    #[test]
    fn test_static_body_has_no_track() {
        let body = BodyTemplate::new("rock", 5.0, Material::default());
        let scene = SceneBuilder::new().add_body(&body).build();
        assert!(scene.animation.tracks().is_empty());
        assert_eq!(scene.graph.node_count(), 2);
    }

    #[test]
    fn test_paused_animation() {
        let scene = SceneBuilder::new().with_animation_paused(true).build();
        assert!(scene.animation.is_paused());
    }

    #[test]
    fn test_add_node() {
        let scene = SceneBuilder::new().add_node(Node::point_light([1.0; 3])).build();
        assert_eq!(scene.graph.get(scene.galaxy).unwrap().children().len(), 1);
    }
}
