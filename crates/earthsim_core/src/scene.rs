//! Scene serialization
//!
//! Provides Scene struct for loading/saving scenes from RON files.
//! A scene lists the orbiting bodies and the optional backdrop image.

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use std::io;

use earthsim_math::{sphere, Vec3};
use crate::{Material, Node, Transform};

/// A point light attached to a body's centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightTemplate {
    /// Linear RGB color
    pub color: [f32; 3],
}

impl Default for LightTemplate {
    fn default() -> Self {
        Self { color: [1.0, 1.0, 1.0] }
    }
}

/// The fixed background image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackdropTemplate {
    /// Image path relative to the asset directory
    pub image: String,
    /// Distance along +Z from the camera plane
    pub depth: f32,
}

impl BackdropTemplate {
    /// Convert this template to a backdrop node
    pub fn to_node(&self) -> Node {
        Node::backdrop(self.image.clone(), self.depth).with_name("backdrop")
    }
}

/// A serializable sphere body
///
/// The body is placed at `translation`, spun about `spin_axis` at `spin_rate`
/// degrees per second, and drawn `offset` away from that pivot. A non-zero
/// offset therefore makes the body orbit the pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTemplate {
    /// Node name (for lookup)
    pub name: String,
    pub radius: f32,
    #[serde(default = "default_divisions")]
    pub divisions: u32,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default = "default_spin_axis")]
    pub spin_axis: Vec3,
    /// Degrees per second
    #[serde(default)]
    pub spin_rate: f32,
    #[serde(default)]
    pub material: Material,
    /// Optional light riding along at the body's centre
    #[serde(default)]
    pub light: Option<LightTemplate>,
}

fn default_divisions() -> u32 {
    sphere::DEFAULT_DIVISIONS
}

fn default_spin_axis() -> Vec3 {
    Vec3::Y
}

impl BodyTemplate {
    /// Create a body with default placement and no spin
    pub fn new(name: impl Into<String>, radius: f32, material: Material) -> Self {
        Self {
            name: name.into(),
            radius,
            divisions: default_divisions(),
            translation: Vec3::ZERO,
            offset: Vec3::ZERO,
            spin_axis: default_spin_axis(),
            spin_rate: 0.0,
            material,
            light: None,
        }
    }

    /// Builder: set the mesh divisions
    pub fn with_divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }

    /// Builder: set the pivot position
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Builder: set the offset from the pivot
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set the spin rate in degrees per second
    pub fn with_spin(mut self, axis: Vec3, degrees_per_second: f32) -> Self {
        self.spin_axis = axis;
        self.spin_rate = degrees_per_second;
        self
    }

    /// Builder: attach a point light
    pub fn with_light(mut self, color: [f32; 3]) -> Self {
        self.light = Some(LightTemplate { color });
        self
    }

    /// Transform of the body node
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation)
            .with_spin_axis(self.spin_axis)
            .with_offset(self.offset)
    }

    /// Convert this template to a sphere node
    ///
    /// The light, if any, is not included; it is added as a child of the
    /// returned node so it follows the body.
    pub fn to_node(&self) -> Node {
        Node::sphere(self.radius, self.divisions, self.material.clone())
            .with_name(self.name.clone())
            .with_transform(self.transform())
    }

    /// Convert the light template to a node, if present
    pub fn light_node(&self) -> Option<Node> {
        self.light
            .as_ref()
            .map(|l| Node::point_light(l.color).with_name(format!("{}_light", self.name)))
    }
}

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Background image
    #[serde(default)]
    pub backdrop: Option<BackdropTemplate>,
    /// Bodies in this scene, placed inside the rotatable view rig
    #[serde(default)]
    pub bodies: Vec<BodyTemplate>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backdrop: None,
            bodies: Vec::new(),
        }
    }

    /// The built-in Earth and Moon scene
    pub fn earth_moon() -> Self {
        let earth = BodyTemplate::new(
            "earth",
            200.0,
            Material::default()
                .with_diffuse_map("earth_daymap.jpg")
                .with_self_illumination_map("earth_nightmap.jpg")
                .with_specular_map("earth_specular.jpg")
                .with_bump_map("earth_normal_map.jpg"),
        )
        .with_translation(Vec3::new(0.0, -50.0, 0.0))
        .with_spin(Vec3::Y, 1.2);

        let moon = BodyTemplate::new(
            "moon",
            30.0,
            Material::default()
                .with_diffuse_map("moon.jpg")
                .with_self_illumination_map("moon.jpg"),
        )
        .with_offset(Vec3::new(0.0, -50.0, -500.0))
        .with_spin(Vec3::Y, 6.0)
        .with_light([1.0, 1.0, 1.0]);

        Self::new("Earth and Moon")
            .with_backdrop("galaxy_background.jpg", 5000.0)
            .with_body(earth)
            .with_body(moon)
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scene = Self::from_ron(&contents)?;
        log::info!("Loaded scene '{}' from {} ({} bodies)", scene.name, path.display(), scene.bodies.len());
        Ok(scene)
    }

    /// Parse a scene from a RON string
    pub fn from_ron(contents: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize to a pretty RON string
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let contents = self.to_ron()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Set the backdrop image
    pub fn with_backdrop(mut self, image: impl Into<String>, depth: f32) -> Self {
        self.backdrop = Some(BackdropTemplate { image: image.into(), depth });
        self
    }

    /// Add a body
    pub fn with_body(mut self, body: BodyTemplate) -> Self {
        self.bodies.push(body);
        self
    }

    /// Find a body by name
    pub fn body(&self, name: &str) -> Option<&BodyTemplate> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}
