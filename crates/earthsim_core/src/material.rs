//! Phong material description
//!
//! Maps are stored as asset-relative paths; the renderer resolves and loads
//! them.

use serde::{Serialize, Deserialize};

/// Default Phong exponent
pub const DEFAULT_SPECULAR_POWER: f32 = 32.0;

/// A Phong material with optional texture maps
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color as RGBA, multiplied with the diffuse map
    #[serde(default = "white")]
    pub diffuse_color: [f32; 4],
    /// Explicit specular color (see [`Material::effective_specular_color`])
    #[serde(default)]
    pub specular_color: Option<[f32; 3]>,
    /// Phong exponent
    #[serde(default = "default_specular_power")]
    pub specular_power: f32,
    /// Diffuse (albedo) map
    #[serde(default)]
    pub diffuse_map: Option<String>,
    /// Specular intensity map
    #[serde(default)]
    pub specular_map: Option<String>,
    /// Tangent-space normal map
    #[serde(default)]
    pub bump_map: Option<String>,
    /// Emissive map added regardless of lighting
    #[serde(default)]
    pub self_illumination_map: Option<String>,
}

fn white() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_specular_power() -> f32 {
    DEFAULT_SPECULAR_POWER
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: white(),
            specular_color: None,
            specular_power: DEFAULT_SPECULAR_POWER,
            diffuse_map: None,
            specular_map: None,
            bump_map: None,
            self_illumination_map: None,
        }
    }
}

impl Material {
    /// Create an untextured material with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            diffuse_color: [r, g, b, 1.0],
            ..Self::default()
        }
    }

    /// Builder: set the diffuse map
    pub fn with_diffuse_map(mut self, path: impl Into<String>) -> Self {
        self.diffuse_map = Some(path.into());
        self
    }

    /// Builder: set the specular map
    pub fn with_specular_map(mut self, path: impl Into<String>) -> Self {
        self.specular_map = Some(path.into());
        self
    }

    /// Builder: set the bump (normal) map
    pub fn with_bump_map(mut self, path: impl Into<String>) -> Self {
        self.bump_map = Some(path.into());
        self
    }

    /// Builder: set the self-illumination map
    pub fn with_self_illumination_map(mut self, path: impl Into<String>) -> Self {
        self.self_illumination_map = Some(path.into());
        self
    }

    /// Builder: set an explicit specular color
    pub fn with_specular_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular_color = Some([r, g, b]);
        self
    }

    /// Specular color used for shading
    ///
    /// The explicit color if set; otherwise white when a specular map exists
    /// (the map alone drives the highlight) and black when neither is present.
    pub fn effective_specular_color(&self) -> [f32; 3] {
        match (self.specular_color, &self.specular_map) {
            (Some(c), _) => c,
            (None, Some(_)) => [1.0, 1.0, 1.0],
            (None, None) => [0.0, 0.0, 0.0],
        }
    }

    /// Iterate over all referenced map paths
    pub fn maps(&self) -> impl Iterator<Item = &str> {
        [
            &self.diffuse_map,
            &self.specular_map,
            &self.bump_map,
            &self.self_illumination_map,
        ]
        .into_iter()
        .filter_map(|m| m.as_deref())
    }
}
