//! Texture loading and upload
//!
//! Images are decoded with the `image` crate into RGBA8. A missing or
//! undecodable file is not fatal: [`load_or_fallback`] logs a warning and
//! substitutes a 1x1 texture of a neutral color for that map.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{imageops::{self, FilterType}, Rgba, RgbaImage};
use wgpu::util::DeviceExt;

/// The role a texture plays, which decides its format and fallback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    Diffuse,
    Specular,
    Bump,
    SelfIllumination,
    Backdrop,
}

impl MapKind {
    /// Color used when the image cannot be loaded
    pub fn fallback_color(self) -> [u8; 4] {
        match self {
            MapKind::Diffuse => [128, 128, 128, 255],
            MapKind::Specular => [0, 0, 0, 255],
            // Flat tangent-space normal
            MapKind::Bump => [128, 128, 255, 255],
            MapKind::SelfIllumination => [0, 0, 0, 255],
            MapKind::Backdrop => [0, 0, 0, 255],
        }
    }

    /// Color maps are sRGB encoded; data maps are linear
    pub fn is_srgb(self) -> bool {
        matches!(self, MapKind::Diffuse | MapKind::SelfIllumination | MapKind::Backdrop)
    }

    /// GPU texture format for this kind
    pub fn format(self) -> wgpu::TextureFormat {
        if self.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

/// Error loading an image file
#[derive(Debug)]
pub enum TextureError {
    /// The file could not be opened or decoded
    Load(PathBuf, image::ImageError),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Load(path, e) => write!(f, "Failed to load {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for TextureError {}

/// Load an image file as RGBA8
pub fn load_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| TextureError::Load(path.to_path_buf(), e))
}

/// A 1x1 image of a single color
pub fn solid_image(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba(color))
}

/// Load an image, or fall back to a 1x1 image of `color`
pub fn load_or_fallback(path: &Path, color: [u8; 4]) -> RgbaImage {
    match load_rgba(path) {
        Ok(img) => {
            log::debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
            img
        }
        Err(e) => {
            log::warn!("{} - using a solid color instead", e);
            solid_image(color)
        }
    }
}

/// Size that fits within `max_dim` on both axes, keeping the aspect ratio
pub fn fitted_size(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let max_dim = max_dim.max(1);
    if width <= max_dim && height <= max_dim {
        return (width, height);
    }
    let scale = max_dim as f64 / width.max(height) as f64;
    let fit = |n: u32| ((n as f64 * scale).round() as u32).clamp(1, max_dim);
    (fit(width), fit(height))
}

/// Downscale an image that exceeds the GPU texture limit
///
/// Images within the limit are borrowed unchanged.
pub fn fit_to_limit(image: &RgbaImage, max_dim: u32) -> Cow<'_, RgbaImage> {
    let (w, h) = image.dimensions();
    let (fw, fh) = fitted_size(w, h, max_dim);
    if (fw, fh) == (w, h) {
        return Cow::Borrowed(image);
    }
    log::warn!(
        "Image is {}x{}, above the {} texel limit; downscaling to {}x{}",
        w, h, max_dim, fw, fh
    );
    Cow::Owned(imageops::resize(image, fw, fh, FilterType::Triangle))
}

/// A GPU texture with its view and sampler
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Width and height in texels
    pub size: (u32, u32),
    /// Width and height of the source image, before any downscaling
    pub image_size: (u32, u32),
}

impl Texture {
    /// Upload an RGBA8 image
    ///
    /// Images larger than the device's 2D texture limit are downscaled first.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        kind: MapKind,
        label: &str,
    ) -> Self {
        let image_size = image.dimensions();
        let image = fit_to_limit(image, device.limits().max_texture_dimension_2d);
        let size = (image.width().max(1), image.height().max(1));
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size.0,
                    height: size.1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: kind.format(),
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler, size, image_size }
    }

    /// Upload a 1x1 texture of a single color
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color: [u8; 4],
        kind: MapKind,
        label: &str,
    ) -> Self {
        Self::from_image(device, queue, &solid_image(color), kind, label)
    }
}
