use glam::Vec2;
use wgpu::{AddressMode, FilterMode, MipmapFilterMode};

use crate::paint::Color;

use super::Texture2d;

/// Filtering and addressing for a texture binding.
///
/// Mirrors the subset of `wgpu::SamplerDescriptor` the shading units care
/// about. Default: clamp to edge, linear magnification, nearest
/// minification and mip selection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerConfig {
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub mipmap_filter: MipmapFilterMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Nearest,
            mipmap_filter: MipmapFilterMode::Nearest,
        }
    }
}

impl SamplerConfig {
    pub fn nearest() -> Self {
        Self {
            mag_filter: FilterMode::Nearest,
            ..Self::default()
        }
    }

    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self
    }

    fn uses_border(&self) -> bool {
        self.address_mode_u == AddressMode::ClampToBorder
            || self.address_mode_v == AddressMode::ClampToBorder
    }

    /// Device features the host must enable to create this sampler.
    pub fn required_features(&self) -> wgpu::Features {
        if self.uses_border() {
            wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER
        } else {
            wgpu::Features::empty()
        }
    }

    pub fn to_descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            border_color: self
                .uses_border()
                .then_some(wgpu::SamplerBorderColor::TransparentBlack),
            ..Default::default()
        }
    }
}

/// Anything a fragment stage can sample with normalized UVs.
pub trait Sample2d {
    fn sample(&self, uv: Vec2) -> Color;
}

/// A texture paired with the sampler it is bound with.
#[derive(Debug, Copy, Clone)]
pub struct SampledTexture<'a> {
    pub texture: &'a Texture2d,
    pub sampler: SamplerConfig,
}

impl<'a> SampledTexture<'a> {
    pub fn new(texture: &'a Texture2d, sampler: SamplerConfig) -> Self {
        Self { texture, sampler }
    }

    fn fetch(&self, x: i64, y: i64) -> Color {
        let w = self.texture.width() as i64;
        let h = self.texture.height() as i64;
        match (
            address(x, w, self.sampler.address_mode_u),
            address(y, h, self.sampler.address_mode_v),
        ) {
            (Some(x), Some(y)) => self
                .texture
                .texel(x as u32, y as u32)
                .unwrap_or_else(Color::transparent),
            _ => Color::transparent(),
        }
    }

    fn nearest(&self, uv: Vec2) -> Color {
        let x = (uv.x * self.texture.width() as f32).floor() as i64;
        let y = (uv.y * self.texture.height() as f32).floor() as i64;
        self.fetch(x, y)
    }

    fn bilinear(&self, uv: Vec2) -> Color {
        // Texel centres sit at half-integer coordinates.
        let x = uv.x * self.texture.width() as f32 - 0.5;
        let y = uv.y * self.texture.height() as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        // Casts saturate for huge coordinates, so the neighbour must too.
        let (x0, y0) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let top = self.fetch(x0, y0).lerp(self.fetch(x1, y0), fx);
        let bottom = self.fetch(x0, y1).lerp(self.fetch(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

impl Sample2d for SampledTexture<'_> {
    /// Filters with `mag_filter`; without derivatives there is no way to pick
    /// between magnification and minification.
    fn sample(&self, uv: Vec2) -> Color {
        if !uv.is_finite() {
            log::warn!("non-finite sample coordinate {uv:?}, returning transparent");
            return Color::transparent();
        }
        match self.sampler.mag_filter {
            FilterMode::Nearest => self.nearest(uv),
            FilterMode::Linear => self.bilinear(uv),
        }
    }
}

/// Resolves an integer texel coordinate for an axis of length `len`.
/// `None` means the border color applies.
fn address(i: i64, len: i64, mode: AddressMode) -> Option<i64> {
    match mode {
        AddressMode::ClampToEdge => Some(i.clamp(0, len - 1)),
        AddressMode::Repeat => Some(i.rem_euclid(len)),
        AddressMode::MirrorRepeat => {
            let m = i.rem_euclid(2 * len);
            Some(if m >= len { 2 * len - 1 - m } else { m })
        }
        AddressMode::ClampToBorder => (0..len).contains(&i).then_some(i),
    }
}
