use anyhow::{ensure, Result};

use crate::paint::Color;

/// How raw RGBA8 bytes are interpreted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TexelEncoding {
    /// Bytes divided by 255.
    Unorm,
    /// sRGB-encoded color, linear alpha.
    #[default]
    Srgb,
}

impl TexelEncoding {
    /// The GPU view format whose sampling matches this decoding.
    pub fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            TexelEncoding::Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TexelEncoding::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }

    fn decode(self, px: &[u8]) -> Color {
        match self {
            TexelEncoding::Unorm => Color::from_unorm_u8(px[0], px[1], px[2], px[3]),
            TexelEncoding::Srgb => Color::from_srgb_u8(px[0], px[1], px[2], px[3]),
        }
    }
}

/// Decoded 2D image held in linear color, row-major, row 0 at the top.
///
/// This is the CPU stand-in for a bound texture view. Texel `(0, 0)` is the
/// top-left texel and sits under UV `(0, 0)`, matching wgpu's texture origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2d {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl Texture2d {
    /// Decodes tightly packed RGBA8 rows.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8], encoding: TexelEncoding) -> Result<Self> {
        ensure!(width > 0 && height > 0, "texture dimensions must be non-zero, got {width}x{height}");
        let expected = width as usize * height as usize * 4;
        ensure!(
            bytes.len() == expected,
            "rgba8 data for {width}x{height} must be {expected} bytes, got {}",
            bytes.len()
        );

        let texels = bytes.chunks_exact(4).map(|px| encoding.decode(px)).collect();

        log::debug!("decoded {width}x{height} texture ({encoding:?})");
        Ok(Self { width, height, texels })
    }

    pub fn from_texels(width: u32, height: u32, texels: Vec<Color>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "texture dimensions must be non-zero, got {width}x{height}");
        ensure!(
            texels.len() == width as usize * height as usize,
            "{width}x{height} texture needs {} texels, got {}",
            width as usize * height as usize,
            texels.len()
        );
        Ok(Self { width, height, texels })
    }

    /// 1×1 texture; every sample returns `color` regardless of sampler.
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// Texel at integer coordinates, or `None` out of bounds.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn texels(&self) -> &[Color] {
        &self.texels
    }
}
