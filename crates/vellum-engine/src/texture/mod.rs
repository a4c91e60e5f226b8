//! CPU-side textures and samplers.
//!
//! `Texture2d` holds decoded linear texels; `SampledTexture` pairs one with a
//! `SamplerConfig` and implements the same addressing and filtering rules the
//! GPU applies, so fragment stages can be evaluated off-device.

mod image;
mod sampler;

pub use image::{TexelEncoding, Texture2d};
pub use sampler::{Sample2d, SampledTexture, SamplerConfig};
