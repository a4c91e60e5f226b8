use anyhow::{ensure, Result};
use glam::{Vec2, Vec3, Vec4};

use crate::paint::Color;

use super::UnitContract;

/// Vertex stage output: the clip-space position plus whatever the unit hands
/// on to rasterization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipVertex<V> {
    pub clip_position: Vec4,
    pub varyings: V,
}

/// Blends per-vertex outputs across a triangle.
///
/// `weights` are already final (linear or perspective-corrected) and sum to one.
/// Integer-valued fields are flat: they take the first vertex's value.
pub trait Interpolate: Sized {
    fn interpolate(vertices: [&Self; 3], weights: [f32; 3]) -> Self;
}

macro_rules! impl_interpolate_linear {
    ($($t:ty),*) => {$(
        impl Interpolate for $t {
            #[inline]
            fn interpolate(v: [&Self; 3], w: [f32; 3]) -> Self {
                *v[0] * w[0] + *v[1] * w[1] + *v[2] * w[2]
            }
        }
    )*};
}

impl_interpolate_linear!(f32, Vec2, Vec3, Vec4);

impl Interpolate for u32 {
    #[inline]
    fn interpolate(v: [&Self; 3], _: [f32; 3]) -> Self {
        *v[0]
    }
}

impl Interpolate for () {
    #[inline]
    fn interpolate(_: [&Self; 3], _: [f32; 3]) -> Self {}
}

/// How rasterization distributes barycentric weights to varyings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Screen-space weights used as-is.
    Linear,
    /// Weights divided by clip `w` and renormalized, as GPUs do by default.
    #[default]
    PerspectiveCorrect,
}

/// A vertex/fragment pair with its binding contract.
///
/// Implementors hold their bound resources (textures, immediates); the host
/// supplies per-vertex and per-instance records.
pub trait ShadingUnit {
    type Vertex;
    type Instance;
    type Varyings: Interpolate;

    fn contract() -> UnitContract;

    fn vertex(&self, vertex: &Self::Vertex, instance: &Self::Instance) -> ClipVertex<Self::Varyings>;

    fn fragment(&self, input: &Self::Varyings) -> Color;
}

const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Runs both stages of `unit` for the fragment at `barycentric` inside one triangle.
///
/// Errors when the weights are not finite or do not sum to one, or when
/// perspective correction hits a degenerate clip `w`.
pub fn shade_triangle_at<U: ShadingUnit>(
    unit: &U,
    vertices: [&U::Vertex; 3],
    instance: &U::Instance,
    barycentric: [f32; 3],
    interpolation: Interpolation,
) -> Result<Color> {
    ensure!(
        barycentric.iter().all(|w| w.is_finite()),
        "barycentric weights must be finite, got {barycentric:?}"
    );
    let sum: f32 = barycentric.iter().sum();
    ensure!(
        (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
        "barycentric weights must sum to 1, got {sum}"
    );

    let outputs = vertices.map(|v| unit.vertex(v, instance));

    let weights = match interpolation {
        Interpolation::Linear => barycentric,
        Interpolation::PerspectiveCorrect => {
            perspective_weights(barycentric, outputs.each_ref().map(|o| o.clip_position.w))?
        }
    };

    let varyings = U::Varyings::interpolate(outputs.each_ref().map(|o| &o.varyings), weights);
    Ok(unit.fragment(&varyings))
}

fn perspective_weights(barycentric: [f32; 3], w: [f32; 3]) -> Result<[f32; 3]> {
    ensure!(
        w.iter().all(|w| w.is_finite() && *w != 0.0),
        "clip w must be finite and non-zero for perspective correction, got {w:?}"
    );
    let scaled = [barycentric[0] / w[0], barycentric[1] / w[1], barycentric[2] / w[2]];
    let total: f32 = scaled.iter().sum();
    ensure!(
        total.is_finite() && total != 0.0,
        "perspective-corrected weights are degenerate"
    );
    Ok(scaled.map(|s| s / total))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Passes a clip position through and shades with its scalar varying in red.
    struct Probe;

    impl ShadingUnit for Probe {
        type Vertex = (Vec4, f32);
        type Instance = ();
        type Varyings = f32;

        fn contract() -> UnitContract {
            crate::units::flat::contract()
        }

        fn vertex(&self, v: &Self::Vertex, _: &()) -> ClipVertex<f32> {
            ClipVertex { clip_position: v.0, varyings: v.1 }
        }

        fn fragment(&self, r: &f32) -> Color {
            Color::new(*r, 0.0, 0.0, 1.0)
        }
    }

    fn shade(vs: [(Vec4, f32); 3], bary: [f32; 3], mode: Interpolation) -> Result<f32> {
        shade_triangle_at(&Probe, [&vs[0], &vs[1], &vs[2]], &(), bary, mode).map(|c| c.r)
    }

    // ── interpolation ─────────────────────────────────────────────────────

    #[test]
    fn uniform_w_makes_both_modes_agree() {
        let vs = [(Vec4::W * 2.0, 0.0), (Vec4::W * 2.0, 1.0), (Vec4::W * 2.0, 0.5)];
        let bary = [0.2, 0.5, 0.3];
        let lin = shade(vs, bary, Interpolation::Linear).unwrap();
        let persp = shade(vs, bary, Interpolation::PerspectiveCorrect).unwrap();
        assert!((lin - 0.65).abs() < 1e-6);
        assert!((lin - persp).abs() < 1e-6);
    }

    #[test]
    fn differing_w_bends_perspective_weights() {
        let vs = [(Vec4::W, 0.0), (Vec4::W * 3.0, 1.0), (Vec4::W, 0.0)];
        let bary = [0.25, 0.5, 0.25];
        let lin = shade(vs, bary, Interpolation::Linear).unwrap();
        let persp = shade(vs, bary, Interpolation::PerspectiveCorrect).unwrap();
        assert!((lin - 0.5).abs() < 1e-6);
        // 0.5/3 / (0.25 + 0.5/3 + 0.25) = 0.25
        assert!((persp - 0.25).abs() < 1e-6);
    }

    #[test]
    fn vertex_weight_one_reproduces_that_vertex() {
        let vs = [(Vec4::W, 0.1), (Vec4::W * 4.0, 0.7), (Vec4::W * 0.5, 0.9)];
        let persp = shade(vs, [0.0, 1.0, 0.0], Interpolation::PerspectiveCorrect).unwrap();
        assert!((persp - 0.7).abs() < 1e-6);
    }

    #[test]
    fn flat_integers_take_first_vertex() {
        assert_eq!(u32::interpolate([&7, &1, &1], [0.0, 0.5, 0.5]), 7);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn weights_must_sum_to_one() {
        let vs = [(Vec4::W, 0.0); 3];
        let err = shade(vs, [0.5, 0.5, 0.5], Interpolation::Linear).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn weights_must_be_finite() {
        let vs = [(Vec4::W, 0.0); 3];
        assert!(shade(vs, [f32::NAN, 0.5, 0.5], Interpolation::Linear).is_err());
    }

    #[test]
    fn zero_w_rejected_only_for_perspective() {
        let vs = [(Vec4::ZERO, 0.0), (Vec4::W, 1.0), (Vec4::W, 1.0)];
        let bary = [0.0, 0.5, 0.5];
        assert!(shade(vs, bary, Interpolation::PerspectiveCorrect).is_err());
        assert!(shade(vs, bary, Interpolation::Linear).is_ok());
    }
}
