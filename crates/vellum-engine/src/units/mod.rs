//! Shading units.
//!
//! Each unit ships three things that must agree with each other:
//! - a WGSL source with `vs_main` / `fs_main` entry points,
//! - a `UnitContract` describing vertex buffers, bind groups and immediates,
//! - a CPU rendition of both stages through the `ShadingUnit` trait.
//!
//! Units:
//! - `sprite`: NDC quads, one texture, color/alpha scale, optional grayscale
//! - `flat`: instanced meshes filled with an immediate color
//! - `textured`: instanced meshes sampling a diffuse texture

mod camera;
mod contract;
mod instance;
mod stage;

pub mod flat;
pub mod sprite;
pub mod textured;

#[cfg(test)]
pub(crate) mod reflect;

pub use camera::{Camera, CameraUniform, LitCameraUniform};
pub use contract::{BindGroupContract, BindingSlot, UnitContract};
pub use instance::{instance_grid, Instance, InstanceRaw};
pub use stage::{shade_triangle_at, ClipVertex, Interpolate, Interpolation, ShadingUnit};

pub use flat::FlatColorUnit;
pub use sprite::SpriteUnit;
pub use textured::TexturedUnit;

/// Contracts for every unit, in a fixed order.
pub fn all_contracts() -> [UnitContract; 3] {
    [sprite::contract(), flat::contract(), textured::contract()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_entries_are_unique() {
        let contracts = all_contracts();
        let labels: Vec<_> = contracts.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["vellum sprite", "vellum flat", "vellum textured"]);
        for c in &contracts {
            assert_eq!(c.vertex_entry, "vs_main");
            assert_eq!(c.fragment_entry, "fs_main");
            let groups: Vec<u32> = c.bind_groups.iter().map(|g| g.group).collect();
            let expected: Vec<u32> = (0..groups.len() as u32).collect();
            assert_eq!(groups, expected, "{}: groups must be dense", c.label);
        }
    }

    #[test]
    fn vertex_locations_do_not_collide() {
        for c in all_contracts() {
            let mut locs: Vec<u32> = c
                .vertex_buffers
                .iter()
                .flat_map(|l| l.attributes.iter().map(|a| a.shader_location))
                .collect();
            let n = locs.len();
            locs.sort_unstable();
            locs.dedup();
            assert_eq!(locs.len(), n, "{}", c.label);
        }
    }
}
