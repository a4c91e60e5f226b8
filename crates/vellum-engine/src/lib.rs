//! Vellum engine crate.
//!
//! Shading units for a 2D/3D board UI renderer: WGSL sources, the binding
//! contracts a host needs to build pipelines for them, and CPU renditions of
//! every vertex and fragment stage. Device, surface and pipeline ownership
//! stays with the host.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod texture;
pub mod units;
