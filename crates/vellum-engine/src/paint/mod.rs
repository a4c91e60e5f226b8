//! Color model shared by every shading unit.
//!
//! Colors are linear with straight alpha. The sprite unit scales and
//! desaturates them, the other units pass them through untouched.

mod color;

pub use color::Color;
