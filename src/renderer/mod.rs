//! WebGPU rendering module
//!
//! The planet and rocket are raymarched as signed distance fields in the
//! fragment shader; explosion particles are splatted as glowing points.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{SceneSnapshot, PARTICLE_PALETTE};
pub use sdf_pipeline::SdfRenderState;
